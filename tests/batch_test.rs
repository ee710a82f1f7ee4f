//! Integration tests for multi-document batches.

mod common;

use std::fs;

use common::simple_pdf;
use docstyle::{analyze_batch, AnalyzeOptions, DocumentInput, Docstyle, Error};
use tempfile::TempDir;

fn georgia_doc() -> Vec<u8> {
    simple_pdf(&[
        ("Georgia-Bold", 20.0, "Annual Review"),
        ("Georgia", 11.0, "Body text set in a serif face."),
    ])
}

fn arial_doc() -> Vec<u8> {
    simple_pdf(&[("Arial", 10.0, "Sans serif body copy, short.")])
}

#[test]
fn test_partial_failures_keep_order() {
    let inputs = vec![
        DocumentInput::new("first.pdf", georgia_doc()),
        DocumentInput::new("notes.txt", b"plain text, not a pdf".to_vec()),
        DocumentInput::new("second.pdf", arial_doc()),
        DocumentInput::new("empty.pdf", Vec::new()),
    ];
    let report = analyze_batch(&inputs, &AnalyzeOptions::default()).unwrap();

    assert_eq!(report.profile.doc_count, 2);
    let ids: Vec<&str> = report.documents.iter().map(|d| d.identifier.as_str()).collect();
    assert_eq!(ids, vec!["first.pdf", "second.pdf"]);
    assert_eq!(report.documents[0].primary_font, "Georgia");
    assert_eq!(report.documents[1].primary_font, "Arial");

    let failed: Vec<&str> = report.failures.iter().map(|f| f.identifier.as_str()).collect();
    assert_eq!(failed, vec!["notes.txt", "empty.pdf"]);
}

#[test]
fn test_parallel_matches_sequential() {
    let inputs: Vec<DocumentInput> = (0..6)
        .map(|i| {
            let bytes = if i % 2 == 0 { georgia_doc() } else { arial_doc() };
            DocumentInput::new(format!("doc{}.pdf", i), bytes)
        })
        .collect();

    let parallel = analyze_batch(&inputs, &AnalyzeOptions::default()).unwrap();
    let sequential = analyze_batch(&inputs, &AnalyzeOptions::default().sequential()).unwrap();

    assert_eq!(parallel.profile, sequential.profile);
    assert_eq!(parallel.documents, sequential.documents);
}

#[test]
fn test_every_document_failing() {
    let inputs = vec![
        DocumentInput::new("a.docx", b"PK\x03\x04".to_vec()),
        DocumentInput::new("b.pdf", simple_pdf(&[("Helvetica", 12.0, "  ")])),
    ];
    match analyze_batch(&inputs, &AnalyzeOptions::default()) {
        Err(Error::NoDocumentsAnalyzed(failures)) => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[1].identifier, "b.pdf");
        }
        other => panic!("unexpected result: {:?}", other.map(|r| r.documents)),
    }
}

#[test]
fn test_analyze_files_from_disk() {
    let dir = TempDir::new().unwrap();
    let georgia = dir.path().join("georgia.pdf");
    let arial = dir.path().join("arial.pdf");
    fs::write(&georgia, georgia_doc()).unwrap();
    fs::write(&arial, arial_doc()).unwrap();
    let missing = dir.path().join("missing.pdf");

    let report = Docstyle::new()
        .sequential()
        .analyze_files([&georgia, &arial, &missing])
        .unwrap();

    assert_eq!(report.profile.doc_count, 2);
    assert_eq!(report.documents[0].identifier, "georgia.pdf");
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].identifier.ends_with("missing.pdf"));
}

#[test]
fn test_document_limit() {
    let inputs: Vec<DocumentInput> = (0..11)
        .map(|i| DocumentInput::new(format!("{}.pdf", i), arial_doc()))
        .collect();
    assert!(matches!(
        analyze_batch(&inputs, &AnalyzeOptions::default()),
        Err(Error::TooManyDocuments { given: 11, limit: 10 })
    ));
}
