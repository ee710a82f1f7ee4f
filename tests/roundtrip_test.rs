//! Rendered estimates analyzed back into style profiles.

use docstyle::render::{to_json, to_pdf, JsonFormat, RenderOptions};
use docstyle::{
    analyze_bytes, merge_profiles, MergedStyleProfile, ParsedContent, Section, StyleProfile,
};

fn estimate() -> ParsedContent {
    ParsedContent::new(
        "Website Estimate",
        "A refreshed marketing site with a content management backend.",
        vec![
            Section::with_bullets("Design", ["Wireframes for key pages", "Visual design system"]),
            Section::with_bullets("Build", ["Responsive frontend", "CMS integration"]),
        ],
    )
}

fn styled_profile() -> StyleProfile {
    let mut profile = StyleProfile::default();
    profile.colors = vec![
        "#336699".to_string(),
        "#993366".to_string(),
        "#666666".to_string(),
    ];
    profile
}

#[test]
fn test_rendered_pdf_profiles_back() {
    let content = estimate();
    let bytes = to_pdf(&content, &styled_profile(), &RenderOptions::default()).unwrap();
    let profile = analyze_bytes(&bytes).unwrap();

    assert_eq!(profile.page_count, 1);
    assert_eq!(profile.primary_font, "Helvetica");
    assert_eq!(profile.secondary_font, "Helvetica Bold");
    assert!(profile.emphasis.bold_ratio > 0.0);
    assert_eq!(profile.sizes.body, 11.0);
    assert_eq!(profile.sizes.heading, 19.0);
    assert_eq!(profile.colors, vec!["#336699", "#993366", "#666666"]);
    assert_eq!(profile.punctuation.bullets, content.bullet_count() as u64);
    assert_eq!(profile.margins.left, 44.0);
    assert!(profile.sample_text.starts_with("Website Estimate"));
}

#[test]
fn test_rendered_pdf_with_default_palette() {
    let bytes = to_pdf(&estimate(), &StyleProfile::default(), &RenderOptions::default()).unwrap();
    let profile = analyze_bytes(&bytes).unwrap();
    assert_eq!(profile.colors[0], "#0f172a");
}

#[test]
fn test_profile_json_round_trip() {
    let bytes = to_pdf(&estimate(), &styled_profile(), &RenderOptions::default()).unwrap();
    let profile = analyze_bytes(&bytes).unwrap();

    let json = to_json(&profile, JsonFormat::Pretty).unwrap();
    assert!(json.contains("\"primaryFont\": \"Helvetica\""));
    let parsed: StyleProfile = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, profile);

    let merged = merge_profiles(&[profile.clone(), profile]).unwrap();
    let json = to_json(&merged, JsonFormat::Compact).unwrap();
    assert!(json.starts_with("{\"docCount\":2,"));
    let parsed: MergedStyleProfile = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, merged);
}

#[test]
fn test_content_json_round_trip() {
    let content = estimate();
    let json = to_json(&content, JsonFormat::Compact).unwrap();
    let parsed: ParsedContent = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, content);
}
