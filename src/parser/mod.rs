//! PDF access and run tokenization.

mod backend;
mod options;
mod tokenizer;

pub use backend::{
    decode_text, encode_win_ansi, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend,
    PdfValue, DEFAULT_PAGE_HEIGHT,
};
pub use options::{AnalyzeOptions, ErrorMode, DEFAULT_MAX_DOCUMENTS, DEFAULT_MAX_DOCUMENT_BYTES};
pub use tokenizer::RunTokenizer;
