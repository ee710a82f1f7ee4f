//! Rendering of estimate content into HTML, PDF, Markdown and JSON.

mod html;
mod json;
mod markdown;
mod options;
mod pdf;

pub use html::{escape_html, to_html, HtmlRenderer};
pub use json::{to_json, JsonFormat};
pub use markdown::to_markdown;
pub use options::{RenderOptions, A4_HEIGHT, A4_WIDTH};
pub use pdf::{to_pdf, PdfRenderer};
