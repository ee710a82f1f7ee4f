//! Markdown rendering for estimate content.

use crate::model::ParsedContent;

use super::RenderOptions;

/// Convert content to Markdown.
///
/// The title becomes a level-1 heading, the intro a paragraph, and each
/// section a level-2 heading followed by a bulleted list.
pub fn to_markdown(content: &ParsedContent, options: &RenderOptions) -> String {
    let text = |s: &str| {
        if options.escape_special_chars {
            escape_markdown(s)
        } else {
            s.to_string()
        }
    };

    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", text(content.title.trim())));

    let intro = content.intro.trim();
    if !intro.is_empty() {
        output.push_str(&text(intro));
        output.push_str("\n\n");
    }

    for section in &content.sections {
        output.push_str(&format!("## {}\n\n", text(section.heading.trim())));
        for bullet in &section.bullets {
            output.push_str(&format!("{} {}\n", options.list_marker, text(bullet.trim())));
        }
        output.push('\n');
    }

    let trimmed_len = output.trim_end().len();
    output.truncate(trimmed_len);
    output.push('\n');
    output
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
