//! HTML rendering of estimate content.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::model::{ParsedContent, StyleProfile};

use super::RenderOptions;

const DEFAULT_TITLE: &str = "Project Estimate";
const DEFAULT_HEADING: &str = "Section";

/// Render content as a standalone HTML page styled after `profile`.
pub fn to_html(
    content: &ParsedContent,
    profile: &StyleProfile,
    options: &RenderOptions,
) -> Result<String> {
    HtmlRenderer::new(options).render(content, profile)
}

/// Fixed estimate template filled from a profile.
pub struct HtmlRenderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, content: &ParsedContent, profile: &StyleProfile) -> Result<String> {
        self.render_internal(content, profile)
            .map_err(|e| Error::Render(format!("HTML formatting error: {}", e)))
    }

    fn render_internal(
        &self,
        content: &ParsedContent,
        profile: &StyleProfile,
    ) -> std::result::Result<String, std::fmt::Error> {
        let opts = self.options;
        let primary = non_empty(&profile.primary_font).unwrap_or("Helvetica");
        let secondary = non_empty(&profile.secondary_font).unwrap_or(primary);
        let [ink, accent, muted] = opts.palette(&profile.colors);
        let heading = positive_or(profile.sizes.heading, opts.default_heading_size);
        let body = positive_or(profile.sizes.body, opts.default_body_size);
        let title = escape_html(non_empty(&content.title).unwrap_or(DEFAULT_TITLE));

        let mut out = String::with_capacity(4096);
        writeln!(out, "<!doctype html>")?;
        writeln!(out, "<html>")?;
        writeln!(out, "  <head>")?;
        writeln!(out, "    <meta charset=\"utf-8\" />")?;
        writeln!(
            out,
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />"
        )?;
        writeln!(out, "    <title>{}</title>", title)?;
        writeln!(out, "    <style>")?;
        writeln!(
            out,
            "      body {{ margin: 0; padding: 40px; background: #f8fafc; color: {}; font-family: \"{}\", \"{}\", sans-serif; }}",
            ink,
            escape_css(primary),
            escape_css(secondary)
        )?;
        writeln!(
            out,
            "      .estimate-card {{ max-width: 840px; margin: 0 auto; background: #ffffff; border: 1px solid #e2e8f0; border-top: 8px solid {}; border-radius: 14px; padding: 34px; }}",
            accent
        )?;
        writeln!(
            out,
            "      .brand {{ display: flex; align-items: center; gap: 16px; margin-bottom: 20px; }}"
        )?;
        writeln!(out, "      .brand img {{ max-height: 58px; width: auto; }}")?;
        writeln!(
            out,
            "      h1 {{ margin: 0 0 12px; font-size: {}px; line-height: 1.15; }}",
            (heading * 1.2).round()
        )?;
        writeln!(
            out,
            "      .intro {{ margin-bottom: 20px; color: {}; font-size: {}px; line-height: 1.55; }}",
            muted, body
        )?;
        writeln!(
            out,
            "      .estimate-section {{ margin: 16px 0; padding-top: 10px; border-top: 1px solid #e2e8f0; }}"
        )?;
        writeln!(
            out,
            "      h2 {{ margin: 0 0 10px; font-size: {}px; }}",
            heading.round()
        )?;
        writeln!(
            out,
            "      ul {{ margin: 0; padding-left: 20px; font-size: {}px; line-height: 1.55; }}",
            body
        )?;
        writeln!(out, "      li {{ margin: 6px 0; }}")?;
        writeln!(out, "    </style>")?;
        writeln!(out, "  </head>")?;
        writeln!(out, "  <body>")?;
        writeln!(out, "    <article class=\"estimate-card\">")?;
        writeln!(out, "      <div class=\"brand\">")?;
        if let Some(logo) = &opts.logo_data_uri {
            writeln!(
                out,
                "        <img src=\"{}\" alt=\"Company Logo\" />",
                escape_html(logo)
            )?;
        }
        writeln!(out, "        <div><h1>{}</h1></div>", title)?;
        writeln!(out, "      </div>")?;
        writeln!(out, "      <p class=\"intro\">{}</p>", escape_html(&content.intro))?;

        for section in &content.sections {
            let heading = non_empty(&section.heading).unwrap_or(DEFAULT_HEADING);
            write!(
                out,
                "      <section class=\"estimate-section\"><h2>{}</h2><ul>",
                escape_html(heading)
            )?;
            for bullet in &section.bullets {
                write!(out, "<li>{}</li>", escape_html(bullet))?;
            }
            writeln!(out, "</ul></section>")?;
        }

        writeln!(out, "    </article>")?;
        writeln!(out, "  </body>")?;
        write!(out, "</html>")?;
        Ok(out)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(c),
        }
    }
    result
}

/// Keep font names from breaking out of a quoted CSS string.
fn escape_css(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '\\' | '<' | '>' | '{' | '}' | ';'))
        .collect()
}
