//! Line-pattern outline parser used when no generative backend answers.

use regex::Regex;

use crate::model::{ParsedContent, Section};

const DEFAULT_TITLE: &str = "Project Estimate";
const DEFAULT_INTRO: &str = "Custom estimate request";
const DEFAULT_HEADING: &str = "Section";

/// First lines shorter than this double as the title.
const TITLE_MAX_CHARS: usize = 60;

/// Unmarked lines must be longer than this to become bullets.
const PLAIN_BULLET_MIN_CHARS: usize = 10;

/// Lines after the first that feed the default scope section.
const SCOPE_LINES: usize = 7;

/// Classifier state while walking the request line by line.
#[derive(Debug)]
enum SectionState {
    NoSection,
    OpenSection { heading: String, bullets: Vec<String> },
}

impl SectionState {
    /// Close the current section, keeping it only if it collected bullets.
    fn flush(self, sections: &mut Vec<Section>) {
        if let SectionState::OpenSection { heading, bullets } = self {
            if !bullets.is_empty() {
                sections.push(Section { heading, bullets });
            }
        }
    }
}

/// Turns a free-text request into a title, intro and sections.
#[derive(Debug, Clone)]
pub struct FallbackParser {
    title: Regex,
    heading: Regex,
    heading_marker: Regex,
    bullet: Regex,
}

impl FallbackParser {
    /// Compile the line patterns.
    pub fn new() -> Self {
        Self {
            title: Regex::new(r"(?i)^(?:title|project|estimate)[:\s]+(.+)").unwrap(),
            heading: Regex::new(
                r"(?i)^(?:##?|section|heading|deliverable|scope|pricing|timeline|terms?)[:\s]",
            )
            .unwrap(),
            heading_marker: Regex::new(
                r"(?i)^(?:##?\s*|(?:section|heading|deliverable|scope|pricing|timeline|terms?)[:\s]+)",
            )
            .unwrap(),
            bullet: Regex::new(r"^[-•*]\s+").unwrap(),
        }
    }

    /// Parse a request. Always returns at least one section.
    pub fn parse(&self, text: &str) -> ParsedContent {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let intro = lines.first().copied().unwrap_or(DEFAULT_INTRO);
        let title = self.title_for(intro, &lines);

        let mut sections = Vec::new();
        let mut state = SectionState::NoSection;
        for line in &lines {
            state = self.step(state, line, &mut sections);
        }
        state.flush(&mut sections);

        if sections.is_empty() {
            sections = default_sections(&lines);
        }

        log::debug!("Fallback outline: {} sections", sections.len());

        ParsedContent {
            title,
            intro: intro.to_string(),
            sections,
        }
    }

    /// The title pattern runs over the joined lines, so a bare marker line
    /// takes its title from the next line.
    fn title_for(&self, intro: &str, lines: &[&str]) -> String {
        if let Some(caps) = self.title.captures(&lines.join("\n")) {
            return caps[1].trim().to_string();
        }
        if intro.chars().count() < TITLE_MAX_CHARS {
            return intro.to_string();
        }
        DEFAULT_TITLE.to_string()
    }

    fn step(&self, state: SectionState, line: &str, sections: &mut Vec<Section>) -> SectionState {
        if self.heading.is_match(line) {
            state.flush(sections);
            let heading = self.heading_marker.replace(line, "").trim().to_string();
            return SectionState::OpenSection {
                heading: if heading.is_empty() {
                    DEFAULT_HEADING.to_string()
                } else {
                    heading
                },
                bullets: Vec::new(),
            };
        }

        match state {
            SectionState::OpenSection {
                heading,
                mut bullets,
            } => {
                if self.bullet.is_match(line) {
                    let bullet = self.bullet.replace(line, "").trim().to_string();
                    if !bullet.is_empty() {
                        bullets.push(bullet);
                    }
                } else if line.chars().count() > PLAIN_BULLET_MIN_CHARS {
                    bullets.push(line.to_string());
                }
                SectionState::OpenSection { heading, bullets }
            }
            SectionState::NoSection => SectionState::NoSection,
        }
    }
}

impl Default for FallbackParser {
    fn default() -> Self {
        Self::new()
    }
}

fn default_sections(lines: &[&str]) -> Vec<Section> {
    let scope: Vec<&str> = lines.iter().skip(1).take(SCOPE_LINES).copied().collect();
    let scope = if scope.is_empty() {
        vec!["Detailed scope to be confirmed during kickoff"]
    } else {
        scope
    };

    vec![
        Section::with_bullets("Scope Overview", scope),
        Section::with_bullets(
            "Deliverables",
            [
                "Discovery and planning",
                "Execution and quality control",
                "Final delivery with handoff",
            ],
        ),
        Section::with_bullets(
            "Pricing & Terms",
            [
                "Estimate is based on the current brief and assumptions",
                "Changes in scope may update timeline and pricing",
                "Payment terms: Net 15 unless otherwise specified",
            ],
        ),
    ]
}

/// Parse a request with a freshly built [`FallbackParser`].
pub fn parse_fallback(text: &str) -> ParsedContent {
    FallbackParser::new().parse(text)
}
