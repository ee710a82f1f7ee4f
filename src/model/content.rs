//! Structured content shared by the generative backend and the fallback parser.

use serde::{Deserialize, Serialize};

/// A titled outline: intro paragraph followed by bulleted sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    pub title: String,
    pub intro: String,
    pub sections: Vec<Section>,
}

impl ParsedContent {
    /// Create content from its parts.
    pub fn new(
        title: impl Into<String>,
        intro: impl Into<String>,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            title: title.into(),
            intro: intro.into(),
            sections,
        }
    }

    /// Check the outline invariants: at least one section, and every
    /// section carries at least one non-empty bullet.
    pub fn is_valid(&self) -> bool {
        !self.sections.is_empty() && self.sections.iter().all(Section::is_valid)
    }

    /// Total number of bullets across all sections.
    pub fn bullet_count(&self) -> usize {
        self.sections.iter().map(|s| s.bullets.len()).sum()
    }
}

/// A heading and its bullets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub bullets: Vec<String>,
}

impl Section {
    /// Create a section with no bullets.
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            bullets: Vec::new(),
        }
    }

    /// Create a section from a heading and a list of bullets.
    pub fn with_bullets<I, S>(heading: impl Into<String>, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            heading: heading.into(),
            bullets: bullets.into_iter().map(Into::into).collect(),
        }
    }

    /// Check that the section has at least one bullet and none are blank.
    pub fn is_valid(&self) -> bool {
        !self.bullets.is_empty() && self.bullets.iter().all(|b| !b.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        let content = ParsedContent::new(
            "Website",
            "Intro",
            vec![Section::with_bullets("Scope", ["Design", "Build"])],
        );
        assert!(content.is_valid());
        assert_eq!(content.bullet_count(), 2);

        let empty = ParsedContent::new("Website", "Intro", vec![]);
        assert!(!empty.is_valid());

        let blank = ParsedContent::new(
            "Website",
            "Intro",
            vec![Section::with_bullets("S", [" "])],
        );
        assert!(!blank.is_valid());
        assert!(!Section::new("Bare").is_valid());
    }
}
