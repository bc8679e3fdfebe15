// src/application/forms/tag_editor.rs
use crate::constants::TAG_MAX;

/// Trimmed, lowercased form of a tag as stored on a note.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagChange {
    Added(String),
    Empty,
    Duplicate(String),
    TooLong(String),
}

/// Working tag list of the note form plus the pending tag input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagEditor {
    tags: Vec<String>,
    pub input: String,
}

impl TagEditor {
    pub fn with_tags(tags: &[String]) -> Self {
        Self {
            tags: tags.to_vec(),
            input: String::new(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The add button is disabled while the input is blank.
    pub fn can_add(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Add the pending input; the input is cleared only when a tag was added.
    pub fn add_input(&mut self) -> TagChange {
        let change = self.add(&self.input.clone());
        if matches!(change, TagChange::Added(_)) {
            self.input.clear();
        }
        change
    }

    pub fn add(&mut self, raw: &str) -> TagChange {
        let tag = normalize_tag(raw);
        if tag.is_empty() {
            TagChange::Empty
        } else if tag.chars().count() > TAG_MAX {
            TagChange::TooLong(tag)
        } else if self.tags.contains(&tag) {
            TagChange::Duplicate(tag)
        } else {
            self.tags.push(tag.clone());
            TagChange::Added(tag)
        }
    }

    /// Returns false when the tag was not present.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn clear(&mut self) {
        self.tags.clear();
        self.input.clear();
    }
}
