// src/application/note_board.rs
use crate::application::RemoteGateway;
use crate::domain::Note;
use crate::util::text::plural;
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// Notes kept when both the tag filter and the text filter accept them.
///
/// Selected tags combine with OR, the two filters with AND. A blank query
/// matches everything; otherwise it is matched case-insensitively against the
/// text and every tag.
pub fn filter_notes<'a>(
    notes: &'a [Note],
    selected_tags: &BTreeSet<String>,
    query: &str,
) -> Vec<&'a Note> {
    let needle = (!query.trim().is_empty()).then(|| query.to_lowercase());
    notes
        .iter()
        .filter(|note| selected_tags.is_empty() || note.tags.iter().any(|t| selected_tags.contains(t)))
        .filter(|note| match &needle {
            None => true,
            Some(needle) => {
                note.text.to_lowercase().contains(needle.as_str())
                    || note.tags.iter().any(|t| t.to_lowercase().contains(needle.as_str()))
            }
        })
        .collect()
}

/// Working set of the notes screen.
#[derive(Debug, Default)]
pub struct NoteBoard {
    notes: Vec<Note>,
    all_tags: Vec<String>,
    selected_tags: BTreeSet<String>,
    query: String,
    loading: bool,
}

impl NoteBoard {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Every distinct tag across loaded notes, sorted.
    pub fn all_tags(&self) -> &[String] {
        &self.all_tags
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected_tags
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_filters(&self) -> bool {
        !self.selected_tags.is_empty() || !self.query.is_empty()
    }

    #[instrument(level = "debug", skip_all)]
    pub fn load_notes<G: RemoteGateway>(&mut self, gateway: &mut G) {
        match gateway.list_notes() {
            Ok(notes) => {
                debug!(count = notes.len(), "Loaded notes");
                self.all_tags = notes
                    .iter()
                    .flat_map(|n| n.tags.iter().cloned())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                self.notes = notes;
            }
            Err(e) => warn!(error = %e, "Error loading notes"),
        }
        self.loading = false;
    }

    /// Select `tag` if unselected, deselect it otherwise.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.selected_tags.remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_filters(&mut self) {
        self.selected_tags.clear();
        self.query.clear();
    }

    pub fn visible(&self) -> Vec<&Note> {
        filter_notes(&self.notes, &self.selected_tags, &self.query)
    }

    /// `"3 notes"` when nothing is filtered out, `"1 of 3 notes"` otherwise.
    pub fn summary(&self) -> String {
        let total = plural(self.notes.len(), "note");
        let shown = self.visible().len();
        if shown == self.notes.len() {
            total
        } else {
            format!("{} of {}", shown, total)
        }
    }
}
