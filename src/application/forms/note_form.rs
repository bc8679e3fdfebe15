// src/application/forms/note_form.rs
use super::{require, run_submit, FormState, SubmitOutcome, TagChange, TagEditor};
use crate::application::RemoteGateway;
use crate::constants::TEXT_MAX;
use crate::domain::{Note, NoteDraft};
use chrono::Utc;
use tracing::instrument;

/// Which note-form field has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Text,
    TagInput,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Enter in the tag input adds the tag instead of submitting.
    Tag(TagChange),
    Newline,
    Submit,
}

#[derive(Debug, Default)]
pub struct NoteForm {
    state: FormState,
    editing: Option<Note>,
    pub text: String,
    pub tags: TagEditor,
}

impl NoteForm {
    pub fn open_create(&mut self) {
        self.editing = None;
        self.text.clear();
        self.tags.clear();
        self.state.reopen();
    }

    pub fn open_edit(&mut self, note: &Note) {
        self.editing = Some(note.clone());
        self.text = note.text.clone();
        self.tags = TagEditor::with_tags(&note.tags);
        self.state.reopen();
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn editing(&self) -> Option<&Note> {
        self.editing.as_ref()
    }

    /// Handle the Enter key for the focused field.
    ///
    /// Only `KeyAction::Submit` should lead to `submit`.
    pub fn on_enter(&mut self, focus: Focus) -> KeyAction {
        match focus {
            Focus::TagInput => KeyAction::Tag(self.tags.add_input()),
            Focus::Text => {
                self.text.push('\n');
                KeyAction::Newline
            }
            Focus::Other => KeyAction::Submit,
        }
    }

    pub fn draft(&self) -> Result<NoteDraft, String> {
        Ok(NoteDraft {
            text: require("Note text", &self.text, TEXT_MAX)?,
            tags: self.tags.tags().to_vec(),
        })
    }

    pub fn can_submit(&self) -> bool {
        !self.state.is_loading() && self.draft().is_ok()
    }

    #[instrument(level = "debug", skip_all, fields(editing = self.editing.is_some()))]
    pub fn submit<G, S>(&mut self, gateway: &mut G, on_success: S) -> SubmitOutcome
    where
        G: RemoteGateway,
        S: FnOnce(&mut G),
    {
        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(reason) => return SubmitOutcome::Blocked(reason),
        };
        let editing_id = self.editing.as_ref().map(|n| n.id.clone());

        let outcome = run_submit(
            &mut self.state,
            gateway,
            |gateway, user| match &editing_id {
                Some(id) => gateway.update_note(id, &draft, Utc::now()),
                None => gateway.insert_note(&draft, &user.id).map(|_| ()),
            },
            on_success,
        );
        if outcome == SubmitOutcome::Saved {
            self.close();
        }
        outcome
    }
}
