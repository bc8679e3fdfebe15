// src/application/screens/notes.rs
use super::Mount;
use crate::application::forms::{DeleteDialog, DeleteOutcome, NoteForm, SubmitOutcome};
use crate::application::session_guard::{GuardOutcome, SessionGuard};
use crate::application::{NoteBoard, RemoteGateway};
use crate::domain::{DomainError, Note, User};
use tracing::info;

/// Filterable list of tagged notes.
pub struct NotesScreen<G: RemoteGateway> {
    gateway: G,
    user: Option<User>,
    board: NoteBoard,
    note_form: NoteForm,
    delete_note: DeleteDialog<Note>,
}

impl<G: RemoteGateway> NotesScreen<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            user: None,
            board: NoteBoard::new(),
            note_form: NoteForm::default(),
            delete_note: DeleteDialog::default(),
        }
    }

    pub fn mount(&mut self) -> Mount {
        match SessionGuard::check(&mut self.gateway) {
            GuardOutcome::Proceed(user) => {
                info!(user_id = %user.id, "Mounting notes");
                self.user = Some(user);
                self.board.load_notes(&mut self.gateway);
                Mount::Ready
            }
            GuardOutcome::Redirect(route) => Mount::Redirect(route),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn board(&self) -> &NoteBoard {
        &self.board
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.board.toggle_tag(tag);
    }

    pub fn set_query(&mut self, query: &str) {
        self.board.set_query(query);
    }

    pub fn clear_filters(&mut self) {
        self.board.clear_filters();
    }

    pub fn visible_notes(&self) -> Vec<&Note> {
        self.board.visible()
    }

    pub fn note_form(&self) -> &NoteForm {
        &self.note_form
    }

    pub fn note_form_mut(&mut self) -> &mut NoteForm {
        &mut self.note_form
    }

    pub fn open_add_note(&mut self) -> &mut NoteForm {
        self.note_form.open_create();
        &mut self.note_form
    }

    pub fn open_edit_note(&mut self, note_id: &str) -> Result<&mut NoteForm, DomainError> {
        let note = self
            .board
            .note(note_id)
            .ok_or_else(|| DomainError::not_found("Note", note_id))?;
        self.note_form.open_edit(note);
        Ok(&mut self.note_form)
    }

    pub fn submit_note_form(&mut self) -> SubmitOutcome {
        let board = &mut self.board;
        self.note_form
            .submit(&mut self.gateway, |gateway| board.load_notes(gateway))
    }

    pub fn delete_note_dialog(&self) -> &DeleteDialog<Note> {
        &self.delete_note
    }

    pub fn request_delete_note(&mut self, note_id: &str) -> Result<&DeleteDialog<Note>, DomainError> {
        let note = self
            .board
            .note(note_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Note", note_id))?;
        self.delete_note.open(note);
        Ok(&self.delete_note)
    }

    pub fn cancel_delete_note(&mut self) {
        self.delete_note.cancel();
    }

    pub fn confirm_delete_note(&mut self) -> DeleteOutcome {
        let board = &mut self.board;
        self.delete_note
            .confirm(&mut self.gateway, |gateway, _| board.load_notes(gateway))
    }
}
