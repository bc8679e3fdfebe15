// src/application/forms/mod.rs
//
// Create/edit forms and delete confirmations. Each form owns its field state,
// receives the gateway and a success callback at submit time, and stays open
// with an inline error when the backend rejects the write.
pub mod category_form;
pub mod delete_dialog;
pub mod note_form;
pub mod response_form;
pub mod tag_editor;

pub use category_form::CategoryForm;
pub use delete_dialog::{DeleteDialog, DeleteOutcome, Deletable};
pub use note_form::{Focus, KeyAction, NoteForm};
pub use response_form::ResponseForm;
pub use tag_editor::{normalize_tag, TagChange, TagEditor};

use crate::application::RemoteGateway;
use crate::domain::{DomainError, User};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Written to the backend; the form is closed.
    Saved,
    /// Backend rejected the write; the message is shown inline and the form stays open.
    Failed(String),
    /// Submit control disabled; nothing was sent.
    Blocked(String),
}

/// Open/loading/error flags shared by every form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormState {
    open: bool,
    loading: bool,
    error: Option<String>,
}

impl FormState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn reopen(&mut self) {
        self.open = true;
        self.loading = false;
        self.error = None;
    }

    fn close(&mut self) {
        *self = Self::default();
    }
}

/// Run one submit: confirm the user, persist, then either hand over to
/// `on_success` and close, or record the failure inline.
fn run_submit<G, P, S>(state: &mut FormState, gateway: &mut G, persist: P, on_success: S) -> SubmitOutcome
where
    G: RemoteGateway,
    P: FnOnce(&mut G, &User) -> Result<(), DomainError>,
    S: FnOnce(&mut G),
{
    if state.loading {
        return SubmitOutcome::Blocked("Already saving".to_string());
    }
    state.loading = true;
    state.error = None;

    let result = gateway
        .current_user()
        .and_then(|user| user.ok_or(DomainError::NotAuthenticated))
        .and_then(|user| persist(gateway, &user));
    state.loading = false;

    match result {
        Ok(()) => {
            debug!("Form saved");
            on_success(gateway);
            state.close();
            SubmitOutcome::Saved
        }
        Err(e) => {
            warn!(error = %e, "Form submit failed");
            let message = e.to_string();
            state.error = Some(message.clone());
            SubmitOutcome::Failed(message)
        }
    }
}

/// Required field, non-blank after trimming and within `max` characters.
fn require(label: &str, value: &str, max: usize) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }
    within(label, trimmed, max)
}

fn within(label: &str, value: &str, max: usize) -> Result<String, String> {
    if value.chars().count() > max {
        return Err(format!("{} must be at most {} characters", label, max));
    }
    Ok(value.to_string())
}
