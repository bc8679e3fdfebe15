// src/application/forms/delete_dialog.rs
use crate::application::RemoteGateway;
use crate::domain::{Category, DomainError, Note, Response};
use crate::util::text::plural;
use tracing::{info, warn};

/// A row that can be removed through a confirmation dialog.
pub trait Deletable: Clone {
    const ENTITY: &'static str;

    fn id(&self) -> &str;

    /// How the row is named in the confirmation prompt.
    fn label(&self) -> String;

    fn delete_from<G: RemoteGateway>(&self, gateway: &mut G) -> Result<(), DomainError>;
}

impl Deletable for Category {
    const ENTITY: &'static str = "category";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    /// Responses go first so that no orphaned response survives its category.
    ///
    /// When the category row itself cannot be removed, the error says how many
    /// responses are already gone.
    fn delete_from<G: RemoteGateway>(&self, gateway: &mut G) -> Result<(), DomainError> {
        let removed = gateway.delete_responses_in_category(&self.id)?;
        info!(category_id = %self.id, responses = removed, "Deleted category responses");
        gateway.delete_category(&self.id).map_err(|e| {
            if removed == 0 {
                return e;
            }
            let verb = if removed == 1 { "was" } else { "were" };
            DomainError::Backend(format!("{} ({} {} already deleted)", e, plural(removed, "response"), verb))
        })
    }
}

impl Deletable for Response {
    const ENTITY: &'static str = "response";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        crate::util::text::preview(&self.text, 40)
    }

    fn delete_from<G: RemoteGateway>(&self, gateway: &mut G) -> Result<(), DomainError> {
        gateway.delete_response(&self.id)
    }
}

impl Deletable for Note {
    const ENTITY: &'static str = "note";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        crate::util::text::preview(&self.text, 40)
    }

    fn delete_from<G: RemoteGateway>(&self, gateway: &mut G) -> Result<(), DomainError> {
        gateway.delete_note(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed(String),
    /// Confirm pressed with no target loaded.
    NoTarget,
}

#[derive(Debug)]
pub struct DeleteDialog<T: Deletable> {
    target: Option<T>,
    open: bool,
    loading: bool,
    error: Option<String>,
}

impl<T: Deletable> Default for DeleteDialog<T> {
    fn default() -> Self {
        Self {
            target: None,
            open: false,
            loading: false,
            error: None,
        }
    }
}

impl<T: Deletable> DeleteDialog<T> {
    pub fn open(&mut self, target: T) {
        self.target = Some(target);
        self.open = true;
        self.loading = false;
        self.error = None;
    }

    pub fn cancel(&mut self) {
        self.open = false;
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Swap in a reloaded copy of the pending row, keeping the dialog state.
    pub fn refresh_target(&mut self, target: T) {
        if self.target.as_ref().is_some_and(|t| t.id() == target.id()) {
            self.target = Some(target);
        }
    }

    /// Delete the target; on success close and hand the deleted row to `on_success`.
    pub fn confirm<G, S>(&mut self, gateway: &mut G, on_success: S) -> DeleteOutcome
    where
        G: RemoteGateway,
        S: FnOnce(&mut G, &T),
    {
        let Some(target) = self.target.clone() else {
            return DeleteOutcome::NoTarget;
        };
        self.loading = true;
        self.error = None;
        let result = target.delete_from(gateway);
        self.loading = false;

        match result {
            Ok(()) => {
                info!(entity = T::ENTITY, id = target.id(), "Deleted");
                on_success(gateway, &target);
                self.open = false;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                warn!(entity = T::ENTITY, id = target.id(), error = %e, "Error deleting");
                let message = e.to_string();
                self.error = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }
}
