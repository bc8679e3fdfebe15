// src/application/screens/quick_answers.rs
use super::Mount;
use crate::application::forms::{CategoryForm, DeleteDialog, DeleteOutcome, ResponseForm, SubmitOutcome};
use crate::application::session_guard::{GuardOutcome, SessionGuard};
use crate::application::{CategoryBoard, RemoteGateway};
use crate::domain::{Category, DomainError, Response, User};
use tracing::{debug, info};

/// Categories sidebar plus the responses of the selected category.
pub struct QuickAnswersScreen<G: RemoteGateway> {
    gateway: G,
    user: Option<User>,
    board: CategoryBoard,
    category_form: CategoryForm,
    delete_category: DeleteDialog<Category>,
    response_form: ResponseForm,
    delete_response: DeleteDialog<Response>,
}

impl<G: RemoteGateway> QuickAnswersScreen<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            user: None,
            board: CategoryBoard::new(),
            category_form: CategoryForm::default(),
            delete_category: DeleteDialog::default(),
            response_form: ResponseForm::default(),
            delete_response: DeleteDialog::default(),
        }
    }

    /// Check the session, then load categories (and the first category's responses).
    pub fn mount(&mut self) -> Mount {
        match SessionGuard::check(&mut self.gateway) {
            GuardOutcome::Proceed(user) => {
                info!(user_id = %user.id, "Mounting quick answers");
                self.user = Some(user);
                self.board.load_categories(&mut self.gateway);
                Mount::Ready
            }
            GuardOutcome::Redirect(route) => Mount::Redirect(route),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn board(&self) -> &CategoryBoard {
        &self.board
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn select_category(&mut self, category_id: &str) -> Result<(), DomainError> {
        if self.board.category(category_id).is_none() {
            return Err(DomainError::not_found("Category", category_id));
        }
        self.board.select(&mut self.gateway, category_id);
        Ok(())
    }

    // Categories

    pub fn category_form(&self) -> &CategoryForm {
        &self.category_form
    }

    pub fn category_form_mut(&mut self) -> &mut CategoryForm {
        &mut self.category_form
    }

    pub fn open_add_category(&mut self) -> &mut CategoryForm {
        self.category_form.open_create();
        &mut self.category_form
    }

    pub fn open_edit_category(&mut self, category_id: &str) -> Result<&mut CategoryForm, DomainError> {
        let category = self
            .board
            .category(category_id)
            .ok_or_else(|| DomainError::not_found("Category", category_id))?;
        self.category_form.open_edit(category);
        Ok(&mut self.category_form)
    }

    pub fn submit_category_form(&mut self) -> SubmitOutcome {
        let board = &mut self.board;
        self.category_form
            .submit(&mut self.gateway, |gateway| board.load_categories(gateway))
    }

    pub fn delete_category_dialog(&self) -> &DeleteDialog<Category> {
        &self.delete_category
    }

    /// Open the confirmation for a category; its response count is the one known now.
    pub fn request_delete_category(&mut self, category_id: &str) -> Result<&DeleteDialog<Category>, DomainError> {
        let category = self
            .board
            .category(category_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Category", category_id))?;
        self.delete_category.open(category);
        Ok(&self.delete_category)
    }

    pub fn cancel_delete_category(&mut self) {
        self.delete_category.cancel();
    }

    /// Delete the pending category, reload, and drop the selection if it was the deleted one.
    ///
    /// A failure can follow a partial cascade, so the board and the pending
    /// row's count are reloaded then too.
    pub fn confirm_delete_category(&mut self) -> DeleteOutcome {
        let board = &mut self.board;
        let outcome = self.delete_category.confirm(&mut self.gateway, |gateway, deleted| {
            board.load_categories(gateway);
            if board.selected_id() == Some(deleted.id.as_str()) {
                debug!(category_id = %deleted.id, "Deleted category was selected");
                board.clear_selection();
            }
        });
        if let DeleteOutcome::Failed(_) = outcome {
            self.board.reload_responses(&mut self.gateway);
            self.board.load_categories(&mut self.gateway);
            let pending = self
                .delete_category
                .target()
                .and_then(|target| self.board.category(&target.id))
                .cloned();
            if let Some(category) = pending {
                self.delete_category.refresh_target(category);
            }
        }
        outcome
    }

    // Responses

    pub fn response_form(&self) -> &ResponseForm {
        &self.response_form
    }

    pub fn response_form_mut(&mut self) -> &mut ResponseForm {
        &mut self.response_form
    }

    pub fn open_add_response(&mut self) -> Result<&mut ResponseForm, DomainError> {
        if self.board.selected().is_none() {
            return Err(DomainError::Validation("Select a category first".to_string()));
        }
        self.response_form.open_create();
        Ok(&mut self.response_form)
    }

    pub fn open_edit_response(&mut self, response_id: &str) -> Result<&mut ResponseForm, DomainError> {
        let response = self.locate_response(response_id)?;
        self.response_form.open_edit(&response);
        Ok(&mut self.response_form)
    }

    /// Save the response form, then refresh responses and category counts.
    pub fn submit_response_form(&mut self) -> SubmitOutcome {
        let board = &mut self.board;
        let category_id = board.selected_id().map(str::to_string);
        self.response_form
            .submit(&mut self.gateway, category_id.as_deref(), |gateway| {
                board.reload_responses(gateway);
                board.load_categories(gateway);
            })
    }

    pub fn delete_response_dialog(&self) -> &DeleteDialog<Response> {
        &self.delete_response
    }

    pub fn request_delete_response(&mut self, response_id: &str) -> Result<&DeleteDialog<Response>, DomainError> {
        let response = self.locate_response(response_id)?;
        self.delete_response.open(response);
        Ok(&self.delete_response)
    }

    pub fn cancel_delete_response(&mut self) {
        self.delete_response.cancel();
    }

    pub fn confirm_delete_response(&mut self) -> DeleteOutcome {
        let board = &mut self.board;
        self.delete_response.confirm(&mut self.gateway, |gateway, _| {
            board.reload_responses(gateway);
            board.load_categories(gateway);
        })
    }

    /// Find a response in the visible list, or look it up and select its category.
    pub fn locate_response(&mut self, response_id: &str) -> Result<Response, DomainError> {
        if let Some(response) = self.board.responses().iter().find(|r| r.id == response_id) {
            return Ok(response.clone());
        }
        let response = self
            .gateway
            .find_response(response_id)?
            .ok_or_else(|| DomainError::not_found("Response", response_id))?;
        debug!(response_id, category_id = %response.category_id, "Switching to response's category");
        self.select_category(&response.category_id)?;
        Ok(response)
    }
}
