// src/application/forms/category_form.rs
use super::{require, run_submit, within, FormState, SubmitOutcome};
use crate::application::RemoteGateway;
use crate::constants::{CATEGORY_DESCRIPTION_MAX, CATEGORY_TITLE_MAX};
use crate::domain::{Category, CategoryDraft};
use chrono::Utc;
use tracing::instrument;

#[derive(Debug, Default)]
pub struct CategoryForm {
    state: FormState,
    editing: Option<Category>,
    pub title: String,
    pub description: String,
}

impl CategoryForm {
    pub fn open_create(&mut self) {
        self.editing = None;
        self.title.clear();
        self.description.clear();
        self.state.reopen();
    }

    pub fn open_edit(&mut self, category: &Category) {
        self.editing = Some(category.clone());
        self.title = category.title.clone();
        self.description = category.description.clone();
        self.state.reopen();
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn editing(&self) -> Option<&Category> {
        self.editing.as_ref()
    }

    pub fn draft(&self) -> Result<CategoryDraft, String> {
        Ok(CategoryDraft {
            title: require("Title", &self.title, CATEGORY_TITLE_MAX)?,
            description: within("Description", self.description.trim(), CATEGORY_DESCRIPTION_MAX)?,
        })
    }

    /// Mirrors the enabled state of the submit control.
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading() && self.draft().is_ok()
    }

    /// Insert or update the category, then call `on_success` and close.
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
        let editing_id = self.editing.as_ref().map(|c| c.id.clone());

        let outcome = run_submit(
            &mut self.state,
            gateway,
            |gateway, user| match &editing_id {
                Some(id) => gateway.update_category(id, &draft, Utc::now()),
                None => gateway.insert_category(&draft, &user.id).map(|_| ()),
            },
            on_success,
        );
        if outcome == SubmitOutcome::Saved {
            self.close();
        }
        outcome
    }
}
