// src/application/forms/response_form.rs
use super::{require, run_submit, FormState, SubmitOutcome};
use crate::application::RemoteGateway;
use crate::constants::TEXT_MAX;
use crate::domain::{Language, Response, ResponseDraft};
use chrono::Utc;
use tracing::instrument;

enum Target {
    Update(String),
    Insert(String),
}

#[derive(Debug, Default)]
pub struct ResponseForm {
    state: FormState,
    editing: Option<Response>,
    pub text: String,
    pub language: Language,
}

impl ResponseForm {
    pub fn open_create(&mut self) {
        self.editing = None;
        self.text.clear();
        self.language = Language::default();
        self.state.reopen();
    }

    pub fn open_edit(&mut self, response: &Response) {
        self.editing = Some(response.clone());
        self.text = response.text.clone();
        self.language = response.language;
        self.state.reopen();
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn editing(&self) -> Option<&Response> {
        self.editing.as_ref()
    }

    pub fn draft(&self) -> Result<ResponseDraft, String> {
        Ok(ResponseDraft {
            text: require("Response text", &self.text, TEXT_MAX)?,
            language: self.language,
        })
    }

    pub fn can_submit(&self) -> bool {
        !self.state.is_loading() && self.draft().is_ok()
    }

    /// Insert into `category_id` or update the edited response.
    #[instrument(level = "debug", skip_all, fields(category_id = ?category_id))]
    pub fn submit<G, S>(&mut self, gateway: &mut G, category_id: Option<&str>, on_success: S) -> SubmitOutcome
    where
        G: RemoteGateway,
        S: FnOnce(&mut G),
    {
        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(reason) => return SubmitOutcome::Blocked(reason),
        };
        let target = match (&self.editing, category_id) {
            (Some(response), _) => Target::Update(response.id.clone()),
            (None, Some(category_id)) => Target::Insert(category_id.to_string()),
            (None, None) => return SubmitOutcome::Blocked("Select a category first".to_string()),
        };

        let outcome = run_submit(
            &mut self.state,
            gateway,
            |gateway, user| match &target {
                Target::Update(id) => gateway.update_response(id, &draft, Utc::now()),
                Target::Insert(category_id) => gateway
                    .insert_response(&draft, category_id, &user.id)
                    .map(|_| ()),
            },
            on_success,
        );
        if outcome == SubmitOutcome::Saved {
            self.close();
        }
        outcome
    }
}
