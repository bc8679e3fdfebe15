// src/application/category_board.rs
use crate::application::RemoteGateway;
use crate::domain::{Category, DomainError, Response};
use tracing::{debug, instrument, warn};

/// Working set of the quick-answers screen: every category with its response
/// count, the selected category and that category's responses.
#[derive(Debug, Default)]
pub struct CategoryBoard {
    categories: Vec<Category>,
    selected_id: Option<String>,
    responses: Vec<Response>,
    loading: bool,
}

impl CategoryBoard {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&Category> {
        let id = self.selected_id.as_deref()?;
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// True until the first category load has finished, successfully or not.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Reload categories and their response counts.
    ///
    /// Selects the newest category when nothing is selected yet. Errors are
    /// logged and leave the previous list in place.
    #[instrument(level = "debug", skip_all)]
    pub fn load_categories<G: RemoteGateway>(&mut self, gateway: &mut G) {
        match fetch_categories(gateway) {
            Ok(categories) => {
                debug!(count = categories.len(), "Loaded categories");
                self.categories = categories;
                if self.selected_id.is_none() {
                    if let Some(first) = self.categories.first() {
                        let id = first.id.clone();
                        self.select(gateway, &id);
                    }
                }
            }
            Err(e) => warn!(error = %e, "Error loading categories"),
        }
        self.loading = false;
    }

    /// Switch the selection and load the responses of the new category.
    ///
    /// The response list is cleared before the load, so a failure leaves it empty.
    pub fn select<G: RemoteGateway>(&mut self, gateway: &mut G, category_id: &str) {
        debug!(category_id, "Selecting category");
        self.selected_id = Some(category_id.to_string());
        self.responses.clear();
        self.reload_responses(gateway);
    }

    /// Re-fetch responses of the selected category, keeping the old list on failure.
    #[instrument(level = "debug", skip_all)]
    pub fn reload_responses<G: RemoteGateway>(&mut self, gateway: &mut G) {
        let Some(category_id) = self.selected_id.clone() else {
            return;
        };
        match gateway.list_responses(&category_id) {
            Ok(responses) => {
                debug!(count = responses.len(), %category_id, "Loaded responses");
                self.responses = responses;
            }
            Err(e) => warn!(error = %e, %category_id, "Error loading responses"),
        }
    }

    /// Drop the selection and the visible responses.
    pub fn clear_selection(&mut self) {
        self.selected_id = None;
        self.responses.clear();
    }
}

fn fetch_categories<G: RemoteGateway>(gateway: &mut G) -> Result<Vec<Category>, DomainError> {
    let mut categories = gateway.list_categories()?;
    for category in categories.iter_mut() {
        category.response_count = gateway.count_responses(&category.id)?;
    }
    Ok(categories)
}
