// src/util/testing.rs

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{Authenticator, RemoteGateway};
use crate::cli::prompt::Prompter;
use crate::domain::{
    Category, CategoryDraft, DomainError, Language, Note, NoteDraft, Response, ResponseDraft,
    Session, User,
};

/// In-memory gateway for exercising screens, forms and boards without a backend
///
/// Rows get backend-style identifiers and strictly increasing `created_at`
/// values, so list ordering is deterministic. Every trait call is recorded by
/// name and any call can be made to fail.
///
/// # Examples
///
/// ```
/// use quick_answers::util::testing::MockGateway;
/// use quick_answers::domain::Language;
///
/// let gateway = MockGateway::builder()
///     .with_user("user-1")
///     .with_category("cat-1", "Greetings", "")
///     .with_response("resp-1", "cat-1", "Hola", Language::Spanish)
///     .build();
/// assert_eq!(gateway.responses().len(), 1);
/// ```
pub struct MockGateway {
    user: Option<User>,
    categories: Vec<Category>,
    responses: Vec<Response>,
    notes: Vec<Note>,
    accounts: HashMap<String, String>,
    failures: HashMap<String, DomainError>,
    calls: Vec<String>,
    next_id: u64,
    clock: DateTime<Utc>,
}

impl MockGateway {
    pub fn builder() -> MockGatewayBuilder {
        MockGatewayBuilder::new()
    }

    /// Names of the trait methods invoked so far, in order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == name).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Make every later call to `name` fail with `error`.
    pub fn fail_on(&mut self, name: &str, error: DomainError) {
        self.failures.insert(name.to_string(), error);
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    fn enter(&mut self, name: &str) -> Result<(), DomainError> {
        self.calls.push(name.to_string());
        match self.failures.get(name) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn assign_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += Duration::seconds(1);
        self.clock
    }

    fn require_user(&self) -> Result<&User, DomainError> {
        self.user.as_ref().ok_or(DomainError::NotAuthenticated)
    }
}

fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut rows = rows.to_vec();
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows
}

impl RemoteGateway for MockGateway {
    fn current_user(&mut self) -> Result<Option<User>, DomainError> {
        self.enter("current_user")?;
        Ok(self.user.clone())
    }

    fn list_categories(&mut self) -> Result<Vec<Category>, DomainError> {
        self.enter("list_categories")?;
        self.require_user()?;
        Ok(newest_first(&self.categories, |c| c.created_at))
    }

    fn insert_category(
        &mut self,
        draft: &CategoryDraft,
        user_id: &str,
    ) -> Result<Category, DomainError> {
        self.enter("insert_category")?;
        let category = Category {
            id: self.assign_id("cat"),
            title: draft.title.clone(),
            description: draft.description.clone(),
            user_id: user_id.to_string(),
            created_at: self.tick(),
            updated_at: None,
            response_count: 0,
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    fn update_category(
        &mut self,
        id: &str,
        draft: &CategoryDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.enter("update_category")?;
        if let Some(category) = self.categories.iter_mut().find(|c| c.id == id) {
            category.title = draft.title.clone();
            category.description = draft.description.clone();
            category.updated_at = Some(updated_at);
        }
        Ok(())
    }

    fn delete_category(&mut self, id: &str) -> Result<(), DomainError> {
        self.enter("delete_category")?;
        // No cascade here: responses survive unless deleted explicitly.
        self.categories.retain(|c| c.id != id);
        Ok(())
    }

    fn count_responses(&mut self, category_id: &str) -> Result<usize, DomainError> {
        self.enter("count_responses")?;
        Ok(self
            .responses
            .iter()
            .filter(|r| r.category_id == category_id)
            .count())
    }

    fn list_responses(&mut self, category_id: &str) -> Result<Vec<Response>, DomainError> {
        self.enter("list_responses")?;
        let rows: Vec<Response> = self
            .responses
            .iter()
            .filter(|r| r.category_id == category_id)
            .cloned()
            .collect();
        Ok(newest_first(&rows, |r| r.created_at))
    }

    fn find_response(&mut self, id: &str) -> Result<Option<Response>, DomainError> {
        self.enter("find_response")?;
        Ok(self.responses.iter().find(|r| r.id == id).cloned())
    }

    fn insert_response(
        &mut self,
        draft: &ResponseDraft,
        category_id: &str,
        user_id: &str,
    ) -> Result<Response, DomainError> {
        self.enter("insert_response")?;
        if !self.categories.iter().any(|c| c.id == category_id) {
            return Err(DomainError::Backend(
                "insert or update on table \"responses\" violates foreign key constraint \"responses_category_id_fkey\"".to_string(),
            ));
        }
        let response = Response {
            id: self.assign_id("resp"),
            text: draft.text.clone(),
            language: draft.language,
            category_id: category_id.to_string(),
            user_id: user_id.to_string(),
            created_at: self.tick(),
            updated_at: None,
        };
        self.responses.push(response.clone());
        Ok(response)
    }

    fn update_response(
        &mut self,
        id: &str,
        draft: &ResponseDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.enter("update_response")?;
        if let Some(response) = self.responses.iter_mut().find(|r| r.id == id) {
            response.text = draft.text.clone();
            response.language = draft.language;
            response.updated_at = Some(updated_at);
        }
        Ok(())
    }

    fn delete_response(&mut self, id: &str) -> Result<(), DomainError> {
        self.enter("delete_response")?;
        self.responses.retain(|r| r.id != id);
        Ok(())
    }

    fn delete_responses_in_category(&mut self, category_id: &str) -> Result<usize, DomainError> {
        self.enter("delete_responses_in_category")?;
        let before = self.responses.len();
        self.responses.retain(|r| r.category_id != category_id);
        Ok(before - self.responses.len())
    }

    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError> {
        self.enter("list_notes")?;
        Ok(newest_first(&self.notes, |n| n.created_at))
    }

    fn insert_note(&mut self, draft: &NoteDraft, user_id: &str) -> Result<Note, DomainError> {
        self.enter("insert_note")?;
        let note = Note {
            id: self.assign_id("note"),
            text: draft.text.clone(),
            tags: draft.tags.clone(),
            user_id: user_id.to_string(),
            created_at: self.tick(),
            updated_at: None,
        };
        self.notes.push(note.clone());
        Ok(note)
    }

    fn update_note(
        &mut self,
        id: &str,
        draft: &NoteDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.enter("update_note")?;
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
            note.text = draft.text.clone();
            note.tags = draft.tags.clone();
            note.updated_at = Some(updated_at);
        }
        Ok(())
    }

    fn delete_note(&mut self, id: &str) -> Result<(), DomainError> {
        self.enter("delete_note")?;
        self.notes.retain(|n| n.id != id);
        Ok(())
    }
}

impl Authenticator for MockGateway {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, DomainError> {
        self.enter("sign_in")?;
        if self.accounts.get(email).map(String::as_str) != Some(password) {
            return Err(DomainError::Backend("Invalid login credentials".to_string()));
        }
        let user = User {
            id: format!("uid-{}", email),
            email: Some(email.to_string()),
        };
        self.user = Some(user.clone());
        Ok(Session {
            access_token: format!("token-{}", email),
            refresh_token: None,
            user,
        })
    }

    fn sign_up(&mut self, email: &str, password: &str) -> Result<(), DomainError> {
        self.enter("sign_up")?;
        if self.accounts.contains_key(email) {
            return Err(DomainError::Backend("User already registered".to_string()));
        }
        self.accounts.insert(email.to_string(), password.to_string());
        Ok(())
    }
}

/// Builder for MockGateway
///
/// Seeded rows are created in call order, so later rows are newer.
pub struct MockGatewayBuilder {
    gateway: MockGateway,
}

impl MockGatewayBuilder {
    pub fn new() -> Self {
        Self {
            gateway: MockGateway {
                user: None,
                categories: vec![],
                responses: vec![],
                notes: vec![],
                accounts: HashMap::new(),
                failures: HashMap::new(),
                calls: vec![],
                next_id: 0,
                clock: Utc
                    .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
                    .single()
                    .unwrap_or_else(Utc::now),
            },
        }
    }

    /// Sign in as `user_id`
    pub fn with_user(mut self, user_id: &str) -> Self {
        self.gateway.user = Some(User {
            id: user_id.to_string(),
            email: Some(format!("{}@example.com", user_id)),
        });
        self
    }

    pub fn with_category(mut self, id: &str, title: &str, description: &str) -> Self {
        let created_at = self.gateway.tick();
        let user_id = self.owner();
        self.gateway.categories.push(Category {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            user_id,
            created_at,
            updated_at: None,
            response_count: 0,
        });
        self
    }

    pub fn with_response(
        mut self,
        id: &str,
        category_id: &str,
        text: &str,
        language: Language,
    ) -> Self {
        let created_at = self.gateway.tick();
        let user_id = self.owner();
        self.gateway.responses.push(Response {
            id: id.to_string(),
            text: text.to_string(),
            language,
            category_id: category_id.to_string(),
            user_id,
            created_at,
            updated_at: None,
        });
        self
    }

    pub fn with_note(mut self, id: &str, text: &str, tags: &[&str]) -> Self {
        let created_at = self.gateway.tick();
        let user_id = self.owner();
        self.gateway.notes.push(Note {
            id: id.to_string(),
            text: text.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            user_id,
            created_at,
            updated_at: None,
        });
        self
    }

    /// Register credentials accepted by `sign_in`
    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        self.gateway
            .accounts
            .insert(email.to_string(), password.to_string());
        self
    }

    /// Configure every call to `name` to fail with `error`
    pub fn failing_on(mut self, name: &str, error: DomainError) -> Self {
        self.gateway.fail_on(name, error);
        self
    }

    pub fn build(self) -> MockGateway {
        self.gateway
    }

    fn owner(&self) -> String {
        self.gateway
            .user
            .as_ref()
            .map(|u| u.id.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

impl Default for MockGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Canned answers, for driving commands without a terminal.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub confirm: bool,
    pub password: String,
    pub asked: Vec<String>,
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        self.asked.push(message.to_string());
        Ok(self.confirm)
    }

    fn password(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        Ok(self.password.clone())
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "rustls", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
