// src/infrastructure/postgrest.rs
use crate::application::{Authenticator, RemoteGateway};
use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::domain::{
    Category, CategoryDraft, DomainError, Note, NoteDraft, Response, ResponseDraft, Session, User,
};
use crate::infrastructure::config::BackendConfig;
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

const CATEGORIES: &str = "categories";
const RESPONSES: &str = "responses";
const NOTES: &str = "notes";

/// Row and auth access to a hosted Postgres through its PostgREST and GoTrue endpoints.
///
/// Requests carry the project's anon key; once a session is attached its
/// access token is sent as the bearer so row-level security sees the user.
/// An expired access token is swapped once for a new one using the session's
/// refresh token.
pub struct PostgrestGateway {
    client: Client,
    base_url: String,
    anon_key: String,
    session: Option<Session>,
    refreshed: bool,
}

#[derive(Serialize)]
struct InsertRow<'a, D: Serialize> {
    #[serde(flatten)]
    draft: &'a D,
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<&'a str>,
}

#[derive(Serialize)]
struct UpdateRow<'a, D: Serialize> {
    #[serde(flatten)]
    draft: &'a D,
    updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: User,
}

impl From<TokenGrant> for Session {
    fn from(grant: TokenGrant) -> Self {
        Session {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            user: grant.user,
        }
    }
}

impl PostgrestGateway {
    pub fn new(backend: &BackendConfig, session: Option<Session>) -> Result<Self, DomainError> {
        if backend.url.trim().is_empty() {
            return Err(DomainError::Config(
                "Backend URL not configured (set [backend] url or --url)".to_string(),
            ));
        }
        if backend.anon_key.trim().is_empty() {
            return Err(DomainError::Config(
                "Backend anon key not configured (set [backend] anon_key or --anon-key)".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DomainError::Transport(e.to_string()))?;

        debug!(url = %backend.url, signed_in = session.is_some(), "Creating PostgrestGateway");
        Ok(Self {
            client,
            base_url: backend.url.trim().trim_end_matches('/').to_string(),
            anon_key: backend.anon_key.trim().to_string(),
            session,
            refreshed: false,
        })
    }

    /// The session obtained by a token refresh, once, so the caller can store it.
    pub fn take_refreshed_session(&mut self) -> Option<Session> {
        if !std::mem::take(&mut self.refreshed) {
            return None;
        }
        self.session.clone()
    }

    fn bearer(&self) -> &str {
        self.session
            .as_ref()
            .map(|s| s.access_token.as_str())
            .unwrap_or(&self.anon_key)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    fn rest(&self, method: Method, table: &str) -> RequestBuilder {
        self.request(method, format!("{}/rest/v1/{}", self.base_url, table))
    }

    fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, format!("{}/auth/v1/{}", self.base_url, path))
    }

    /// Token grants go out under the anon key; the access token may be the expired one.
    fn token_request(&self, grant_type: &str) -> RequestBuilder {
        self.client
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// `select=*`, optional `column=eq.value`, newest first.
    fn select_request(&self, table: &str, filter: Option<(&str, &str)>) -> RequestBuilder {
        let mut query = vec![("select".to_string(), "*".to_string())];
        if let Some((column, value)) = filter {
            query.push((column.to_string(), format!("eq.{}", value)));
        }
        query.push(("order".to_string(), "created_at.desc".to_string()));
        self.rest(Method::GET, table).query(&query)
    }

    fn count_request(&self, table: &str, column: &str, value: &str) -> RequestBuilder {
        self.rest(Method::HEAD, table)
            .query(&[("select", "*".to_string()), (column, format!("eq.{}", value))])
            .header("Prefer", "count=exact")
    }

    fn insert_request<B: Serialize>(&self, table: &str, body: &B) -> RequestBuilder {
        self.rest(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(body)
    }

    fn update_request<B: Serialize>(&self, table: &str, id: &str, body: &B) -> RequestBuilder {
        self.rest(Method::PATCH, table)
            .query(&[("id", format!("eq.{}", id))])
            .json(body)
    }

    fn delete_request(&self, table: &str, column: &str, value: &str) -> RequestBuilder {
        self.rest(Method::DELETE, table)
            .query(&[(column, format!("eq.{}", value))])
            .header("Prefer", "count=exact")
    }

    fn send(&self, request: RequestBuilder) -> Result<reqwest::blocking::Response, DomainError> {
        let response = request
            .send()
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        debug!(%status, %body, "Backend rejected request");
        Err(DomainError::Backend(backend_message(status, &body)))
    }

    fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DomainError> {
        self.send(request)?
            .json::<T>()
            .map_err(|e| DomainError::Backend(format!("Unexpected response body: {}", e)))
    }

    fn insert<T, D>(&self, table: &str, row: &InsertRow<'_, D>) -> Result<T, DomainError>
    where
        T: DeserializeOwned,
        D: Serialize,
    {
        let mut rows: Vec<T> = self.fetch(self.insert_request(table, row))?;
        if rows.is_empty() {
            return Err(DomainError::Backend(format!("Insert into {} returned no row", table)));
        }
        Ok(rows.remove(0))
    }

    fn update<D: Serialize>(&self, table: &str, id: &str, draft: &D, updated_at: DateTime<Utc>) -> Result<(), DomainError> {
        let row = UpdateRow { draft, updated_at };
        self.send(self.update_request(table, id, &row)).map(|_| ())
    }

    fn delete(&self, table: &str, column: &str, value: &str) -> Result<usize, DomainError> {
        let response = self.send(self.delete_request(table, column, value))?;
        Ok(content_range_total(&response).unwrap_or(0))
    }

    /// `None` when the auth service rejects the access token.
    fn lookup_user(&self) -> Result<Option<User>, DomainError> {
        let response = self
            .auth(Method::GET, "user")
            .send()
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(status = %response.status(), "Session rejected by auth service");
                Ok(None)
            }
            status if status.is_success() => response
                .json::<User>()
                .map(Some)
                .map_err(|e| DomainError::Backend(format!("Unexpected user body: {}", e))),
            status => {
                let body = response.text().unwrap_or_default();
                Err(DomainError::Backend(backend_message(status, &body)))
            }
        }
    }

    /// Trade the refresh token for a new session. `false` when there is no
    /// refresh token or the auth service refuses it.
    fn refresh_session(&mut self) -> Result<bool, DomainError> {
        let Some(refresh_token) = self.session.as_ref().and_then(|s| s.refresh_token.clone()) else {
            return Ok(false);
        };
        let response = self
            .token_request("refresh_token")
            .json(&RefreshGrant {
                refresh_token: &refresh_token,
            })
            .send()
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "Refresh token rejected");
            return Ok(false);
        }
        let grant: TokenGrant = response
            .json()
            .map_err(|e| DomainError::Backend(format!("Unexpected token body: {}", e)))?;
        info!(user_id = %grant.user.id, "Refreshed session");
        self.session = Some(grant.into());
        self.refreshed = true;
        Ok(true)
    }
}

fn content_range_total(response: &reqwest::blocking::Response) -> Option<usize> {
    response
        .headers()
        .get("content-range")
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range)
}

/// Total row count from a `Content-Range` header such as `0-24/57` or `*/0`.
pub fn parse_content_range(header: &str) -> Option<usize> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

/// Human-readable message from a PostgREST or GoTrue error body.
pub fn backend_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    if !body.trim().is_empty() {
        return body.trim().to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

impl RemoteGateway for PostgrestGateway {
    #[instrument(level = "debug", skip(self))]
    fn current_user(&mut self) -> Result<Option<User>, DomainError> {
        if self.session.is_none() {
            return Ok(None);
        }
        if let Some(user) = self.lookup_user()? {
            return Ok(Some(user));
        }
        if self.refresh_session()? {
            return self.lookup_user();
        }
        Ok(None)
    }

    #[instrument(level = "debug", skip(self))]
    fn list_categories(&mut self) -> Result<Vec<Category>, DomainError> {
        self.fetch(self.select_request(CATEGORIES, None))
    }

    #[instrument(level = "debug", skip(self, draft))]
    fn insert_category(&mut self, draft: &CategoryDraft, user_id: &str) -> Result<Category, DomainError> {
        let category: Category = self.insert(
            CATEGORIES,
            &InsertRow {
                draft,
                user_id,
                category_id: None,
            },
        )?;
        info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    #[instrument(level = "debug", skip(self, draft))]
    fn update_category(&mut self, id: &str, draft: &CategoryDraft, updated_at: DateTime<Utc>) -> Result<(), DomainError> {
        self.update(CATEGORIES, id, draft, updated_at)
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_category(&mut self, id: &str) -> Result<(), DomainError> {
        self.delete(CATEGORIES, "id", id).map(|_| ())
    }

    #[instrument(level = "debug", skip(self))]
    fn count_responses(&mut self, category_id: &str) -> Result<usize, DomainError> {
        let response = self.send(self.count_request(RESPONSES, "category_id", category_id))?;
        content_range_total(&response)
            .ok_or_else(|| DomainError::Backend("Missing Content-Range in count response".to_string()))
    }

    #[instrument(level = "debug", skip(self))]
    fn list_responses(&mut self, category_id: &str) -> Result<Vec<Response>, DomainError> {
        self.fetch(self.select_request(RESPONSES, Some(("category_id", category_id))))
    }

    #[instrument(level = "debug", skip(self))]
    fn find_response(&mut self, id: &str) -> Result<Option<Response>, DomainError> {
        let rows: Vec<Response> = self.fetch(self.select_request(RESPONSES, Some(("id", id))))?;
        Ok(rows.into_iter().next())
    }

    #[instrument(level = "debug", skip(self, draft))]
    fn insert_response(&mut self, draft: &ResponseDraft, category_id: &str, user_id: &str) -> Result<Response, DomainError> {
        let response: Response = self.insert(
            RESPONSES,
            &InsertRow {
                draft,
                user_id,
                category_id: Some(category_id),
            },
        )?;
        info!(response_id = %response.id, category_id, "Created response");
        Ok(response)
    }

    #[instrument(level = "debug", skip(self, draft))]
    fn update_response(&mut self, id: &str, draft: &ResponseDraft, updated_at: DateTime<Utc>) -> Result<(), DomainError> {
        self.update(RESPONSES, id, draft, updated_at)
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_response(&mut self, id: &str) -> Result<(), DomainError> {
        self.delete(RESPONSES, "id", id).map(|_| ())
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_responses_in_category(&mut self, category_id: &str) -> Result<usize, DomainError> {
        self.delete(RESPONSES, "category_id", category_id)
    }

    #[instrument(level = "debug", skip(self))]
    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError> {
        self.fetch(self.select_request(NOTES, None))
    }

    #[instrument(level = "debug", skip(self, draft))]
    fn insert_note(&mut self, draft: &NoteDraft, user_id: &str) -> Result<Note, DomainError> {
        let note: Note = self.insert(
            NOTES,
            &InsertRow {
                draft,
                user_id,
                category_id: None,
            },
        )?;
        info!(note_id = %note.id, "Created note");
        Ok(note)
    }

    #[instrument(level = "debug", skip(self, draft))]
    fn update_note(&mut self, id: &str, draft: &NoteDraft, updated_at: DateTime<Utc>) -> Result<(), DomainError> {
        self.update(NOTES, id, draft, updated_at)
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_note(&mut self, id: &str) -> Result<(), DomainError> {
        self.delete(NOTES, "id", id).map(|_| ())
    }
}

impl Authenticator for PostgrestGateway {
    #[instrument(level = "debug", skip(self, password))]
    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, DomainError> {
        let grant: TokenGrant = self.fetch(
            self.token_request("password")
                .json(&Credentials { email, password }),
        )?;
        let session = Session::from(grant);
        info!(user_id = %session.user.id, "Signed in");
        self.session = Some(session.clone());
        Ok(session)
    }

    #[instrument(level = "debug", skip(self, password))]
    fn sign_up(&mut self, email: &str, password: &str) -> Result<(), DomainError> {
        self.send(
            self.auth(Method::POST, "signup")
                .json(&Credentials { email, password }),
        )?;
        info!(email, "Registered, confirmation pending");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn gateway(session: Option<Session>) -> PostgrestGateway {
        PostgrestGateway::new(
            &BackendConfig {
                url: "https://project.supabase.co/".to_string(),
                anon_key: "anon-key".to_string(),
            },
            session,
        )
        .expect("gateway should build")
    }

    fn session() -> Session {
        Session {
            access_token: "user-token".to_string(),
            refresh_token: None,
            user: User {
                id: "user-1".to_string(),
                email: None,
            },
        }
    }

    #[test]
    fn given_missing_url_when_creating_then_returns_config_error() {
        let result = PostgrestGateway::new(
            &BackendConfig {
                url: " ".to_string(),
                anon_key: "k".to_string(),
            },
            None,
        );

        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn given_filtered_select_when_building_then_uses_eq_filter_and_newest_first() {
        let request = gateway(Some(session()))
            .select_request(RESPONSES, Some(("category_id", "abc")))
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://project.supabase.co/rest/v1/responses?select=*&category_id=eq.abc&order=created_at.desc"
        );
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer user-token");
    }

    #[test]
    fn given_no_session_when_building_then_bears_anon_key() {
        let request = gateway(None).select_request(NOTES, None).build().unwrap();

        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn given_count_when_building_then_sends_head_with_exact_count() {
        let request = gateway(Some(session()))
            .count_request(RESPONSES, "category_id", "abc")
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::HEAD);
        assert_eq!(request.headers()["prefer"], "count=exact");
        assert!(request.url().as_str().ends_with("category_id=eq.abc"));
    }

    #[test]
    fn given_insert_when_building_then_body_carries_owner_and_category() {
        let draft = ResponseDraft {
            text: "Hola".to_string(),
            language: crate::domain::Language::Spanish,
        };
        let row = InsertRow {
            draft: &draft,
            user_id: "user-1",
            category_id: Some("cat-1"),
        };
        let request = gateway(Some(session()))
            .insert_request(RESPONSES, &row)
            .build()
            .unwrap();

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.headers()["prefer"], "return=representation");
        assert_eq!(
            json,
            serde_json::json!({"text": "Hola", "language": "Spanish", "user_id": "user-1", "category_id": "cat-1"})
        );
    }

    #[test]
    fn given_category_insert_when_serializing_then_omits_category_id() {
        let draft = CategoryDraft {
            title: "Greetings".to_string(),
            description: String::new(),
        };
        let row = InsertRow {
            draft: &draft,
            user_id: "user-1",
            category_id: None,
        };

        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"title": "Greetings", "description": "", "user_id": "user-1"})
        );
    }

    #[test]
    fn given_update_when_building_then_patches_by_id_with_timestamp() {
        let draft = NoteDraft {
            text: "t".to_string(),
            tags: vec!["vip".to_string()],
        };
        let row = UpdateRow {
            draft: &draft,
            updated_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        };
        let request = gateway(Some(session()))
            .update_request(NOTES, "n-1", &row)
            .build()
            .unwrap();

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(request.method(), Method::PATCH);
        assert!(request.url().as_str().ends_with("/rest/v1/notes?id=eq.n-1"));
        assert_eq!(json["tags"], serde_json::json!(["vip"]));
        assert_eq!(json["updated_at"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn given_cascade_delete_when_building_then_filters_by_category() {
        let request = gateway(Some(session()))
            .delete_request(RESPONSES, "category_id", "cat-1")
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::DELETE);
        assert!(request.url().as_str().ends_with("/rest/v1/responses?category_id=eq.cat-1"));
    }

    #[test]
    fn given_refresh_when_building_token_request_then_bears_anon_key() {
        let request = gateway(Some(session()))
            .token_request("refresh_token")
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://project.supabase.co/auth/v1/token?grant_type=refresh_token"
        );
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn given_no_refresh_when_taking_session_then_returns_none() {
        let mut gateway = gateway(Some(session()));

        assert_eq!(gateway.take_refreshed_session(), None);
    }

    #[rstest]
    #[case("0-24/57", Some(57))]
    #[case("*/0", Some(0))]
    #[case("*/*", None)]
    #[case("garbage", None)]
    fn given_content_range_when_parsing_then_extracts_total(
        #[case] header: &str,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(parse_content_range(header), expected);
    }

    #[rstest]
    #[case(r#"{"code":"23505","message":"duplicate key value"}"#, "duplicate key value")]
    #[case(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#, "Invalid login credentials")]
    #[case(r#"{"msg":"User already registered"}"#, "User already registered")]
    #[case("plain failure", "plain failure")]
    #[case("", "Bad Request")]
    fn given_error_body_when_extracting_then_returns_raw_message(
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(backend_message(StatusCode::BAD_REQUEST, body), expected);
    }

    #[test]
    fn given_row_with_nulls_when_deserializing_then_uses_defaults() {
        let json = r#"[{"id":"c1","title":"T","description":null,"user_id":"u","created_at":"2024-01-01T12:00:00.123456+00:00","updated_at":null}]"#;

        let rows: Vec<Category> = serde_json::from_str(json).unwrap();

        assert_eq!(rows[0].description, "");
        assert_eq!(rows[0].response_count, 0);
        let notes: Vec<Note> = serde_json::from_str(
            r#"[{"id":"n1","text":"x","tags":null,"user_id":"u","created_at":"2024-01-01T12:00:00Z"}]"#,
        )
        .unwrap();
        assert!(notes[0].tags.is_empty());
    }
}
