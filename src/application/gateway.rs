// src/application/gateway.rs
use crate::domain::{
    Category, CategoryDraft, DomainError, Note, NoteDraft, Response, ResponseDraft, User,
};
use chrono::{DateTime, Utc};

/// Authenticated row access to the `categories`, `responses` and `notes` tables.
///
/// Lists come back ordered by `created_at` descending. Identifiers are assigned
/// by the backend on insert.
pub trait RemoteGateway {
    /// The identity bound to the current session, or `None` when signed out.
    fn current_user(&mut self) -> Result<Option<User>, DomainError>;

    fn list_categories(&mut self) -> Result<Vec<Category>, DomainError>;
    fn insert_category(
        &mut self,
        draft: &CategoryDraft,
        user_id: &str,
    ) -> Result<Category, DomainError>;
    fn update_category(
        &mut self,
        id: &str,
        draft: &CategoryDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
    fn delete_category(&mut self, id: &str) -> Result<(), DomainError>;

    /// Count-only select over responses of one category.
    fn count_responses(&mut self, category_id: &str) -> Result<usize, DomainError>;
    fn list_responses(&mut self, category_id: &str) -> Result<Vec<Response>, DomainError>;
    fn find_response(&mut self, id: &str) -> Result<Option<Response>, DomainError>;
    fn insert_response(
        &mut self,
        draft: &ResponseDraft,
        category_id: &str,
        user_id: &str,
    ) -> Result<Response, DomainError>;
    fn update_response(
        &mut self,
        id: &str,
        draft: &ResponseDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
    fn delete_response(&mut self, id: &str) -> Result<(), DomainError>;
    /// Delete every response of a category; returns how many rows went away.
    fn delete_responses_in_category(&mut self, category_id: &str) -> Result<usize, DomainError>;

    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError>;
    fn insert_note(&mut self, draft: &NoteDraft, user_id: &str) -> Result<Note, DomainError>;
    fn update_note(
        &mut self,
        id: &str,
        draft: &NoteDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
    fn delete_note(&mut self, id: &str) -> Result<(), DomainError>;
}

/// Credential exchange with the auth service.
pub trait Authenticator {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<crate::domain::Session, DomainError>;
    fn sign_up(&mut self, email: &str, password: &str) -> Result<(), DomainError>;
}

/// Lets a screen borrow a gateway the caller keeps using afterwards.
impl<G: RemoteGateway + ?Sized> RemoteGateway for &mut G {
    fn current_user(&mut self) -> Result<Option<User>, DomainError> {
        (**self).current_user()
    }

    fn list_categories(&mut self) -> Result<Vec<Category>, DomainError> {
        (**self).list_categories()
    }

    fn insert_category(
        &mut self,
        draft: &CategoryDraft,
        user_id: &str,
    ) -> Result<Category, DomainError> {
        (**self).insert_category(draft, user_id)
    }

    fn update_category(
        &mut self,
        id: &str,
        draft: &CategoryDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        (**self).update_category(id, draft, updated_at)
    }

    fn delete_category(&mut self, id: &str) -> Result<(), DomainError> {
        (**self).delete_category(id)
    }

    fn count_responses(&mut self, category_id: &str) -> Result<usize, DomainError> {
        (**self).count_responses(category_id)
    }

    fn list_responses(&mut self, category_id: &str) -> Result<Vec<Response>, DomainError> {
        (**self).list_responses(category_id)
    }

    fn find_response(&mut self, id: &str) -> Result<Option<Response>, DomainError> {
        (**self).find_response(id)
    }

    fn insert_response(
        &mut self,
        draft: &ResponseDraft,
        category_id: &str,
        user_id: &str,
    ) -> Result<Response, DomainError> {
        (**self).insert_response(draft, category_id, user_id)
    }

    fn update_response(
        &mut self,
        id: &str,
        draft: &ResponseDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        (**self).update_response(id, draft, updated_at)
    }

    fn delete_response(&mut self, id: &str) -> Result<(), DomainError> {
        (**self).delete_response(id)
    }

    fn delete_responses_in_category(&mut self, category_id: &str) -> Result<usize, DomainError> {
        (**self).delete_responses_in_category(category_id)
    }

    fn list_notes(&mut self) -> Result<Vec<Note>, DomainError> {
        (**self).list_notes()
    }

    fn insert_note(&mut self, draft: &NoteDraft, user_id: &str) -> Result<Note, DomainError> {
        (**self).insert_note(draft, user_id)
    }

    fn update_note(
        &mut self,
        id: &str,
        draft: &NoteDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        (**self).update_note(id, draft, updated_at)
    }

    fn delete_note(&mut self, id: &str) -> Result<(), DomainError> {
        (**self).delete_note(id)
    }
}
