// src/application/auth.rs
use crate::application::Authenticator;
use crate::domain::{DomainError, Route, Session};
use tracing::{info, instrument};

fn credentials<'a>(email: &'a str, password: &'a str) -> Result<(&'a str, &'a str), DomainError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::Validation(format!("Invalid email address: '{}'", email)));
    }
    if password.is_empty() {
        return Err(DomainError::Validation("Password is required".to_string()));
    }
    Ok((email, password))
}

/// Password sign-in; the caller persists the returned session.
#[instrument(level = "debug", skip(auth, password))]
pub fn sign_in<A: Authenticator>(auth: &mut A, email: &str, password: &str) -> Result<Session, DomainError> {
    let (email, password) = credentials(email, password)?;
    let session = auth.sign_in(email, password)?;
    info!(user_id = %session.user.id, "Signed in");
    Ok(session)
}

/// Register an account. The user must confirm by email before signing in.
#[instrument(level = "debug", skip(auth, password))]
pub fn sign_up<A: Authenticator>(auth: &mut A, email: &str, password: &str) -> Result<Route, DomainError> {
    let (email, password) = credentials(email, password)?;
    auth.sign_up(email, password)?;
    Ok(Route::CheckEmail)
}
