// src/application/session_guard.rs
use crate::application::RemoteGateway;
use crate::domain::{Route, User};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed(User),
    Redirect(Route),
}

pub struct SessionGuard;

impl SessionGuard {
    /// Gate a screen mount on an authenticated session.
    ///
    /// A failed lookup is treated like a missing session.
    pub fn check<G: RemoteGateway>(gateway: &mut G) -> GuardOutcome {
        match gateway.current_user() {
            Ok(Some(user)) => {
                debug!(user_id = %user.id, "Session present");
                GuardOutcome::Proceed(user)
            }
            Ok(None) => {
                debug!("No session, redirecting to login");
                GuardOutcome::Redirect(Route::Login)
            }
            Err(e) => {
                warn!(error = %e, "Session lookup failed, redirecting to login");
                GuardOutcome::Redirect(Route::Login)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::util::testing::MockGateway;

    #[test]
    fn given_signed_in_user_when_checking_then_proceeds_with_identity() {
        let mut gateway = MockGateway::builder().with_user("user-1").build();

        let outcome = SessionGuard::check(&mut gateway);

        match outcome {
            GuardOutcome::Proceed(user) => assert_eq!(user.id, "user-1"),
            other => panic!("Expected Proceed, got {:?}", other),
        }
    }

    #[test]
    fn given_no_session_when_checking_then_redirects_to_login() {
        let mut gateway = MockGateway::builder().build();

        let outcome = SessionGuard::check(&mut gateway);

        assert_eq!(outcome, GuardOutcome::Redirect(Route::Login));
    }

    #[test]
    fn given_failing_session_lookup_when_checking_then_redirects_to_login() {
        let mut gateway = MockGateway::builder()
            .with_user("user-1")
            .failing_on("current_user", DomainError::Transport("offline".to_string()))
            .build();

        let outcome = SessionGuard::check(&mut gateway);

        assert_eq!(outcome, GuardOutcome::Redirect(Route::Login));
    }
}
