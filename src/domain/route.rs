// src/domain/route.rs

/// User-facing destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    QuickAnswers,
    Notes,
    Login,
    CheckEmail,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::QuickAnswers => "/",
            Route::Notes => "/notes",
            Route::Login => "/auth/login",
            Route::CheckEmail => "/auth/check-email",
        }
    }
}
