// src/application/mod.rs
pub mod auth;
pub mod category_board;
pub mod forms;
pub mod gateway;
pub mod note_board;
pub mod screens;
pub mod session_guard;

pub use category_board::CategoryBoard;
pub use gateway::{Authenticator, RemoteGateway};
pub use note_board::{filter_notes, NoteBoard};
pub use screens::{Mount, NotesScreen, QuickAnswersScreen};
pub use session_guard::{GuardOutcome, SessionGuard};
