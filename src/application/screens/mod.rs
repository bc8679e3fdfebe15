// src/application/screens/mod.rs
//
// Each screen owns its gateway, list state, forms and dialogs. Forms and
// dialogs get the gateway plus a reload callback when they are submitted.
pub mod notes;
pub mod quick_answers;

pub use notes::NotesScreen;
pub use quick_answers::QuickAnswersScreen;

use crate::domain::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    Ready,
    Redirect(Route),
}
