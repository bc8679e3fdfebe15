// src/constants.rs
//
// Field limits and defaults shared by forms, validation and the gateway.

/// Maximum length of a category title, in characters.
///
/// Used in: `application/forms/category_form.rs`
pub const CATEGORY_TITLE_MAX: usize = 100;

/// Maximum length of a category description, in characters.
///
/// Used in: `application/forms/category_form.rs`
pub const CATEGORY_DESCRIPTION_MAX: usize = 500;

/// Maximum length of a response or note body, in characters.
///
/// Used in: `application/forms/response_form.rs`, `application/forms/note_form.rs`
pub const TEXT_MAX: usize = 2000;

/// Maximum length of a single note tag, in characters.
///
/// Used in: `application/forms/tag_editor.rs`, `cli/commands.rs`
pub const TAG_MAX: usize = 20;

/// Transport timeout applied to every backend request.
///
/// Used in: `infrastructure/postgrest.rs`
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Directory name under the platform config dir holding `config.toml` and `session.json`.
///
/// Used in: `infrastructure/config.rs`
pub const APP_DIR_NAME: &str = "quick-answers";
