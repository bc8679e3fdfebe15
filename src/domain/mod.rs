// src/domain/mod.rs
pub mod category;
pub mod error;
pub mod note;
pub mod response;
pub mod route;
pub mod user;

pub use category::{Category, CategoryDraft};
pub use error::DomainError;
pub use note::{Note, NoteDraft};
pub use response::{Language, Response, ResponseDraft};
pub use route::Route;
pub use user::{Session, User};

use serde::{Deserialize, Deserializer};

/// Read a nullable column as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
