// src/domain/response.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    Spanish,
    English,
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Spanish, Language::English, Language::Portuguese];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::English => "English",
            Language::Portuguese => "Portuguese",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Language::Spanish => "🇪🇸",
            Language::English => "🇺🇸",
            Language::Portuguese => "🇵🇹",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "Unknown language '{}' (expected Spanish, English or Portuguese)",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: String,
    pub text: String,
    pub language: Language,
    pub category_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDraft {
    pub text: String,
    pub language: Language,
}
