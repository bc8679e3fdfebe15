// src/ports/terminal.rs
use crate::application::forms::Deletable;
use crate::application::{CategoryBoard, NoteBoard};
use crate::domain::{Category, Note, Response, User};
use crate::util::text::{plural, preview};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;
use tracing::instrument;

const PREVIEW_CHARS: usize = 60;
const UNDO_WARNING: &str = "This action cannot be undone.";

/// Plain-text rendering of screens, prompts and notices.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")
    }

    /// Sidebar: one line per category with its response count, `>` marks the selection.
    #[instrument(level = "trace", skip_all)]
    pub fn render_categories(&self, board: &CategoryBoard) -> String {
        if board.categories().is_empty() {
            return "No categories yet. Add one with `qa categories add --title <TITLE>`.".to_string();
        }
        let mut out = String::new();
        for category in board.categories() {
            let marker = if board.selected_id() == Some(category.id.as_str()) { '>' } else { ' ' };
            let _ = writeln!(
                out,
                "{} {} ({})  [{}]",
                marker, category.title, category.response_count, category.id
            );
            if !category.description.is_empty() {
                let _ = writeln!(out, "    {}", preview(&category.description, PREVIEW_CHARS));
            }
        }
        out.trim_end().to_string()
    }

    /// Responses of the selected category, or the matching empty state.
    #[instrument(level = "trace", skip_all)]
    pub fn render_responses(&self, board: &CategoryBoard) -> String {
        let Some(category) = board.selected() else {
            if board.categories().is_empty() {
                return "No categories yet.".to_string();
            }
            return "Select a category to see its responses.".to_string();
        };
        let mut out = format!("{}\n", category.title);
        if !category.description.is_empty() {
            let _ = writeln!(out, "{}", category.description);
        }
        if board.responses().is_empty() {
            out.push_str("\nNo responses yet in this category.");
            return out;
        }
        for response in board.responses() {
            out.push('\n');
            out.push_str(&self.render_response(response));
            out.push('\n');
        }
        out.trim_end().to_string()
    }

    pub fn render_response(&self, response: &Response) -> String {
        let mut out = format!(
            "{} {}  [{}]\n",
            response.language.flag(),
            response.language,
            response.id
        );
        for line in response.text.lines() {
            let _ = writeln!(out, "    {}", line);
        }
        out.trim_end().to_string()
    }

    /// Summary line, tag vocabulary, then the notes that pass the filters.
    #[instrument(level = "trace", skip_all)]
    pub fn render_notes(&self, board: &NoteBoard) -> String {
        if board.notes().is_empty() {
            return "No notes yet. Add one with `qa notes add --text <TEXT>`.".to_string();
        }
        let mut out = format!("{}\n", board.summary());
        if !board.all_tags().is_empty() {
            let tags: Vec<String> = board
                .all_tags()
                .iter()
                .map(|tag| {
                    if board.selected_tags().contains(tag) {
                        format!("[{}]", tag)
                    } else {
                        tag.clone()
                    }
                })
                .collect();
            let _ = writeln!(out, "Tags: {}", tags.join(" "));
        }
        if !board.query().trim().is_empty() {
            let _ = writeln!(out, "Search: {}", board.query());
        }

        let visible = board.visible();
        if visible.is_empty() {
            out.push_str("\nNo notes match your current filters.");
            return out;
        }
        for note in visible {
            out.push('\n');
            let _ = writeln!(out, "[{}] {}", note.id, preview(&note.text, PREVIEW_CHARS));
            let _ = writeln!(out, "    {}", render_tags(&note.tags));
            let _ = writeln!(out, "    {}", render_date(&note.created_at));
        }
        out.trim_end().to_string()
    }

    /// Full text of one note, then its tags and creation date.
    pub fn render_note(&self, note: &Note) -> String {
        format!(
            "[{}]\n{}\n{}\n{}",
            note.id,
            note.text,
            render_tags(&note.tags),
            render_date(&note.created_at)
        )
    }

    pub fn render_user(&self, user: &User) -> String {
        match &user.email {
            Some(email) => format!("{} ({})", email, user.id),
            None => user.id.clone(),
        }
    }

    /// Confirmation text; a category with responses warns about the cascade.
    pub fn delete_category_prompt(&self, category: &Category) -> String {
        let mut out = format!("Delete category \"{}\"?", category.label());
        if category.response_count > 0 {
            let _ = write!(
                out,
                " This will also delete {} in this category.",
                plural(category.response_count, "response")
            );
        }
        let _ = write!(out, " {}", UNDO_WARNING);
        out
    }

    pub fn delete_prompt<T: Deletable>(&self, target: &T) -> String {
        format!("Delete {} \"{}\"? {}", T::ENTITY, target.label(), UNDO_WARNING)
    }

    pub fn login_required(&self) -> String {
        "You are not signed in. Run `qa login --email <EMAIL>` first.".to_string()
    }

    pub fn check_email(&self, email: &str) -> String {
        format!(
            "Check your email. A confirmation link was sent to {}; follow it, then run `qa login`.",
            email
        )
    }
}

/// `Jan 1, 2024`
fn render_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

fn render_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return "No tags".to_string();
    }
    tags.iter()
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}
