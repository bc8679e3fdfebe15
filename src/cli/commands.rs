// src/cli/commands.rs
//
// One function per command group. Each mounts the matching screen, applies a
// single action and writes the result to the console.
use crate::application::auth;
use crate::application::forms::{normalize_tag, DeleteOutcome, SubmitOutcome, TagChange};
use crate::application::{
    Authenticator, GuardOutcome, Mount, NotesScreen, QuickAnswersScreen, RemoteGateway,
    SessionGuard,
};
use crate::cli::args::{CategoryCommand, Credentials, NoteCommand, ResponseCommand};
use crate::cli::prompt::Prompter;
use crate::constants::TAG_MAX;
use crate::domain::{DomainError, Language, Route, Session};
use crate::infrastructure::Config;
use crate::ports::TerminalPresenter;
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument};

pub struct Console<W: Write, P: Prompter> {
    out: W,
    prompter: P,
    presenter: TerminalPresenter,
    json: bool,
}

impl<W: Write, P: Prompter> Console<W, P> {
    pub fn new(out: W, prompter: P, json: bool) -> Self {
        Self {
            out,
            prompter,
            presenter: TerminalPresenter::new(),
            json,
        }
    }

    pub fn into_parts(self) -> (W, P) {
        (self.out, self.prompter)
    }

    fn line(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.out, "{}", text.as_ref()).context("Failed to write output")
    }

    /// JSON of `value` in JSON mode, the presenter's text otherwise.
    fn emit<T, F>(&mut self, value: &T, text: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&TerminalPresenter) -> String,
    {
        let rendered = if self.json {
            self.presenter.to_json(value)?
        } else {
            text(&self.presenter)
        };
        self.line(rendered)
    }

    fn notice(&mut self, status: &str, text: String) -> Result<()> {
        let json = serde_json::json!({ "status": status, "message": &text });
        self.emit(&json, |_| text)
    }

    fn redirect(&mut self, route: Route) -> Result<()> {
        debug!(path = route.path(), "Redirected");
        let text = self.presenter.login_required();
        let json = serde_json::json!({ "redirect": route.path(), "message": &text });
        self.emit(&json, |_| text)
    }

    fn approve(&mut self, prompt: &str, yes: bool) -> Result<bool> {
        if yes {
            return Ok(true);
        }
        self.prompter.confirm(prompt)
    }

    fn password(&mut self, given: Option<String>) -> Result<String> {
        match given {
            Some(password) => Ok(password),
            None => self.prompter.password("Password"),
        }
    }
}

fn saved(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Saved => Ok(()),
        SubmitOutcome::Blocked(reason) => Err(anyhow!(reason)),
        SubmitOutcome::Failed(message) => Err(anyhow!(message)),
    }
}

fn deleted(outcome: DeleteOutcome) -> Result<()> {
    match outcome {
        DeleteOutcome::Deleted => Ok(()),
        DeleteOutcome::Failed(message) => Err(anyhow!(message)),
        DeleteOutcome::NoTarget => bail!("Nothing selected for deletion"),
    }
}

fn apply_tag(change: TagChange) -> Result<()> {
    match change {
        TagChange::TooLong(tag) => bail!("Tag '{}' is longer than {} characters", tag, TAG_MAX),
        TagChange::Duplicate(tag) => {
            debug!(tag, "Tag already present");
            Ok(())
        }
        TagChange::Added(_) | TagChange::Empty => Ok(()),
    }
}

/// Write a config file holding the backend connection; an existing file needs `force`.
#[instrument(level = "debug", skip(config, console))]
pub fn init<W: Write, P: Prompter>(
    path: &Path,
    config: &Config,
    force: bool,
    console: &mut Console<W, P>,
) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists at {} (pass --force to replace it)",
            path.display()
        );
    }
    config.backend()?;
    config.save(path)?;
    info!(path = %path.display(), "Wrote config file");
    console.notice("initialized", format!("Wrote {}", path.display()))
}

#[instrument(level = "debug", skip_all)]
pub fn sign_up<A, W, P>(gateway: &mut A, credentials: Credentials, console: &mut Console<W, P>) -> Result<()>
where
    A: Authenticator,
    W: Write,
    P: Prompter,
{
    let password = console.password(credentials.password)?;
    auth::sign_up(gateway, &credentials.email, &password)?;
    let text = console.presenter.check_email(credentials.email.trim());
    let json = serde_json::json!({ "redirect": Route::CheckEmail.path(), "message": &text });
    console.emit(&json, |_| text)
}

/// Returns the session for the caller to persist.
#[instrument(level = "debug", skip_all)]
pub fn login<A, W, P>(gateway: &mut A, credentials: Credentials, console: &mut Console<W, P>) -> Result<Session>
where
    A: Authenticator,
    W: Write,
    P: Prompter,
{
    let password = console.password(credentials.password)?;
    let session = auth::sign_in(gateway, &credentials.email, &password)?;
    let text = format!("Signed in as {}", console.presenter.render_user(&session.user));
    console.emit(&session.user, |_| text)?;
    Ok(session)
}

pub fn logout<W: Write, P: Prompter>(was_signed_in: bool, console: &mut Console<W, P>) -> Result<()> {
    let text = if was_signed_in { "Signed out." } else { "No stored session." };
    console.notice("signed_out", text.to_string())
}

pub fn whoami<G: RemoteGateway, W: Write, P: Prompter>(gateway: &mut G, console: &mut Console<W, P>) -> Result<()> {
    match SessionGuard::check(gateway) {
        GuardOutcome::Proceed(user) => console.emit(&user, |p| p.render_user(&user)),
        GuardOutcome::Redirect(route) => console.redirect(route),
    }
}

#[instrument(level = "debug", skip(gateway, console))]
pub fn categories<G, W, P>(gateway: G, action: CategoryCommand, console: &mut Console<W, P>) -> Result<()>
where
    G: RemoteGateway,
    W: Write,
    P: Prompter,
{
    let mut screen = QuickAnswersScreen::new(gateway);
    if let Mount::Redirect(route) = screen.mount() {
        return console.redirect(route);
    }

    match action {
        CategoryCommand::List => {}
        CategoryCommand::Add { title, description } => {
            let form = screen.open_add_category();
            form.title = title;
            form.description = description.unwrap_or_default();
            saved(screen.submit_category_form())?;
        }
        CategoryCommand::Edit { id, title, description } => {
            let form = screen.open_edit_category(&id)?;
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            saved(screen.submit_category_form())?;
        }
        CategoryCommand::Delete { id, yes } => {
            let prompt = match screen.request_delete_category(&id)?.target() {
                Some(category) => console.presenter.delete_category_prompt(category),
                None => bail!("Category not found: {}", id),
            };
            if !console.approve(&prompt, yes)? {
                screen.cancel_delete_category();
                return console.notice("cancelled", "Cancelled.".to_string());
            }
            deleted(screen.confirm_delete_category())?;
        }
    }

    let board = screen.board();
    console.emit(board.categories(), |p| p.render_categories(board))
}

#[instrument(level = "debug", skip(gateway, console))]
pub fn responses<G, W, P>(
    gateway: G,
    action: ResponseCommand,
    default_language: Language,
    console: &mut Console<W, P>,
) -> Result<()>
where
    G: RemoteGateway,
    W: Write,
    P: Prompter,
{
    let mut screen = QuickAnswersScreen::new(gateway);
    if let Mount::Redirect(route) = screen.mount() {
        return console.redirect(route);
    }

    match action {
        ResponseCommand::List { category } => {
            if let Some(category_id) = category {
                screen.select_category(&category_id)?;
            }
        }
        ResponseCommand::Show { id, raw } => {
            let response = screen.locate_response(&id)?;
            if raw {
                return console.line(&response.text);
            }
            return console.emit(&response, |p| p.render_response(&response));
        }
        ResponseCommand::Add { category, text, language } => {
            if let Some(category_id) = category {
                screen.select_category(&category_id)?;
            }
            let form = screen.open_add_response()?;
            form.text = text;
            form.language = language.unwrap_or(default_language);
            saved(screen.submit_response_form())?;
        }
        ResponseCommand::Edit { id, text, language } => {
            let form = screen.open_edit_response(&id)?;
            if let Some(text) = text {
                form.text = text;
            }
            if let Some(language) = language {
                form.language = language;
            }
            saved(screen.submit_response_form())?;
        }
        ResponseCommand::Delete { id, yes } => {
            let prompt = match screen.request_delete_response(&id)?.target() {
                Some(response) => console.presenter.delete_prompt(response),
                None => bail!("Response not found: {}", id),
            };
            if !console.approve(&prompt, yes)? {
                screen.cancel_delete_response();
                return console.notice("cancelled", "Cancelled.".to_string());
            }
            deleted(screen.confirm_delete_response())?;
        }
    }

    let board = screen.board();
    console.emit(board.responses(), |p| p.render_responses(board))
}

#[instrument(level = "debug", skip(gateway, console))]
pub fn notes<G, W, P>(gateway: G, action: NoteCommand, console: &mut Console<W, P>) -> Result<()>
where
    G: RemoteGateway,
    W: Write,
    P: Prompter,
{
    let mut screen = NotesScreen::new(gateway);
    if let Mount::Redirect(route) = screen.mount() {
        return console.redirect(route);
    }

    match action {
        NoteCommand::List { tags, search } => {
            for tag in tags {
                let tag = normalize_tag(&tag);
                if tag.is_empty() {
                    debug!("Ignoring empty tag filter");
                    continue;
                }
                if !screen.board().selected_tags().contains(&tag) {
                    screen.toggle_tag(&tag);
                }
            }
            if let Some(query) = search {
                screen.set_query(&query);
            }
        }
        NoteCommand::Show { id } => {
            let note = screen
                .board()
                .note(&id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Note", &id))?;
            return console.emit(&note, |p| p.render_note(&note));
        }
        NoteCommand::Add { text, tags } => {
            let form = screen.open_add_note();
            form.text = text;
            for tag in tags {
                apply_tag(form.tags.add(&tag))?;
            }
            saved(screen.submit_note_form())?;
        }
        NoteCommand::Edit { id, text, tags, untag } => {
            let form = screen.open_edit_note(&id)?;
            if let Some(text) = text {
                form.text = text;
            }
            for tag in untag {
                form.tags.remove(&normalize_tag(&tag));
            }
            for tag in tags {
                apply_tag(form.tags.add(&tag))?;
            }
            saved(screen.submit_note_form())?;
        }
        NoteCommand::Delete { id, yes } => {
            let prompt = match screen.request_delete_note(&id)?.target() {
                Some(note) => console.presenter.delete_prompt(note),
                None => bail!("Note not found: {}", id),
            };
            if !console.approve(&prompt, yes)? {
                screen.cancel_delete_note();
                return console.notice("cancelled", "Cancelled.".to_string());
            }
            deleted(screen.confirm_delete_note())?;
        }
    }

    let board = screen.board();
    console.emit(&screen.visible_notes(), |p| p.render_notes(board))
}
