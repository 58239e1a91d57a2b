//! Command implementations.
//!
//! Every command writes its user-facing output to `out` and returns errors
//! to `main`, which maps them to the exit code.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use taskboard_sync::remote::HttpTaskStore;
use taskboard_sync::types::{Card, CardForm, CardId, Column, Priority, Status};
use taskboard_sync::{BoardConfig, BoardError, Notification, Outcome, SyncEngine};
use tokio::sync::broadcast::Receiver;
use tracing::debug;

use crate::error::CliError;
use crate::table::board_table;

pub type CommandResult = Result<(), CliError>;

/// Field values for `add` and `edit`, as typed on the command line
#[derive(Debug, Clone, Default)]
pub struct CardArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub clear_priority: bool,
}

impl CardArgs {
    /// Apply the given fields over `form`
    fn apply(&self, mut form: CardForm) -> Result<CardForm, BoardError> {
        if let Some(title) = &self.title {
            form.title = title.clone();
        }
        if let Some(description) = &self.description {
            form = form.with_description(description.clone());
        }
        if let Some(status) = &self.status {
            form = form.with_status(status.parse::<Status>()?);
        }
        if self.clear_priority {
            form = form.with_priority(None);
        } else if let Some(priority) = &self.priority {
            form = form.with_priority(Some(priority.parse::<Priority>()?));
        }
        Ok(form)
    }
}

/// Build an engine talking HTTP to the configured store
pub fn connect(config_path: Option<&Path>, url: Option<String>) -> Result<SyncEngine, CliError> {
    let mut config = BoardConfig::load_from(config_path)?;
    if let Some(url) = url {
        config = config.with_base_url(url);
    }
    debug!(base_url = %config.base_url, "connecting to task store");
    let remote = HttpTaskStore::from_config(&config).map_err(BoardError::from)?;
    Ok(SyncEngine::with_config(Arc::new(remote), config))
}

/// Print every notification published since `rx` subscribed
fn report(rx: &mut Receiver<Notification>, out: &mut impl Write) -> CommandResult {
    while let Ok(notification) = rx.try_recv() {
        writeln!(out, "{}", notification)?;
    }
    Ok(())
}

async fn require_card(engine: &SyncEngine, id: &str) -> Result<Card, CliError> {
    engine
        .find_card(&CardId::from(id))
        .await
        .ok_or_else(|| BoardError::card_not_found(id).into())
}

/// Show the board as a table or JSON
pub async fn run_board(engine: &SyncEngine, json: bool, out: &mut impl Write) -> CommandResult {
    let partition = engine.load().await?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&partition.board)?)?;
        return Ok(());
    }

    if partition.board.is_empty() {
        writeln!(out, "The board is empty.")?;
    } else {
        writeln!(out, "{}", board_table(&partition.board))?;
    }
    if !partition.dropped.is_empty() {
        writeln!(
            out,
            "{} card(s) with an unrecognized status are not shown.",
            partition.dropped.len()
        )?;
    }
    Ok(())
}

/// Create a card from a title and optional fields
pub async fn run_add(
    engine: &SyncEngine,
    title: String,
    args: CardArgs,
    out: &mut impl Write,
) -> CommandResult {
    let form = args.apply(CardForm::new(title))?;
    let mut rx = engine.subscribe();
    let result = engine.save_card(form, None).await;
    report(&mut rx, out)?;

    if let Some(card) = result?.applied() {
        writeln!(out, "Created card #{}", card.id)?;
    }
    Ok(())
}

/// Edit the given fields of an existing card
pub async fn run_edit(
    engine: &SyncEngine,
    id: &str,
    args: CardArgs,
    out: &mut impl Write,
) -> CommandResult {
    engine.load().await?;
    let existing = require_card(engine, id).await?;
    let form = args.apply(CardForm::from_card(&existing))?;

    let mut rx = engine.subscribe();
    let result = engine.save_card(form, Some(&existing)).await;
    report(&mut rx, out)?;
    result?;
    Ok(())
}

/// Move a card to the named column
pub async fn run_move(
    engine: &SyncEngine,
    id: &str,
    column: &str,
    out: &mut impl Write,
) -> CommandResult {
    let column: Column = column.parse()?;
    engine.load().await?;

    let mut rx = engine.subscribe();
    let result = engine.move_card(id, column).await;
    report(&mut rx, out)?;

    if result? == Outcome::Skipped {
        writeln!(out, "No card #{} on the board, nothing moved.", id)?;
    }
    Ok(())
}

/// Delete a card, asking first unless `yes` is set
pub async fn run_delete(
    engine: &SyncEngine,
    id: &str,
    yes: bool,
    out: &mut impl Write,
) -> CommandResult {
    engine.load().await?;
    let card = require_card(engine, id).await?;

    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete card #{} \"{}\"?", card.id, card.title))
            .default(false)
            .interact()?;
        if !confirmed {
            writeln!(out, "Cancelled.")?;
            return Ok(());
        }
    }

    let mut rx = engine.subscribe();
    let result = engine.delete_card(&card).await;
    report(&mut rx, out)?;
    result?;
    Ok(())
}
