//! Shared helpers for command handlers.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::GlobalOpts;
use crate::client::ZendeskClient;
use crate::config::ProfileStore;

/// The profile file selected by `--config`, or the platform default.
pub fn profile_store(global: &GlobalOpts) -> ProfileStore {
    match &global.config {
        Some(path) => ProfileStore::at(path),
        None => ProfileStore::default_location(),
    }
}

/// Loads the active profile and builds a client for it.
pub fn connect(global: &GlobalOpts) -> Result<ZendeskClient> {
    let store = profile_store(global);
    let credentials = store
        .load(&global.profile)
        .with_context(|| format!("Failed to load profile `{}`", global.profile))?;
    let client = ZendeskClient::new(&credentials).context("Failed to create Zendesk client")?;

    tracing::debug!(base_url = %client.base_url(), "Client initialized");
    Ok(client)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .context("Confirmation prompt failed")?;
    Ok(confirmed)
}

/// A progress bar on stderr labelled with `message`.
///
/// The length is set by the first progress report.
pub fn progress_bar(message: &str) -> ProgressBar {
    let style = ProgressStyle::with_template("{msg:>12} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    let bar = ProgressBar::new(0).with_style(style);
    bar.set_message(message.to_string());
    bar
}
