//! `upload-theme`.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::cli::{GlobalOpts, UploadThemeArgs};
use crate::commands::util;
use crate::theme::JobPoller;

pub async fn handle(args: UploadThemeArgs, global: &GlobalOpts) -> Result<()> {
    if !args.file.is_file() {
        anyhow::bail!("Theme archive {} does not exist", args.file.display());
    }

    let client = util::connect(global)?;

    let prompt = format!(
        "Import {} as the help center theme of brand {}?",
        args.file.display(),
        args.brand_id
    );
    if !util::confirm(&prompt, global.yes)? {
        eprintln!("Aborted");
        return Ok(());
    }

    let job = JobPoller::new(&client)
        .import_theme(&args.brand_id, &args.file)
        .await
        .context("Theme import failed")?;

    eprintln!("{}", "Theme import completed".green());
    println!("{}", serde_json::to_string_pretty(&job)?);
    Ok(())
}
