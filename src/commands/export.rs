//! `get-macros`, `get-triggers`, `get-automations`, `get-views`.

use anyhow::{Context, Result};

use crate::cli::{ExportArgs, GlobalOpts};
use crate::commands::util;
use crate::export::Exporter;
use crate::models::{ListFilter, Resource};

pub async fn handle(
    resource: Resource,
    filter: ListFilter,
    args: ExportArgs,
    global: &GlobalOpts,
) -> Result<()> {
    let client = util::connect(global)?;
    let filename = args
        .filename
        .unwrap_or_else(|| resource.collection_key().to_string());
    let progress = util::progress_bar(resource.collection_key());

    let path = Exporter::new(&client)
        .export(
            resource,
            &filter,
            args.format,
            &args.directory,
            &filename,
            &progress,
        )
        .await
        .with_context(|| format!("Failed to export {resource}"))?;

    println!("Wrote {resource} to {}", path.display());
    Ok(())
}
