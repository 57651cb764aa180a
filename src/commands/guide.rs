//! `backup-guide` and `create-article-mapping`.

use anyhow::{Context, Result};

use crate::cli::{ArticleMappingArgs, BackupGuideArgs, GlobalOpts};
use crate::commands::util;
use crate::guide::{self, GuideContent};
use crate::paginator::Progress;

pub async fn backup(args: BackupGuideArgs, global: &GlobalOpts) -> Result<()> {
    let client = util::connect(global)?;

    let path = guide::backup_guide(
        &client,
        args.locale.as_deref(),
        &args.directory,
        |content: GuideContent| -> Box<dyn Progress> {
            Box::new(util::progress_bar(content.key()))
        },
    )
    .await
    .context("Failed to back up help center")?;

    println!("Wrote help center backup to {}", path.display());
    Ok(())
}

pub fn create_article_mapping(args: ArticleMappingArgs) -> Result<()> {
    let path = guide::write_article_mapping(
        &args.old_backup_file,
        &args.new_backup_file,
        &args.directory,
    )
    .context("Failed to create article mapping")?;

    println!("Wrote article mapping to {}", path.display());
    Ok(())
}
