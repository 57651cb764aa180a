//! Command dispatch: bridges parsed CLI arguments to library operations.

pub mod brands;
pub mod bulk;
pub mod configure;
pub mod export;
pub mod guide;
pub mod theme;
pub mod util;

use anyhow::Result;

use crate::bulk::Mutation;
use crate::cli::{Command, GlobalOpts};
use crate::models::{ListFilter, Resource};

/// Runs one parsed command to completion.
pub async fn dispatch(command: Command, global: &GlobalOpts) -> Result<()> {
    match command {
        // Needs no account connection
        Command::Configure(args) => configure::handle(args, global),
        Command::CreateArticleMapping(args) => guide::create_article_mapping(args),

        Command::GetMacros(args) => {
            export::handle(Resource::Macros, ListFilter::new(), args, global).await
        }
        Command::GetTriggers(args) => {
            let filter = ListFilter::new()
                .with_active_only(args.active_only)
                .with_category(args.category_id);
            export::handle(Resource::Triggers, filter, args.output, global).await
        }
        Command::GetAutomations(args) => {
            let filter = ListFilter::new().with_active_only(args.active_only);
            export::handle(Resource::Automations, filter, args.output, global).await
        }
        Command::GetViews(args) => {
            let filter = ListFilter::new()
                .with_active_only(args.active_only)
                .with_group(args.group)
                .with_access(args.access);
            export::handle(Resource::Views, filter, args.output, global).await
        }

        Command::AddMacros(args) => {
            bulk::handle(Resource::Macros, Mutation::Create, args, global).await
        }
        Command::UpdateMacros(args) => {
            bulk::handle(Resource::Macros, Mutation::Update, args, global).await
        }
        Command::Add(args) => {
            bulk::handle(args.resource, Mutation::Create, args.file, global).await
        }
        Command::Update(args) => {
            bulk::handle(args.resource, Mutation::Update, args.file, global).await
        }

        Command::BackupGuide(args) => guide::backup(args, global).await,
        Command::UploadTheme(args) => theme::handle(args, global).await,
        Command::ShowBrands => brands::handle(global).await,
    }
}
