//! Clap derive structures for the `zenkly` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_PROFILE;
use crate::export::ExportFormat;
use crate::models::{Access, Resource};

/// zenkly -- bulk administration of a Zendesk account from local files
#[derive(Debug, Parser)]
#[command(
    name = "zenkly",
    version,
    about = "Export, import and back up Zendesk configuration",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Credential profile to use
    #[arg(
        long,
        short = 'p',
        env = "ZENKLY_PROFILE",
        default_value = DEFAULT_PROFILE,
        global = true
    )]
    pub profile: String,

    /// Profile file (defaults to the platform config directory)
    #[arg(long, env = "ZENKLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log HTTP traffic and internal steps to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store credentials for a profile
    Configure(ConfigureArgs),

    /// Export macros
    GetMacros(ExportArgs),

    /// Export triggers
    GetTriggers(GetTriggersArgs),

    /// Export automations
    GetAutomations(GetAutomationsArgs),

    /// Export views
    GetViews(GetViewsArgs),

    /// Create every macro in a local file
    AddMacros(FileArgs),

    /// Update every macro in a local file by id
    UpdateMacros(FileArgs),

    /// Create every object of a resource from a local file
    Add(BulkArgs),

    /// Update every object of a resource from a local file by id
    Update(BulkArgs),

    /// Back up help center categories, sections and articles
    BackupGuide(BackupGuideArgs),

    /// Map article ids between two help center backups by name
    CreateArticleMapping(ArticleMappingArgs),

    /// Import a help center theme archive for a brand
    UploadTheme(UploadThemeArgs),

    /// List the account's brands
    ShowBrands,
}

#[derive(Debug, Args)]
pub struct ConfigureArgs {
    /// Account subdomain (`acme` for acme.zendesk.com)
    #[arg(long)]
    pub subdomain: Option<String>,

    /// Agent email
    #[arg(long)]
    pub email: Option<String>,

    /// Password or API token
    #[arg(long)]
    pub password: Option<String>,
}

/// Output location and format shared by every export command.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory to write into
    #[arg(long, short = 'd', default_value = ".")]
    pub directory: PathBuf,

    /// File name (defaults to the resource name)
    #[arg(long, short = 'f')]
    pub filename: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
}

#[derive(Debug, Args)]
pub struct GetTriggersArgs {
    #[command(flatten)]
    pub output: ExportArgs,

    /// Only triggers in this category
    #[arg(long)]
    pub category_id: Option<u64>,

    /// Only active triggers
    #[arg(long)]
    pub active_only: bool,
}

#[derive(Debug, Args)]
pub struct GetAutomationsArgs {
    #[command(flatten)]
    pub output: ExportArgs,

    /// Only active automations
    #[arg(long)]
    pub active_only: bool,
}

#[derive(Debug, Args)]
pub struct GetViewsArgs {
    #[command(flatten)]
    pub output: ExportArgs,

    /// Only views of this group
    #[arg(long)]
    pub group: Option<u64>,

    /// Only active views
    #[arg(long)]
    pub active_only: bool,

    /// Only views with this access level
    #[arg(long, value_enum)]
    pub access: Option<Access>,
}

/// Location of a previously exported file.
#[derive(Debug, Args)]
pub struct FileArgs {
    /// Directory holding the file
    #[arg(long, short = 'd', default_value = ".")]
    pub directory: PathBuf,

    /// File name
    #[arg(long, short = 'f')]
    pub filename: String,
}

#[derive(Debug, Args)]
pub struct BulkArgs {
    /// Resource to write
    #[arg(value_enum)]
    pub resource: Resource,

    #[command(flatten)]
    pub file: FileArgs,
}

#[derive(Debug, Args)]
pub struct BackupGuideArgs {
    /// Locale to back up, e.g. `en-us` (all locales if omitted)
    #[arg(long)]
    pub locale: Option<String>,

    /// Directory to create the backup in
    #[arg(long, short = 'd', default_value = ".")]
    pub directory: PathBuf,
}

#[derive(Debug, Args)]
pub struct ArticleMappingArgs {
    /// Backup taken before the migration
    #[arg(long)]
    pub old_backup_file: PathBuf,

    /// Backup taken after the migration
    #[arg(long)]
    pub new_backup_file: PathBuf,

    /// Directory to write the mapping into
    #[arg(long, short = 'd', default_value = ".")]
    pub directory: PathBuf,
}

#[derive(Debug, Args)]
pub struct UploadThemeArgs {
    /// Brand to import the theme for
    #[arg(long)]
    pub brand_id: String,

    /// Theme archive (zip)
    #[arg(long)]
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get_views() {
        let cli = Cli::parse_from([
            "zenkly",
            "--profile",
            "sandbox",
            "get-views",
            "--group",
            "42",
            "--access",
            "shared",
            "--format",
            "csv",
        ]);
        assert_eq!(cli.global.profile, "sandbox");
        match cli.command {
            Command::GetViews(args) => {
                assert_eq!(args.group, Some(42));
                assert_eq!(args.access, Some(Access::Shared));
                assert_eq!(args.output.format, ExportFormat::Csv);
                assert!(!args.active_only);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_generic_update() {
        let cli = Cli::parse_from([
            "zenkly", "update", "triggers", "--filename", "triggers.json", "--yes",
        ]);
        assert!(cli.global.yes);
        match cli.command {
            Command::Update(args) => {
                assert_eq!(args.resource, Resource::Triggers);
                assert_eq!(args.file.filename, "triggers.json");
                assert_eq!(args.file.directory, PathBuf::from("."));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
