//! Credential profiles for zenkly.
//!
//! Profiles are stored in a TOML file whose top-level tables are profile
//! names, each holding `subdomain`, `email` and `password`. Loading merges the
//! file with `ZENKLY_SUBDOMAIN`, `ZENKLY_EMAIL` and `ZENKLY_PASSWORD`
//! environment overrides before selecting the requested profile.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    error::Kind,
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ZenklyError;

/// Name of the profile used when none is given.
pub const DEFAULT_PROFILE: &str = "default";

/// Credentials for one Zendesk account.
///
/// Immutable for the lifetime of a command. The password is never logged
/// and is redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Account subdomain (`acme` for `acme.zendesk.com`).
    pub subdomain: String,

    /// Agent email used for basic authentication.
    pub email: String,

    /// Password or API token.
    /// This value must never be logged or included in error messages.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("subdomain", &self.subdomain)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Builds validated credentials.
    ///
    /// # Errors
    ///
    /// Returns `ZenklyError::Config` if any value fails validation.
    pub fn new(
        subdomain: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ZenklyError> {
        let credentials = Credentials {
            subdomain: subdomain.into().trim().to_string(),
            email: email.into().trim().to_string(),
            password: password.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Returns the API root for this account, e.g. `https://acme.zendesk.com/api/v2/`.
    pub fn base_url(&self) -> Result<Url, ZenklyError> {
        Url::parse(&format!(
            "https://{}.zendesk.com/api/v2/",
            self.subdomain
        ))
        .map_err(|e| ZenklyError::invalid_config(format!("invalid subdomain: {e}")))
    }

    fn validate(&self) -> Result<(), ZenklyError> {
        Self::validate_subdomain(&self.subdomain)?;

        if self.email.is_empty() || !self.email.contains('@') {
            return Err(ZenklyError::invalid_config(
                "email must be a valid agent email address",
            ));
        }

        Self::validate_password(&self.password)
    }

    /// Validates that the subdomain can only ever produce a host under zendesk.com.
    fn validate_subdomain(subdomain: &str) -> Result<(), ZenklyError> {
        if subdomain.is_empty()
            || !subdomain
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        {
            return Err(ZenklyError::invalid_config(format!(
                "subdomain must contain only letters, digits and '-', got: {:?}",
                subdomain.chars().take(50).collect::<String>()
            )));
        }
        Ok(())
    }

    /// Validates the password is not empty or a placeholder value.
    fn validate_password(password: &str) -> Result<(), ZenklyError> {
        if password.trim().is_empty() {
            return Err(ZenklyError::invalid_config("password must not be empty"));
        }

        let lower = password.to_lowercase();
        let placeholder_patterns = ["your_password", "your_token", "placeholder", "changeme"];
        for pattern in placeholder_patterns {
            if lower.contains(pattern) {
                return Err(ZenklyError::invalid_config(
                    "password appears to be a placeholder value",
                ));
            }
        }

        Ok(())
    }
}

/// A profile as it appears on disk, before validation.
#[derive(Debug, Deserialize)]
struct StoredProfile {
    subdomain: String,
    email: String,
    password: String,
}

/// Profile-keyed credential storage backed by a TOML file.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Uses the platform configuration directory, e.g. `~/.config/zenkly/config.toml`.
    pub fn default_location() -> Self {
        let path = ProjectDirs::from("", "", "zenkly").map_or_else(
            || {
                let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
                p.push(".zenkly");
                p.push("config.toml");
                p
            },
            |dirs| dirs.config_dir().join("config.toml"),
        );
        Self { path }
    }

    /// Uses an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the credentials for `profile`.
    ///
    /// # Errors
    ///
    /// Returns `ZenklyError::ConfigurationMissing` when the profile does not
    /// exist (or lacks fields that no environment variable supplies), and
    /// `ZenklyError::Config` when the file is unreadable or values are invalid.
    pub fn load(&self, profile: &str) -> Result<Credentials, ZenklyError> {
        let figment = Figment::from(Toml::file(&self.path))
            .focus(profile)
            .merge(Env::prefixed("ZENKLY_").only(&["subdomain", "email", "password"]));

        let stored: StoredProfile = figment.extract().map_err(|e| match e.kind {
            Kind::MissingField(_) => ZenklyError::ConfigurationMissing {
                profile: profile.to_string(),
            },
            _ => ZenklyError::invalid_config(e.to_string()),
        })?;

        tracing::debug!(profile, subdomain = %stored.subdomain, "Profile loaded");

        Credentials::new(stored.subdomain, stored.email, stored.password)
    }

    /// Returns true if the file already holds a table named `profile`.
    pub fn contains(&self, profile: &str) -> Result<bool, ZenklyError> {
        Ok(self.read_table()?.contains_key(profile))
    }

    /// Writes `credentials` under `profile`, keeping every other profile intact.
    pub fn save(&self, profile: &str, credentials: &Credentials) -> Result<(), ZenklyError> {
        let mut table = self.read_table()?;
        let entry = toml::Value::try_from(credentials)
            .map_err(|e| ZenklyError::invalid_config(e.to_string()))?;
        table.insert(profile.to_string(), entry);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents =
            toml::to_string_pretty(&table).map_err(|e| ZenklyError::invalid_config(e.to_string()))?;
        fs::write(&self.path, contents)?;

        tracing::info!(profile, path = %self.path.display(), "Profile saved");
        Ok(())
    }

    fn read_table(&self) -> Result<toml::Table, ZenklyError> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        contents.parse::<toml::Table>().map_err(|e| {
            ZenklyError::invalid_config(format!("{}: {e}", self.path.display()))
        })
    }
}
