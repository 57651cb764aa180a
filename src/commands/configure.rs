//! `configure`: store credentials for a profile.

use anyhow::{Context, Result};
use dialoguer::{Input, Password};

use crate::cli::{ConfigureArgs, GlobalOpts};
use crate::commands::util;
use crate::config::Credentials;

pub fn handle(args: ConfigureArgs, global: &GlobalOpts) -> Result<()> {
    let store = util::profile_store(global);
    let profile = global.profile.as_str();

    if store.contains(profile)? {
        let overwrite = util::confirm(
            &format!("Profile `{profile}` already exists. Overwrite?"),
            global.yes,
        )?;
        if !overwrite {
            eprintln!("Left profile `{profile}` unchanged");
            return Ok(());
        }
    }

    let subdomain = match args.subdomain {
        Some(value) => value,
        None => Input::new()
            .with_prompt("Zendesk subdomain")
            .interact_text()
            .context("Prompt failed")?,
    };
    let email = match args.email {
        Some(value) => value,
        None => Input::new()
            .with_prompt("Agent email")
            .interact_text()
            .context("Prompt failed")?,
    };
    let password = match args.password {
        Some(value) => value,
        None => Password::new()
            .with_prompt("Password or API token")
            .interact()
            .context("Prompt failed")?,
    };

    let credentials = Credentials::new(subdomain, email, password)?;
    store.save(profile, &credentials)?;

    eprintln!(
        "Saved profile `{profile}` for {}.zendesk.com to {}",
        credentials.subdomain,
        store.path().display()
    );
    Ok(())
}
