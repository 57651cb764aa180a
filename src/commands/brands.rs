//! `show-brands`.

use anyhow::{Context, Result};
use tabled::{settings::Style, Table};

use crate::cli::GlobalOpts;
use crate::commands::util;
use crate::models::{Brand, BrandRow, Resource};
use crate::paginator::{Paginator, Silent};

pub async fn handle(global: &GlobalOpts) -> Result<()> {
    let client = util::connect(global)?;

    let objects = Paginator::new(&client)
        .collect_all(
            Resource::Brands.collection_key(),
            &Resource::Brands.list_path(),
            &[],
            &Silent,
        )
        .await
        .context("Failed to list brands")?;

    let brands = objects
        .into_iter()
        .map(serde_json::from_value::<Brand>)
        .collect::<Result<Vec<_>, _>>()
        .context("Unexpected brand in response")?;

    println!("{}", render_brands(&brands));
    Ok(())
}

/// Renders brands as a rounded table.
pub fn render_brands(brands: &[Brand]) -> String {
    let rows: Vec<BrandRow> = brands.iter().map(BrandRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
