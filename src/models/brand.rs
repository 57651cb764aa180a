//! Brand models.

use serde::Deserialize;
use tabled::Tabled;

/// An account brand.
///
/// Only the fields shown by `show-brands` are captured.
#[derive(Debug, Clone, Deserialize)]
pub struct Brand {
    /// Unique brand ID.
    pub id: u64,

    /// Brand name.
    #[serde(default)]
    pub name: Option<String>,

    /// Brand subdomain.
    #[serde(default)]
    pub subdomain: Option<String>,

    /// Public brand URL.
    #[serde(default)]
    pub brand_url: Option<String>,

    /// Help center state: "enabled", "disabled" or "restricted".
    #[serde(default)]
    pub help_center_state: Option<String>,

    /// Whether the brand is active.
    #[serde(default)]
    pub active: Option<bool>,

    /// Host mapping (custom domain).
    #[serde(default)]
    pub host_mapping: Option<String>,
}

/// One row of the brands table.
#[derive(Debug, Tabled)]
pub struct BrandRow {
    /// Brand name.
    #[tabled(rename = "Name")]
    pub name: String,
    /// Brand ID.
    #[tabled(rename = "ID")]
    pub id: u64,
    /// Subdomain.
    #[tabled(rename = "Subdomain")]
    pub subdomain: String,
    /// Brand URL.
    #[tabled(rename = "Brand URL")]
    pub brand_url: String,
    /// Help center state.
    #[tabled(rename = "HC State")]
    pub help_center_state: String,
    /// Active flag.
    #[tabled(rename = "Active?")]
    pub active: String,
    /// Host mapping.
    #[tabled(rename = "Host Mapping")]
    pub host_mapping: String,
}

impl From<&Brand> for BrandRow {
    fn from(brand: &Brand) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: text(&brand.name),
            id: brand.id,
            subdomain: text(&brand.subdomain),
            brand_url: text(&brand.brand_url),
            help_center_state: text(&brand.help_center_state),
            active: brand.active.map(|a| a.to_string()).unwrap_or_default(),
            host_mapping: text(&brand.host_mapping),
        }
    }
}
