//! Descriptors for the Zendesk collections zenkly reads and writes.
//!
//! Field sets and URL templates are data: each `Resource` knows its JSON keys,
//! its endpoints and which fields the write endpoints accept.

use std::fmt;

use clap::ValueEnum;

/// A named collection type on the Zendesk API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Resource {
    /// Agent macros.
    Macros,
    /// Ticket triggers.
    Triggers,
    /// Time-based automations.
    Automations,
    /// Ticket views.
    Views,
    /// Account brands (read-only).
    Brands,
}

impl Resource {
    /// Key holding the collection in list responses and export files.
    pub fn collection_key(self) -> &'static str {
        match self {
            Resource::Macros => "macros",
            Resource::Triggers => "triggers",
            Resource::Automations => "automations",
            Resource::Views => "views",
            Resource::Brands => "brands",
        }
    }

    /// Key wrapping a single object in create/update bodies and responses.
    pub fn singular_key(self) -> &'static str {
        match self {
            Resource::Macros => "macro",
            Resource::Triggers => "trigger",
            Resource::Automations => "automation",
            Resource::Views => "view",
            Resource::Brands => "brand",
        }
    }

    /// Path of the list (and create) endpoint, relative to the API root.
    pub fn list_path(self) -> String {
        format!("{}.json", self.collection_key())
    }

    /// Path of the show/update endpoint for one object.
    pub fn item_path(self, id: u64) -> String {
        format!("{}/{}.json", self.collection_key(), id)
    }

    /// Fields accepted by the write endpoints, or `None` for read-only resources.
    pub fn writable_fields(self) -> Option<&'static [&'static str]> {
        match self {
            Resource::Macros => Some(&[
                "title",
                "active",
                "actions",
                "restriction",
                "description",
                "attachments",
            ]),
            Resource::Triggers => Some(&[
                "title",
                "active",
                "actions",
                "conditions",
                "description",
                "position",
                "category_id",
            ]),
            Resource::Automations => {
                Some(&["title", "active", "actions", "conditions", "position"])
            }
            Resource::Views => Some(&[
                "title",
                "active",
                "conditions",
                "execution",
                "restriction",
                "position",
                "description",
            ]),
            Resource::Brands => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_key())
    }
}

/// View visibility filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Access {
    /// Views owned by the requesting agent.
    Personal,
    /// Views shared with a group.
    Shared,
    /// Account-wide views.
    Account,
}

impl Access {
    fn as_str(self) -> &'static str {
        match self {
            Access::Personal => "personal",
            Access::Shared => "shared",
            Access::Account => "account",
        }
    }
}

/// Server-side filters for list requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Only return active objects.
    pub active_only: bool,
    /// Trigger category.
    pub category_id: Option<u64>,
    /// Owning group (views).
    pub group_id: Option<u64>,
    /// Visibility (views).
    pub access: Option<Access>,
}

impl ListFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to active objects.
    pub fn with_active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }

    /// Restricts triggers to one category.
    pub fn with_category(mut self, category_id: Option<u64>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Restricts views to one group.
    pub fn with_group(mut self, group_id: Option<u64>) -> Self {
        self.group_id = group_id;
        self
    }

    /// Restricts views by visibility.
    pub fn with_access(mut self, access: Option<Access>) -> Self {
        self.access = access;
        self
    }

    /// Renders the filter as query parameters.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if self.active_only {
            query.push(("active".to_string(), "true".to_string()));
        }
        if let Some(category_id) = self.category_id {
            query.push(("category_id".to_string(), category_id.to_string()));
        }
        if let Some(group_id) = self.group_id {
            query.push(("group_id".to_string(), group_id.to_string()));
        }
        if let Some(access) = self.access {
            query.push(("access".to_string(), access.as_str().to_string()));
        }
        query
    }
}
