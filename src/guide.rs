//! Help center content backup and article id mapping.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::client::ZendeskClient;
use crate::error::ZenklyError;
use crate::export::{write_collection, ExportFormat};
use crate::paginator::{Paginator, Progress};

/// Help center collections included in a backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideContent {
    /// Top-level categories.
    Categories,
    /// Sections inside categories.
    Sections,
    /// Articles inside sections.
    Articles,
}

impl GuideContent {
    /// Every collection, in backup order.
    pub const ALL: [GuideContent; 3] = [
        GuideContent::Categories,
        GuideContent::Sections,
        GuideContent::Articles,
    ];

    /// Key holding the collection in list responses.
    pub fn key(self) -> &'static str {
        match self {
            GuideContent::Categories => "categories",
            GuideContent::Sections => "sections",
            GuideContent::Articles => "articles",
        }
    }

    /// List endpoint, optionally scoped to a locale.
    pub fn list_path(self, locale: Option<&str>) -> String {
        match locale {
            Some(locale) => format!(
                "help_center/{}/{}.json",
                urlencoding::encode(locale),
                self.key()
            ),
            None => format!("help_center/{}.json", self.key()),
        }
    }
}

/// Fetches every help center collection into `<directory>/guide_<timestamp>/`.
///
/// Returns the backup directory. Nothing is written until all collections
/// have been fetched.
pub async fn backup_guide(
    client: &ZendeskClient,
    locale: Option<&str>,
    directory: &Path,
    progress_for: impl Fn(GuideContent) -> Box<dyn Progress>,
) -> Result<PathBuf, ZenklyError> {
    let paginator = Paginator::new(client);
    let mut collections = Vec::with_capacity(GuideContent::ALL.len());

    for content in GuideContent::ALL {
        let progress = progress_for(content);
        let items = paginator
            .collect_all(content.key(), &content.list_path(locale), &[], progress.as_ref())
            .await?;
        collections.push((content, items));
    }

    let target = directory.join(format!("guide_{}", chrono::Utc::now().timestamp()));
    fs::create_dir_all(&target)?;
    for (content, items) in &collections {
        write_collection(&target, content.key(), ExportFormat::Json, content.key(), items)?;
    }

    tracing::info!(path = %target.display(), "Guide backup written");
    Ok(target)
}

/// Extracts the article list from a backup document.
///
/// Accepts a bare array or an `{"articles": [...]}` export.
pub fn articles_in(document: Value, path: &Path) -> Result<Vec<Value>, ZenklyError> {
    match document {
        Value::Array(articles) => Ok(articles),
        Value::Object(mut fields) => match fields.remove("articles") {
            Some(Value::Array(articles)) => Ok(articles),
            _ => Err(ZenklyError::local_input(
                path,
                "expected a list of articles or an `articles` key",
            )),
        },
        _ => Err(ZenklyError::local_input(path, "expected a list of articles")),
    }
}

/// Maps old article ids to new ones by exact name match.
///
/// When several new articles share a name, the last one wins.
pub fn article_mapping(old: &[Value], new: &[Value]) -> Map<String, Value> {
    let mut mapping = Map::new();
    for old_article in old {
        let (Some(old_id), Some(old_name)) = (old_article.get("id"), old_article.get("name"))
        else {
            continue;
        };
        for new_article in new {
            let (Some(new_id), Some(new_name)) = (new_article.get("id"), new_article.get("name"))
            else {
                continue;
            };
            if old_name == new_name {
                mapping.insert(id_text(old_id), Value::String(id_text(new_id)));
            }
        }
    }
    mapping
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Reads two backup files and writes `mapping_<timestamp>.json` into `directory`.
pub fn write_article_mapping(
    old_backup: &Path,
    new_backup: &Path,
    directory: &Path,
) -> Result<PathBuf, ZenklyError> {
    let read = |path: &Path| -> Result<Vec<Value>, ZenklyError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ZenklyError::local_input(path, e.to_string()))?;
        let document: Value = serde_json::from_str(&contents)
            .map_err(|e| ZenklyError::local_input(path, format!("invalid JSON: {e}")))?;
        articles_in(document, path)
    };

    let mapping = article_mapping(&read(old_backup)?, &read(new_backup)?);

    let path = directory.join(format!("mapping_{}.json", chrono::Utc::now().timestamp()));
    fs::write(&path, serde_json::to_string_pretty(&mapping)?)?;

    tracing::info!(path = %path.display(), mapped = mapping.len(), "Article mapping written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_list_path() {
        assert_eq!(
            GuideContent::Articles.list_path(Some("en-us")),
            "help_center/en-us/articles.json"
        );
        assert_eq!(
            GuideContent::Sections.list_path(None),
            "help_center/sections.json"
        );
    }

    #[test]
    fn test_article_mapping_by_name() {
        let old = vec![
            json!({"id": 1, "name": "Reset your password"}),
            json!({"id": 2, "name": "Billing FAQ"}),
            json!({"id": 3, "name": "Retired article"}),
        ];
        let new = vec![
            json!({"id": 101, "name": "Billing FAQ"}),
            json!({"id": 102, "name": "Reset your password"}),
        ];

        let mapping = article_mapping(&old, &new);

        assert_eq!(
            Value::Object(mapping),
            json!({"1": "102", "2": "101"})
        );
    }

    #[test]
    fn test_article_mapping_last_match_wins() {
        let old = vec![json!({"id": 1, "name": "Duplicate"})];
        let new = vec![
            json!({"id": 10, "name": "Duplicate"}),
            json!({"id": 11, "name": "Duplicate"}),
        ];
        let mapping = article_mapping(&old, &new);
        assert_eq!(mapping["1"], json!("11"));
    }

    #[test]
    fn test_articles_in_accepts_both_shapes() {
        let path = Path::new("backup.json");
        assert_eq!(articles_in(json!([{"id": 1}]), path).unwrap().len(), 1);
        assert_eq!(
            articles_in(json!({"articles": [{"id": 1}, {"id": 2}]}), path)
                .unwrap()
                .len(),
            2
        );
        assert!(articles_in(json!({"sections": []}), path).is_err());
        assert!(articles_in(json!("nope"), path).is_err());
    }

    #[test]
    fn test_write_article_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.json");
        let new = dir.path().join("new.json");
        fs::write(&old, r#"[{"id": 1, "name": "A"}]"#).unwrap();
        fs::write(&new, r#"{"articles": [{"id": 9, "name": "A"}]}"#).unwrap();

        let path = write_article_mapping(&old, &new, dir.path()).unwrap();
        let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, json!({"1": "9"}));
    }
}
