//! Bulk create and update of configuration objects.
//!
//! The executor walks a local collection in order, projects each object onto
//! the fields the write endpoint accepts, and issues one request per object.
//! A failing object is recorded and the batch moves on; the batch itself
//! never aborts on a per-object error.
//!
//! Update batches are safe to re-run: each object is PUT by id. Create
//! batches are not: every run POSTs new objects and yields new remote ids.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::client::ZendeskClient;
use crate::error::ZenklyError;
use crate::models::Resource;
use crate::paginator::Progress;

/// The per-object operation of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// POST each object as a new one.
    Create,
    /// PUT each object to its existing id.
    Update,
}

impl Mutation {
    /// Verb used in logs and reports.
    pub fn verb(self) -> &'static str {
        match self {
            Mutation::Create => "add",
            Mutation::Update => "update",
        }
    }
}

/// A successfully applied object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Success {
    /// A new object was created remotely.
    Created {
        /// Id in the local file, if it had one.
        local_id: Option<u64>,
        /// Id assigned by the server.
        remote_id: u64,
    },
    /// An existing object was updated.
    Updated {
        /// The object's id.
        id: u64,
    },
}

/// An object that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Id in the local file, if it had one.
    pub local_id: Option<u64>,
    /// Why it failed.
    pub message: String,
}

/// Outcome of a whole batch.
///
/// Both lists preserve input order and together cover every input object
/// exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Objects applied successfully.
    pub succeeded: Vec<Success>,
    /// Objects that failed, with reasons.
    pub failed: Vec<Failure>,
}

impl BatchReport {
    /// Total number of objects processed.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Returns true if every object succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reduces `object` to the keys listed in `whitelist`.
///
/// Unknown keys are dropped. Whitelisted keys the object lacks stay absent.
pub fn project(object: &Map<String, Value>, whitelist: &[&str]) -> Map<String, Value> {
    object
        .iter()
        .filter(|(key, _)| whitelist.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Reads an exported file and returns the array stored under `key`.
///
/// # Errors
///
/// Returns `ZenklyError::LocalInput` if the file is missing, is not JSON,
/// lacks `key`, or `key` is not a list.
pub fn load_collection(path: &Path, key: &str) -> Result<Vec<Value>, ZenklyError> {
    if !path.exists() {
        return Err(ZenklyError::local_input(path, "File does not exist"));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| ZenklyError::local_input(path, e.to_string()))?;
    let mut data: Value = serde_json::from_str(&contents)
        .map_err(|e| ZenklyError::local_input(path, format!("invalid JSON: {e}")))?;

    match data.get_mut(key).map(Value::take) {
        Some(Value::Array(objects)) => Ok(objects),
        Some(_) => Err(ZenklyError::local_input(
            path,
            format!("Key `{key}` must be a list"),
        )),
        None => Err(ZenklyError::local_input(
            path,
            format!("Missing `{key}` key"),
        )),
    }
}

/// Applies a mutation to many objects of one resource.
pub struct BulkExecutor<'a> {
    client: &'a ZendeskClient,
    resource: Resource,
    whitelist: &'static [&'static str],
}

impl<'a> BulkExecutor<'a> {
    /// Creates an executor for `resource`.
    ///
    /// # Errors
    ///
    /// Returns `ZenklyError::Validation` if the resource is read-only.
    pub fn new(client: &'a ZendeskClient, resource: Resource) -> Result<Self, ZenklyError> {
        let whitelist = resource.writable_fields().ok_or_else(|| {
            ZenklyError::validation(format!("{resource} cannot be created or updated"))
        })?;
        Ok(Self {
            client,
            resource,
            whitelist,
        })
    }

    /// Applies `mutation` to every object, in order.
    ///
    /// Never fails as a whole: per-object errors land in the report.
    pub async fn execute(
        &self,
        mutation: Mutation,
        objects: &[Value],
        progress: &dyn Progress,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let total = objects.len() as u64;

        for (index, object) in objects.iter().enumerate() {
            let local_id = object.get("id").and_then(Value::as_u64);

            match self.apply(mutation, object, local_id).await {
                Ok(success) => report.succeeded.push(success),
                Err(e) => {
                    tracing::warn!(
                        resource = %self.resource,
                        ?local_id,
                        error = %e,
                        "Failed to {} object",
                        mutation.verb()
                    );
                    report.failed.push(Failure {
                        local_id,
                        message: e.to_string(),
                    });
                }
            }

            progress.report(index as u64 + 1, total);
        }

        progress.finish();
        tracing::info!(
            resource = %self.resource,
            operation = mutation.verb(),
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Batch complete"
        );

        report
    }

    /// Loads `path` and applies `mutation` to the collection inside it.
    ///
    /// The file is fully validated before any request is made.
    pub async fn execute_file(
        &self,
        mutation: Mutation,
        path: &Path,
        progress: &dyn Progress,
    ) -> Result<BatchReport, ZenklyError> {
        let objects = load_collection(path, self.resource.collection_key())?;
        Ok(self.execute(mutation, &objects, progress).await)
    }

    async fn apply(
        &self,
        mutation: Mutation,
        object: &Value,
        local_id: Option<u64>,
    ) -> Result<Success, ZenklyError> {
        let fields = object
            .as_object()
            .ok_or_else(|| ZenklyError::validation("entry is not a JSON object"))?;
        let mut wrapper = Map::new();
        wrapper.insert(
            self.resource.singular_key().to_string(),
            Value::Object(project(fields, self.whitelist)),
        );
        let body = Value::Object(wrapper);

        match mutation {
            Mutation::Create => {
                let response = self.client.post(&self.resource.list_path(), &body).await?;
                let remote_id = response
                    .get(self.resource.singular_key())
                    .and_then(|created| created.get("id"))
                    .and_then(Value::as_u64)
                    .ok_or_else(|| {
                        ZenklyError::response_format(
                            format!("missing `{}.id` in response", self.resource.singular_key()),
                            &response.to_string(),
                        )
                    })?;
                Ok(Success::Created {
                    local_id,
                    remote_id,
                })
            }
            Mutation::Update => {
                let id = local_id
                    .ok_or_else(|| ZenklyError::validation("entry has no numeric `id`"))?;
                self.client.put(&self.resource.item_path(id), &body).await?;
                Ok(Success::Updated { id })
            }
        }
    }
}
