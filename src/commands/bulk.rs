//! `add-macros`, `update-macros`, and the generic `add` / `update`.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::bulk::{load_collection, BatchReport, BulkExecutor, Mutation, Success};
use crate::cli::{FileArgs, GlobalOpts};
use crate::commands::util;
use crate::models::Resource;

pub async fn handle(
    resource: Resource,
    mutation: Mutation,
    args: FileArgs,
    global: &GlobalOpts,
) -> Result<()> {
    let path = args.directory.join(&args.filename);

    // Validate the file before connecting or prompting.
    let objects = load_collection(&path, resource.collection_key())?;

    let client = util::connect(global)?;
    let executor = BulkExecutor::new(&client, resource)?;

    let prompt = format!(
        "{} {} {resource} from {}?",
        capitalize(mutation.verb()),
        objects.len(),
        path.display()
    );
    if !util::confirm(&prompt, global.yes)? {
        eprintln!("Aborted");
        return Ok(());
    }

    let progress = util::progress_bar(resource.collection_key());
    let report = executor.execute(mutation, &objects, &progress).await;

    print!("{}", render_report(resource, &report));

    if !report.is_clean() {
        anyhow::bail!(
            "{} of {} {resource} failed to {}",
            report.failed.len(),
            report.total(),
            mutation.verb()
        );
    }
    Ok(())
}

/// Renders succeeded entries in green and failed entries in red.
pub fn render_report(resource: Resource, report: &BatchReport) -> String {
    let noun = resource.singular_key();
    let mut out = String::new();

    if !report.succeeded.is_empty() {
        out.push_str(&format!("Succeeded ({}):\n", report.succeeded.len()));
        for success in &report.succeeded {
            let line = match success {
                Success::Created {
                    local_id: Some(local_id),
                    remote_id,
                } => format!("created {noun} {remote_id} (from {local_id})"),
                Success::Created {
                    local_id: None,
                    remote_id,
                } => format!("created {noun} {remote_id}"),
                Success::Updated { id } => format!("updated {noun} {id}"),
            };
            out.push_str(&format!("  {}\n", line.green()));
        }
    }

    if !report.failed.is_empty() {
        out.push_str(&format!("Failed ({}):\n", report.failed.len()));
        for failure in &report.failed {
            let subject = match failure.local_id {
                Some(id) => format!("{noun} {id}"),
                None => format!("{noun} without id"),
            };
            let line = format!("{subject}: {}", failure.message);
            out.push_str(&format!("  {}\n", line.red()));
        }
    }

    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::Failure;

    #[test]
    fn test_render_report_lists_both_outcomes() {
        let report = BatchReport {
            succeeded: vec![
                Success::Created {
                    local_id: Some(1),
                    remote_id: 101,
                },
                Success::Updated { id: 5 },
            ],
            failed: vec![Failure {
                local_id: Some(7),
                message: "HTTP 422 Unprocessable Entity: invalid action".to_string(),
            }],
        };

        let out = render_report(Resource::Macros, &report);

        assert!(out.contains("Succeeded (2):"));
        assert!(out.contains("created macro 101 (from 1)"));
        assert!(out.contains("updated macro 5"));
        assert!(out.contains("Failed (1):"));
        assert!(out.contains("macro 7: HTTP 422 Unprocessable Entity: invalid action"));
    }

    #[test]
    fn test_render_report_empty() {
        assert_eq!(render_report(Resource::Views, &BatchReport::default()), "");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("update"), "Update");
        assert_eq!(capitalize(""), "");
    }
}
