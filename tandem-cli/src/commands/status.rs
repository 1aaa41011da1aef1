//! Status command handler
//!
//! One status query, no waiting.

use anyhow::{Result, anyhow, bail};
use colored::*;
use tandem_client::{JobClient, ProverClient};
use tandem_core::domain::job::{JobId, JobKind, JobSnapshot, JobStatus};

/// Fetch and display the current status of a job
pub async fn show(client: &ProverClient, kind: &str, id: &str) -> Result<()> {
    let kind = JobKind::parse(kind)
        .ok_or_else(|| anyhow!("Unknown job kind '{}', expected circuit or proof", kind))?;
    let id = JobId::new(id);

    let snapshot = match client.get_detail(kind, &id).await {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_not_found() => bail!("No {} found with ID {}", kind.resource(), id),
        Err(e) => return Err(e.into()),
    };

    print_snapshot(kind, &id, &snapshot);

    Ok(())
}

/// Print a job snapshot
fn print_snapshot(kind: JobKind, id: &JobId, snapshot: &JobSnapshot) {
    println!("{}", format!("{} {}", capitalize(kind.resource()), id).bold());
    println!("  Status: {}", colorize_status(&snapshot.status));

    if let Some(error) = &snapshot.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }

    if let Some(result) = &snapshot.result {
        println!("\n{}", "Detail:".bold());
        if let Ok(pretty) = serde_json::to_string_pretty(result) {
            println!("{}", pretty);
        } else {
            println!("{:?}", result);
        }
    }
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus) -> colored::ColoredString {
    let status_str = format!("{:?}", status);
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Ready => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
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

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("circuit"), "Circuit");
        assert_eq!(capitalize(""), "");
    }
}
