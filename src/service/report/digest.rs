//! Human-readable run digest.

use crate::model::{
    report::{Digest, DigestField, COLOR_FAILURE, COLOR_PARTIAL, COLOR_SUCCESS},
    sync::{OutcomeStatus, RunStatus, SyncRun},
};

/// Members listed by name under each failure reason.
pub const MAX_LISTED_PER_REASON: usize = 10;

/// Builds the digest for a finished or aborted run.
pub fn build_digest(run: &SyncRun) -> Digest {
    let status = run.status();
    let color = match status {
        RunStatus::AllSucceeded => COLOR_SUCCESS,
        RunStatus::PartialFailure => COLOR_PARTIAL,
        RunStatus::AllFailed | RunStatus::Aborted => COLOR_FAILURE,
    };

    let mut description = format!("Started by {}", run.initiator);
    if let Some(reason) = &run.abort_reason {
        description.push_str(&format!("\nRun aborted before processing members: {}", reason));
    }

    let mut fields = vec![
        field("Total", run.total().to_string(), true),
        field("Succeeded", run.succeeded().to_string(), true),
        field("Failed", run.failed().to_string(), true),
        field("Applied", run.count(OutcomeStatus::Applied).to_string(), true),
        field("No change", run.count(OutcomeStatus::NoOp).to_string(), true),
        field(
            "Definitive failures",
            run.count(OutcomeStatus::DefinitiveFailure).to_string(),
            true,
        ),
        field(
            "Retries exhausted",
            run.count(OutcomeStatus::RetryExhausted).to_string(),
            true,
        ),
        field("Exempt", run.exempt.len().to_string(), true),
        field("Duration", format_duration(run.duration()), true),
    ];

    for (reason, outcomes) in run.failures_by_reason() {
        let mut lines: Vec<String> = outcomes
            .iter()
            .take(MAX_LISTED_PER_REASON)
            .map(|o| format!("{} (`{}`)", o.member_name, o.member_id))
            .collect();
        if outcomes.len() > MAX_LISTED_PER_REASON {
            lines.push(format!(
                "...and {} more",
                outcomes.len() - MAX_LISTED_PER_REASON
            ));
        }

        fields.push(field(
            &format!("{} ({})", reason.describe(), outcomes.len()),
            lines.join("\n"),
            false,
        ));
    }

    Digest {
        title: format!("Role sync #{}: {}", run.run_id, status.as_str()),
        color,
        description,
        fields,
        footer: format!(
            "Started {}",
            run.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    }
}

fn field(name: &str, value: String, inline: bool) -> DigestField {
    DigestField {
        name: name.to_string(),
        value,
        inline,
    }
}

fn format_duration(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    if seconds >= 3600 {
        format!("{}h {}m {}s", seconds / 3600, seconds % 3600 / 60, seconds % 60)
    } else if seconds >= 60 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}
