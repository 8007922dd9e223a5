//! Colored terminal output for sync results.

use icsync_core::diff::DiffKind;
use icsync_core::{FailedEvent, SyncReport};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        let symbol = self.symbol();
        match self {
            DiffKind::Create => symbol.green().to_string(),
            DiffKind::Update => symbol.yellow().to_string(),
            DiffKind::Delete => symbol.red().to_string(),
        }
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

pub fn render_plan(action: &str, count: usize, calendar_name: &str) -> String {
    format!(
        "📅 {}: preparing to {} {} {}",
        calendar_name.bold(),
        action,
        count,
        pluralize("event", count)
    )
}

/// Failures are listed one per line; successes only as counts.
pub fn render_report(report: &SyncReport) -> String {
    let mut lines = Vec::new();

    let counts = [
        (DiffKind::Create, report.added, "added"),
        (DiffKind::Delete, report.removed, "removed"),
        (DiffKind::Update, report.synced, "updated"),
    ];
    for (kind, count, label) in counts {
        if count > 0 {
            lines.push(format!(
                "   {} {} {} {}",
                kind.render(),
                count,
                pluralize("event", count),
                label
            ));
        }
    }

    if report.unchanged > 0 {
        lines.push(
            format!("   = {} unchanged", report.unchanged)
                .dimmed()
                .to_string(),
        );
    }

    if !report.already_exists.is_empty() {
        let count = report.already_exists.len();
        lines.push(
            format!(
                "   {} {} already in the calendar",
                count,
                pluralize("event", count)
            )
            .dimmed()
            .to_string(),
        );
    }

    let failures = [
        (DiffKind::Create, &report.add_failures),
        (DiffKind::Delete, &report.remove_failures),
        (DiffKind::Update, &report.update_failures),
    ];
    for (kind, list) in failures {
        for failure in list {
            lines.push(render_failure(kind, failure));
        }
    }

    if lines.is_empty() {
        lines.push("   Nothing to do".dimmed().to_string());
    }

    if !report.is_clean() {
        let count = report.failure_count();
        lines.push(format!(
            "\n{} {} failed, see the log for details",
            count,
            pluralize("event", count)
        ));
    }

    lines.join("\n")
}

fn render_failure(kind: DiffKind, failure: &FailedEvent) -> String {
    format!(
        "   {} {} {} {}",
        kind.render(),
        failure.title.red(),
        format!("({})", failure.id).dimmed(),
        failure.reason.red()
    )
}
