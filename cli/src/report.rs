//! Human-readable command output. Everything here goes to stdout.

use witsync_core::api::{DiffResult, SyncOutcome, SyncStats, UtteranceReport};
use witsync_plugins::wit::ImportSummary;

fn list_lines(title: &str, names: &[String]) -> Vec<String> {
    let mut lines = vec![format!("{} ({}):", title, names.len())];
    lines.extend(names.iter().map(|n| format!("  - {}", n)));
    lines
}

pub fn comparison_lines(entity: &str, diff: &DiffResult) -> Vec<String> {
    if diff.is_synced() {
        return vec![format!("{}: mirror is in sync with the database", entity)];
    }
    let mut lines = vec![format!("{}: mirror differs from the database", entity)];
    if !diff.to_add.is_empty() {
        lines.extend(list_lines("missing from mirror", &diff.to_add));
    }
    if !diff.to_remove.is_empty() {
        lines.extend(list_lines("not in database", &diff.to_remove));
    }
    lines
}

pub fn stats_lines(entity: &str, stats: &SyncStats) -> Vec<String> {
    vec![
        format!("{} statistics:", entity),
        format!("  database names:      {}", stats.canonical_total),
        format!("  mirror keywords:     {}", stats.mirror_total),
        format!("  in both:             {}", stats.in_both),
        format!("  only in database:    {}", stats.only_in_canonical),
        format!("  only in mirror:      {}", stats.only_in_mirror),
        format!("  sync percentage:     {:.1}%", stats.sync_percentage),
    ]
}

pub fn sync_lines(entity: &str, outcome: &SyncOutcome) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: removed {}, added {}",
        entity, outcome.removed, outcome.added
    )];
    if outcome.synced {
        lines.push("verification: in sync".to_string());
    } else {
        lines.push("verification: still out of sync".to_string());
    }
    lines
}

pub fn utterance_lines(report: &UtteranceReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {} uploaded, {} failed",
        report.source.as_deref().unwrap_or("utterances"),
        report.succeeded,
        report.failed
    )];
    lines.extend(
        report
            .failures
            .iter()
            .map(|f| format!("  #{}: {}", f.index + 1, f.reason)),
    );
    lines
}

pub fn import_lines(summary: &ImportSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for report in &summary.reports {
        lines.extend(utterance_lines(report));
    }
    let mut total = format!(
        "{}: {} succeeded, {} failed",
        summary.phase, summary.succeeded, summary.failed
    );
    if summary.skipped > 0 {
        total.push_str(&format!(", {} files skipped", summary.skipped));
    }
    lines.push(total);
    lines
}

pub fn print(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
