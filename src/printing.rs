use crate::objectdb::{Report, ReportEntry, Summary};

pub fn print_report(report: &Report) {
    for entry in &report.entries {
        println!("{}", format_entry(entry));
    }

    if !report.entries.is_empty() {
        println!();
    }

    for line in summary_lines(&report.summary) {
        println!("{line}");
    }
}

fn format_entry(entry: &ReportEntry) -> String {
    format!(
        "{:<2} {:<4} {}",
        entry.status.code(),
        entry.kind.label(),
        entry.path
    )
}

/// One line per non-zero count, or a single line if nothing differs.
fn summary_lines(summary: &Summary) -> Vec<String> {
    if summary.is_identical() {
        return vec!["Manual and disc folder are identical".to_string()];
    }

    let counts = [
        (summary.directories_added, "directory added", "directories added"),
        (summary.directories_deleted, "directory deleted", "directories deleted"),
        (summary.files_added, "file added", "files added"),
        (summary.files_changed, "file changed", "files changed"),
        (summary.files_deleted, "file deleted", "files deleted"),
    ];

    counts
        .iter()
        .filter(|(count, _, _)| *count > 0)
        .map(|(count, one, many)| {
            let label = if *count == 1 { one } else { many };
            format!("{count} {label}")
        })
        .collect()
}
