//! CSV rendering of a [`Summary`].

use roster_core::DateRange;

use crate::summary::Summary;

const FIXED_HEADERS: [&str; 3] = ["Agent", "On Call", "Night Shift"];

/// Full CSV document: header plus one row per agent, joined by `\n`.
pub fn summary_csv(summary: &Summary) -> String {
    let mut lines = Vec::with_capacity(summary.agents.len() + 1);

    let mut header: Vec<String> = FIXED_HEADERS.iter().map(|h| csv_escape(h)).collect();
    header.extend(summary.status_columns.iter().map(|c| csv_escape(c)));
    header.push("Total".to_string());
    lines.push(header.join(","));

    for (agent, stats) in &summary.agents {
        let mut row = vec![
            csv_escape(agent),
            stats.on_call.to_string(),
            stats.night_shift.to_string(),
        ];
        row.extend(
            summary
                .status_columns
                .iter()
                .map(|c| stats.count(c).to_string()),
        );
        row.push(stats.total.to_string());
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Download name, e.g. `roster_summary_2026-02-01_2026-02-28.csv`.
pub fn csv_file_name(range: &DateRange) -> String {
    format!("roster_summary_{}_{}.csv", range.start, range.end)
}

/// Quote a field when needed and defuse spreadsheet formulas.
pub fn csv_escape(value: &str) -> String {
    let value = neutralize_formula(value);
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value
    }
}

fn neutralize_formula(value: &str) -> String {
    if should_neutralize(value) {
        format!("'{value}")
    } else {
        value.to_string()
    }
}

fn should_neutralize(value: &str) -> bool {
    let trimmed = value.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('\'') {
        return false;
    }
    // Negative numbers stay as they are.
    if trimmed.parse::<f64>().is_ok() {
        return false;
    }
    matches!(trimmed.chars().next(), Some('=' | '+' | '-' | '@'))
}
