//! Plain-text rendering of aggregated views

use std::fmt::Write;

use crate::types::{CycleDayAnalysis, DashboardStats, DayLog, OrderedMap, TrendPoint};

fn join_pairs<K: std::fmt::Display>(pairs: &[(K, u64)]) -> String {
    pairs
        .iter()
        .map(|(k, n)| format!("{} ({})", k, n))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cycle_label(cycle_day: Option<u32>) -> String {
    cycle_day.map_or_else(|| "-".to_string(), |d| d.to_string())
}

pub fn dashboard(stats: &DashboardStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Symptom Dashboard");
    if stats.total_entries == 0 {
        let _ = writeln!(output, "No entries logged yet.");
        return output;
    }

    let _ = writeln!(
        output,
        "{} days logged ({} to {})",
        stats.total_entries,
        stats.date_range.start.as_deref().unwrap_or("-"),
        stats.date_range.end.as_deref().unwrap_or("-")
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Symptom Frequency");
    if stats.symptom_frequency.is_empty() {
        let _ = writeln!(output, "No symptoms recorded.");
    }
    for (symptom, count) in stats.symptom_frequency.iter() {
        let _ = writeln!(output, "- {:<24} {}", symptom, count);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Cycle Days");
    match &stats.cycle_day_patterns {
        Some(patterns) => {
            let _ = writeln!(
                output,
                "Average {:.1}, range {}-{}",
                patterns.average, patterns.range.min, patterns.range.max
            );
            let _ = writeln!(
                output,
                "Most common: {}",
                join_pairs(&patterns.most_common)
            );
        }
        None => {
            let _ = writeln!(output, "No cycle days recorded.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Last 7 Days");
    if stats.recent_entries.is_empty() {
        let _ = writeln!(output, "Nothing logged recently.");
    }
    for entry in &stats.recent_entries {
        let _ = write!(
            output,
            "- {} [cycle {}] {}",
            entry.date,
            cycle_label(entry.cycle_day),
            entry.symptoms.join(", ")
        );
        if !entry.comment.is_empty() {
            let _ = write!(output, " | {}", entry.comment);
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Monthly Summary");
    for (month, summary) in stats.monthly_summary.iter() {
        let _ = writeln!(
            output,
            "- {}: {} days, {} mentions, {} unique; top: {}",
            month,
            summary.entries,
            summary.total_symptoms,
            summary.unique_symptoms,
            join_pairs(&summary.top_symptoms)
        );
    }

    output
}

pub fn trend(symptom: &str, points: &[TrendPoint]) -> String {
    let mut output = String::new();
    let hits = points.iter().filter(|p| p.occurred).count();

    let _ = writeln!(
        output,
        "# Trend for \"{}\": {} of {} days",
        symptom,
        hits,
        points.len()
    );
    for point in points {
        let _ = writeln!(
            output,
            "{} {} [cycle {}]",
            point.date,
            if point.occurred { "x" } else { "." },
            cycle_label(point.cycle_day)
        );
    }

    output
}

pub fn cycles(analysis: &OrderedMap<u32, CycleDayAnalysis>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Symptoms by Cycle Day");
    if analysis.is_empty() {
        let _ = writeln!(output, "No cycle days recorded.");
    }
    for (cycle_day, day) in analysis.iter() {
        let most_common = day
            .most_common_symptom
            .as_ref()
            .map_or_else(|| "-".to_string(), |(s, n)| format!("{} ({})", s, n));
        let _ = writeln!(
            output,
            "Day {:>3}: {} mentions, most common {}",
            cycle_day, day.total_occurrences, most_common
        );
    }

    output
}

pub fn day(date: &str, day: &DayLog) -> String {
    let mut output = String::new();

    match day.latest() {
        Some(entry) => {
            let _ = writeln!(output, "{}", date);
            if let Some(datetime) = &entry.datetime {
                let _ = writeln!(output, "  saved:    {}", datetime);
            }
            let _ = writeln!(output, "  symptoms: {}", entry.symptoms.join(", "));
            let _ = writeln!(output, "  cycle:    {}", cycle_label(entry.cycle_day));
            if !entry.comment_text().is_empty() {
                let _ = writeln!(output, "  comment:  {}", entry.comment_text());
            }
        }
        None => {
            let _ = writeln!(output, "Nothing logged for {}", date);
        }
    }

    output
}
