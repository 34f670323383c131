//! Aggregator service for computing dashboard statistics
//!
//! Every function here is a pure read over a `SymptomLog` snapshot.
//! Only the tail entry of each day is counted. Frequency ties keep the
//! order in which dates appear in the log.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::services::Tally;
use crate::types::{
    parse_log_date, CycleDayAnalysis, CycleDayPatterns, CycleDayRange, DashboardStats, DateRange,
    MonthSummary, OrderedMap, RecentEntry, SymptomLog, TrendPoint,
};

/// Entries at most this many days old count as recent
pub const RECENT_WINDOW_DAYS: i64 = 7;
/// Maximum number of recent entries on the dashboard
pub const RECENT_LIMIT: usize = 7;
/// Cycle days listed in `most_common`
pub const TOP_CYCLE_DAYS: usize = 5;
/// Symptoms listed per month
pub const TOP_MONTH_SYMPTOMS: usize = 3;

/// Aggregator for computing symptom statistics
pub struct Aggregator;

impl Aggregator {
    /// Dashboard statistics relative to the current local time
    pub fn dashboard(log: &SymptomLog) -> DashboardStats {
        Self::dashboard_at(log, Local::now().naive_local())
    }

    /// Dashboard statistics with an explicit "now" for the recency window
    pub fn dashboard_at(log: &SymptomLog, now: NaiveDateTime) -> DashboardStats {
        if log.is_empty() {
            return DashboardStats::default();
        }

        let mut symptoms: Tally<String> = Tally::new();
        let mut cycle_days: Tally<u32> = Tally::new();
        let mut recent_entries: Vec<RecentEntry> = Vec::new();

        for (date, entry) in log.latest_entries() {
            symptoms.extend(entry.symptoms.iter().cloned());

            if let Some(cycle_day) = entry.cycle_day {
                cycle_days.add(cycle_day);
            }

            let is_recent = parse_log_date(date).is_some_and(|parsed| within_window(parsed, now));
            if is_recent {
                recent_entries.push(RecentEntry {
                    date: date.to_string(),
                    symptoms: entry.symptoms.clone(),
                    cycle_day: entry.cycle_day,
                    comment: entry.comment_text().to_string(),
                    datetime: entry.datetime.clone().unwrap_or_else(|| date.to_string()),
                });
            }
        }

        // Newest first
        recent_entries.sort_by(|a, b| b.date.cmp(&a.date));
        recent_entries.truncate(RECENT_LIMIT);

        DashboardStats {
            total_entries: log.len(),
            date_range: DateRange {
                start: log.first_date().map(String::from),
                end: log.last_date().map(String::from),
            },
            symptom_frequency: symptoms.most_common().into(),
            cycle_day_patterns: cycle_day_patterns(&cycle_days),
            recent_entries,
            monthly_summary: monthly_summary(log),
        }
    }

    /// Per-date presence of a symptom, ascending by date.
    ///
    /// Matching is a case-insensitive substring test, so "head" matches
    /// "Head Pain" and an empty query matches any recorded symptom.
    /// Days with no entries are left out.
    pub fn symptom_trend(log: &SymptomLog, symptom_name: &str) -> Vec<TrendPoint> {
        let query = symptom_name.to_lowercase();

        log.iter_by_date()
            .filter_map(|(date, day)| day.latest().map(|entry| (date, entry)))
            .map(|(date, entry)| TrendPoint {
                date: date.to_string(),
                occurred: entry
                    .symptoms
                    .iter()
                    .any(|s| s.to_lowercase().contains(&query)),
                cycle_day: entry.cycle_day,
                all_symptoms: entry.symptoms.clone(),
            })
            .collect()
    }

    /// Symptom breakdown per cycle day, ascending by cycle day
    pub fn cycle_day_analysis(log: &SymptomLog) -> OrderedMap<u32, CycleDayAnalysis> {
        let mut by_cycle_day: BTreeMap<u32, Tally<String>> = BTreeMap::new();

        for (_, entry) in log.latest_entries() {
            if let Some(cycle_day) = entry.cycle_day {
                by_cycle_day
                    .entry(cycle_day)
                    .or_default()
                    .extend(entry.symptoms.iter().cloned());
            }
        }

        by_cycle_day
            .into_iter()
            .map(|(cycle_day, tally)| {
                let most_common_symptom = tally.top(1).into_iter().next();
                let analysis = CycleDayAnalysis {
                    total_occurrences: tally.total(),
                    most_common_symptom,
                    symptom_frequency: tally.into_ordered(),
                };
                (cycle_day, analysis)
            })
            .collect()
    }
}

/// Whole days elapsed since `date` (at midnight) are within the window.
/// Future dates always qualify.
fn within_window(date: NaiveDate, now: NaiveDateTime) -> bool {
    let elapsed = now - date.and_time(NaiveTime::MIN);
    elapsed.num_days() <= RECENT_WINDOW_DAYS
}

fn cycle_day_patterns(cycle_days: &Tally<u32>) -> Option<CycleDayPatterns> {
    if cycle_days.is_empty() {
        return None;
    }

    let ranked = cycle_days.most_common();
    let sum: u64 = ranked
        .iter()
        .map(|&(day, count)| u64::from(day) * count)
        .sum();
    let min = ranked.iter().map(|&(day, _)| day).min()?;
    let max = ranked.iter().map(|&(day, _)| day).max()?;

    Some(CycleDayPatterns {
        most_common: ranked.into_iter().take(TOP_CYCLE_DAYS).collect(),
        average: sum as f64 / cycle_days.total() as f64,
        range: CycleDayRange { min, max },
    })
}

#[derive(Default)]
struct MonthAccumulator {
    entries: u64,
    symptoms: Tally<String>,
}

/// Group parseable dates by `YYYY-MM`, newest month first
fn monthly_summary(log: &SymptomLog) -> OrderedMap<String, MonthSummary> {
    let mut months: BTreeMap<String, MonthAccumulator> = BTreeMap::new();

    for (date, day) in log.iter_by_date() {
        let Some(parsed) = parse_log_date(date) else {
            continue;
        };

        let month = months
            .entry(parsed.format("%Y-%m").to_string())
            .or_default();
        month.entries += 1;

        if let Some(entry) = day.latest() {
            month.symptoms.extend(entry.symptoms.iter().cloned());
        }
    }

    months
        .into_iter()
        .rev()
        .map(|(key, month)| {
            let summary = MonthSummary {
                entries: month.entries,
                total_symptoms: month.symptoms.total(),
                unique_symptoms: month.symptoms.distinct() as u64,
                top_symptoms: month.symptoms.top(TOP_MONTH_SYMPTOMS),
            };
            (key, summary)
        })
        .collect()
}
