//! Symptom log types as persisted on disk
//!
//! Decoding is lenient: a malformed optional field falls back to its
//! default instead of failing the whole log.

use chrono::{Local, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Date key format used throughout the log (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format stamped on new entries.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a log date key, rejecting anything that is not exactly `YYYY-MM-DD`.
///
/// Lexicographic order of keys equals chronological order only for this
/// zero-padded form, so "2025-1-5" is rejected even though it names a real day.
pub fn parse_log_date(date: &str) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    if parsed.format(DATE_FORMAT).to_string() == date {
        Some(parsed)
    } else {
        None
    }
}

/// Array of strings; non-string items are dropped, anything else is empty.
fn lenient_symptoms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Non-negative integer, or a string holding one.
fn lenient_cycle_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// One recorded observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LogEntry {
    /// Second-precision timestamp of when the entry was saved
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient_symptoms")]
    pub symptoms: Vec<String>,
    #[serde(
        rename = "cycleDay",
        default,
        deserialize_with = "lenient_cycle_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub cycle_day: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub comment: Option<String>,
}

impl LogEntry {
    /// Build an entry stamped with the current local time.
    /// Comments are trimmed; a blank comment is dropped.
    pub fn new(symptoms: Vec<String>, cycle_day: Option<u32>, comment: Option<&str>) -> Self {
        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        Self {
            datetime: Some(Local::now().format(DATETIME_FORMAT).to_string()),
            symptoms,
            cycle_day,
            comment,
        }
    }

    /// Comment text, empty when absent
    pub fn comment_text(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}

/// Entries recorded for a single date. Only the latest one is authoritative.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(transparent)]
pub struct DayLog(Vec<LogEntry>);

impl DayLog {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self(entries)
    }

    /// The current entry for the day (tail of the history)
    pub fn latest(&self) -> Option<&LogEntry> {
        self.0.last()
    }

    /// Collapse the day to a single entry
    pub fn replace_with(&mut self, entry: LogEntry) {
        self.0.clear();
        self.0.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// A non-array day is empty; items that are not objects are skipped.
impl<'de> Deserialize<'de> for DayLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        };
        Ok(Self(entries))
    }
}

impl From<Vec<LogEntry>> for DayLog {
    fn from(entries: Vec<LogEntry>) -> Self {
        Self(entries)
    }
}

/// The full persisted state: date key → entries for that date.
///
/// Keys keep the order they appear in the file; new dates go to the end.
/// Ranking ties in the aggregator follow this order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct SymptomLog(IndexMap<String, DayLog>);

impl SymptomLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: &str) -> Option<&DayLog> {
        self.0.get(date)
    }

    pub fn insert(&mut self, date: impl Into<String>, day: DayLog) {
        self.0.insert(date.into(), day);
    }

    /// Replace whatever was recorded for `date` with a single entry.
    /// An existing date keeps its position.
    pub fn replace(&mut self, date: impl Into<String>, entry: LogEntry) {
        self.0.entry(date.into()).or_default().replace_with(entry);
    }

    /// Iterate `(date, day)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DayLog)> {
        self.0.iter().map(|(date, day)| (date.as_str(), day))
    }

    /// Iterate `(date, day)` pairs in ascending date order
    pub fn iter_by_date(&self) -> impl Iterator<Item = (&str, &DayLog)> {
        let mut days: Vec<(&str, &DayLog)> = self.iter().collect();
        days.sort_by(|a, b| a.0.cmp(b.0));
        days.into_iter()
    }

    /// Iterate `(date, latest entry)` for every non-empty day, in file order
    pub fn latest_entries(&self) -> impl Iterator<Item = (&str, &LogEntry)> {
        self.iter()
            .filter_map(|(date, day)| day.latest().map(|entry| (date, entry)))
    }

    /// Dates in file order
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Lexicographically smallest date key
    pub fn first_date(&self) -> Option<&str> {
        self.dates().min()
    }

    /// Lexicographically largest date key
    pub fn last_date(&self) -> Option<&str> {
        self.dates().max()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<D: Into<String>> FromIterator<(D, DayLog)> for SymptomLog {
    fn from_iter<I: IntoIterator<Item = (D, DayLog)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(d, day)| (d.into(), day)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(symptoms: &[&str]) -> LogEntry {
        LogEntry {
            datetime: None,
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            cycle_day: None,
            comment: None,
        }
    }

    // ========== parse_log_date tests ==========

    #[test]
    fn test_parse_log_date_valid() {
        let date = parse_log_date("2025-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_log_date_rejects_unpadded() {
        assert!(parse_log_date("2025-1-5").is_none());
    }

    #[test]
    fn test_parse_log_date_rejects_impossible_day() {
        assert!(parse_log_date("2025-02-30").is_none());
        assert!(parse_log_date("2025-13-01").is_none());
    }

    #[test]
    fn test_parse_log_date_rejects_garbage() {
        assert!(parse_log_date("not-a-date").is_none());
        assert!(parse_log_date("").is_none());
        assert!(parse_log_date("2025-01-15T10:00:00").is_none());
    }

    // ========== LogEntry tests ==========

    #[test]
    fn test_log_entry_deserialize_wire_format() {
        let json = r#"{
            "datetime": "2025-10-03 08:15:00",
            "symptoms": ["Head Pain", "Bloated Feeling"],
            "cycleDay": 12,
            "comment": "after coffee"
        }"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.datetime.as_deref(), Some("2025-10-03 08:15:00"));
        assert_eq!(entry.symptoms, vec!["Head Pain", "Bloated Feeling"]);
        assert_eq!(entry.cycle_day, Some(12));
        assert_eq!(entry.comment_text(), "after coffee");
    }

    #[test]
    fn test_log_entry_missing_fields_default() {
        let entry: LogEntry = serde_json::from_str("{}").unwrap();
        assert!(entry.datetime.is_none());
        assert!(entry.symptoms.is_empty());
        assert!(entry.cycle_day.is_none());
        assert_eq!(entry.comment_text(), "");
    }

    #[test]
    fn test_log_entry_omits_absent_optionals() {
        let json = serde_json::to_string(&entry(&["Knee Pain"])).unwrap();
        assert_eq!(json, r#"{"symptoms":["Knee Pain"]}"#);
    }

    #[test]
    fn test_log_entry_new_trims_comment() {
        let e = LogEntry::new(vec!["Head Pain".into()], Some(3), Some("  tired  "));
        assert_eq!(e.comment.as_deref(), Some("tired"));
        assert_eq!(e.cycle_day, Some(3));
        assert!(e.datetime.is_some());
    }

    #[test]
    fn test_log_entry_new_drops_blank_comment() {
        let e = LogEntry::new(Vec::new(), None, Some("   "));
        assert!(e.comment.is_none());
    }

    // ========== DayLog tests ==========

    #[test]
    fn test_day_log_latest_is_tail() {
        let day = DayLog::new(vec![entry(&["Old"]), entry(&["New"])]);
        assert_eq!(day.latest().unwrap().symptoms, vec!["New"]);
    }

    #[test]
    fn test_day_log_latest_empty() {
        assert!(DayLog::default().latest().is_none());
    }

    #[test]
    fn test_day_log_replace_with_collapses() {
        let mut day = DayLog::new(vec![entry(&["A"]), entry(&["B"])]);
        day.replace_with(entry(&["C"]));
        assert_eq!(day.len(), 1);
        assert_eq!(day.latest().unwrap().symptoms, vec!["C"]);
    }

    // ========== SymptomLog tests ==========

    #[test]
    fn test_symptom_log_keeps_file_order() {
        let log: SymptomLog = [
            ("2025-03-01", DayLog::default()),
            ("2025-01-01", DayLog::default()),
            ("2025-02-01", DayLog::default()),
        ]
        .into_iter()
        .collect();

        let dates: Vec<&str> = log.dates().collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-01-01", "2025-02-01"]);
        assert_eq!(log.first_date(), Some("2025-01-01"));
        assert_eq!(log.last_date(), Some("2025-03-01"));

        let by_date: Vec<&str> = log.iter_by_date().map(|(d, _)| d).collect();
        assert_eq!(by_date, vec!["2025-01-01", "2025-02-01", "2025-03-01"]);
    }

    #[test]
    fn test_symptom_log_replace_keeps_position() {
        let mut log: SymptomLog = [
            ("2025-01-02", DayLog::new(vec![entry(&["A"])])),
            ("2025-01-01", DayLog::new(vec![entry(&["B"])])),
        ]
        .into_iter()
        .collect();

        log.replace("2025-01-02", entry(&["C"]));
        log.replace("2025-01-03", entry(&["D"]));

        let dates: Vec<&str> = log.dates().collect();
        assert_eq!(dates, vec!["2025-01-02", "2025-01-01", "2025-01-03"]);
    }

    #[test]
    fn test_symptom_log_latest_entries_skips_empty_days() {
        let log: SymptomLog = [
            ("2025-01-01", DayLog::new(vec![entry(&["A"])])),
            ("2025-01-02", DayLog::default()),
        ]
        .into_iter()
        .collect();

        let latest: Vec<&str> = log.latest_entries().map(|(d, _)| d).collect();
        assert_eq!(latest, vec!["2025-01-01"]);
    }

    #[test]
    fn test_symptom_log_replace_inserts_new_date() {
        let mut log = SymptomLog::new();
        log.replace("2025-01-01", entry(&["A"]));
        assert_eq!(log.len(), 1);
        assert_eq!(log.get("2025-01-01").unwrap().len(), 1);
    }

    #[test]
    fn test_symptom_log_json_roundtrip_shape() {
        let json = r#"{"2025-01-02":[{"symptoms":["A"]}],"2025-01-01":[]}"#;
        let log: SymptomLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.get("2025-01-01").unwrap().is_empty());

        let out = serde_json::to_string(&log).unwrap();
        assert_eq!(out, json);
    }

    // ========== lenient decoding tests ==========

    #[test]
    fn test_null_symptoms_default_to_empty() {
        let log: SymptomLog =
            serde_json::from_str(r#"{"2025-01-01":[{"symptoms":null}]}"#).unwrap();
        let latest = log.get("2025-01-01").unwrap().latest().unwrap();
        assert!(latest.symptoms.is_empty());
    }

    #[test]
    fn test_non_array_symptoms_and_non_string_items() {
        let e: LogEntry = serde_json::from_str(r#"{"symptoms":"Headache"}"#).unwrap();
        assert!(e.symptoms.is_empty());

        let e: LogEntry = serde_json::from_str(r#"{"symptoms":["Headache", 3, null]}"#).unwrap();
        assert_eq!(e.symptoms, vec!["Headache"]);
    }

    #[test]
    fn test_cycle_day_variants() {
        let cycle_day = |raw: &str| {
            serde_json::from_str::<LogEntry>(&format!(r#"{{"cycleDay":{}}}"#, raw))
                .unwrap()
                .cycle_day
        };

        assert_eq!(cycle_day("14"), Some(14));
        assert_eq!(cycle_day(r#""3""#), Some(3));
        assert_eq!(cycle_day("-2"), None);
        assert_eq!(cycle_day("2.5"), None);
        assert_eq!(cycle_day(r#""soon""#), None);
        assert_eq!(cycle_day("null"), None);
        assert_eq!(cycle_day("[1]"), None);
    }

    #[test]
    fn test_non_string_comment_and_datetime() {
        let e: LogEntry =
            serde_json::from_str(r#"{"symptoms":["A"],"comment":42,"datetime":false}"#).unwrap();
        assert!(e.comment.is_none());
        assert!(e.datetime.is_none());
        assert_eq!(e.symptoms, vec!["A"]);
    }

    #[test]
    fn test_bad_field_on_one_date_keeps_other_dates() {
        let json = r#"{
            "2025-01-01": [{"symptoms": ["A"], "cycleDay": -4, "comment": ["x"]}],
            "2025-01-02": [{"symptoms": ["B"], "cycleDay": 2}],
            "2025-01-03": "not a list",
            "2025-01-04": [{"symptoms": ["C"]}, "stray"]
        }"#;
        let log: SymptomLog = serde_json::from_str(json).unwrap();

        assert_eq!(log.len(), 4);
        let first = log.get("2025-01-01").unwrap().latest().unwrap();
        assert_eq!(first.symptoms, vec!["A"]);
        assert!(first.cycle_day.is_none());
        assert_eq!(
            log.get("2025-01-02").unwrap().latest().unwrap().cycle_day,
            Some(2)
        );
        assert!(log.get("2025-01-03").unwrap().is_empty());
        assert_eq!(
            log.get("2025-01-04").unwrap().latest().unwrap().symptoms,
            vec!["C"]
        );
    }
}
