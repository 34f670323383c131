//! Derived views produced by the aggregator

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Mapping that keeps the order it was built in.
///
/// Serializes as a JSON object whose keys appear in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<K, V>(Vec<(K, V)>);

impl<K: PartialEq, V> OrderedMap<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<K, V> OrderedMap<K, V> {
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<K, V> From<Vec<(K, V)>> for OrderedMap<K, V> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self(pairs)
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// Symptom name → occurrence count
pub type FrequencyTable = OrderedMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleDayRange {
    pub min: u32,
    pub max: u32,
}

/// Summary of the cycle days recorded across the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleDayPatterns {
    /// Up to five `(cycle_day, count)` pairs, most frequent first
    pub most_common: Vec<(u32, u64)>,
    /// Mean over every recorded value, repeats included
    pub average: f64,
    pub range: CycleDayRange,
}

/// A tail entry that falls inside the recency window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentEntry {
    pub date: String,
    pub symptoms: Vec<String>,
    pub cycle_day: Option<u32>,
    pub comment: String,
    pub datetime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    /// Dates logged in the month
    pub entries: u64,
    pub total_symptoms: u64,
    pub unique_symptoms: u64,
    pub top_symptoms: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardStats {
    pub total_entries: usize,
    pub date_range: DateRange,
    pub symptom_frequency: FrequencyTable,
    /// `None` when no entry carries a cycle day; serialized as `{}`
    #[serde(serialize_with = "patterns_or_empty")]
    pub cycle_day_patterns: Option<CycleDayPatterns>,
    pub recent_entries: Vec<RecentEntry>,
    /// `YYYY-MM` → summary, newest month first
    pub monthly_summary: OrderedMap<String, MonthSummary>,
}

fn patterns_or_empty<S: Serializer>(
    patterns: &Option<CycleDayPatterns>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match patterns {
        Some(patterns) => patterns.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Presence of one symptom on one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub occurred: bool,
    pub cycle_day: Option<u32>,
    pub all_symptoms: Vec<String>,
}

/// Symptoms observed on one cycle day across the whole log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleDayAnalysis {
    pub total_occurrences: u64,
    /// In first-occurrence order
    pub symptom_frequency: FrequencyTable,
    pub most_common_symptom: Option<(String, u64)>,
}
