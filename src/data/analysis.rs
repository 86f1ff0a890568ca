use thiserror::Error;

use super::model::{CatalogRecord, FieldValue};

// ---------------------------------------------------------------------------
// Duration statistics over catalog records
// ---------------------------------------------------------------------------

/// Runtime cutoff (minutes, inclusive) under which a title counts as short.
pub const SHORT_RUNTIME_CUTOFF_MIN: u32 = 90;

/// Genre tag fed to the short-title counter until the user picks another.
pub const DEFAULT_SHORT_GENRE: &str = "Action";

/// No usable duration samples were available for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no duration samples to aggregate")]
pub struct EmptyInputError;

/// Extract the first contiguous run of ASCII decimal digits from `s`.
///
/// Returns `None` when the string carries no digits. A run too long for
/// `u32` saturates at `u32::MAX` instead of failing.
pub fn leading_digits(s: &str) -> Option<u32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    // The run is all digits, so parsing can only fail on range.
    Some(rest[..end].parse::<u32>().unwrap_or(u32::MAX))
}

/// Normalize a raw duration cell to whole minutes.
///
/// Non-negative numeric cells pass through unchanged; textual cells yield
/// their leading digit run ("90 min" → 90). Everything else is
/// soft-excluded with `None` — malformed input never fails the pipeline.
pub fn normalize_duration(value: &FieldValue) -> Option<u32> {
    match value {
        FieldValue::Integer(n) => u32::try_from(*n).ok(),
        FieldValue::Float(f) if *f >= 0.0 => Some(*f as u32),
        FieldValue::String(s) => leading_digits(s),
        _ => None,
    }
}

/// Collect the normalized duration of every record that has one, in input
/// order. Records whose duration does not normalize contribute nothing.
pub fn duration_samples<'a, I>(records: I) -> Vec<u32>
where
    I: IntoIterator<Item = &'a CatalogRecord>,
{
    records
        .into_iter()
        .filter_map(|r| normalize_duration(&r.duration))
        .collect()
}

/// The most frequent sample value.
///
/// Counts occurrences with a frequency-table scan kept in first-seen
/// order; when several values tie for the maximum, the one encountered
/// first wins, so the result is stable for a given input order.
pub fn most_frequent_duration(samples: &[u32]) -> Result<u32, EmptyInputError> {
    let mut table: Vec<(u32, usize)> = Vec::new();
    for &sample in samples {
        match table.iter_mut().find(|(value, _)| *value == sample) {
            Some((_, count)) => *count += 1,
            None => table.push((sample, 1)),
        }
    }

    let mut best: Option<(u32, usize)> = None;
    for &(value, count) in &table {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value).ok_or(EmptyInputError)
}

/// Count records tagged with `genre_tag` whose normalized duration is at
/// most `max_minutes`.
///
/// Matching is exact membership against the record's delimited tag list;
/// records whose duration does not normalize are not short. Zero is a
/// valid result, including on empty input.
pub fn count_short_genre_titles<'a, I>(records: I, genre_tag: &str, max_minutes: u32) -> usize
where
    I: IntoIterator<Item = &'a CatalogRecord>,
{
    records
        .into_iter()
        .filter(|r| r.has_genre(genre_tag))
        .filter_map(|r| normalize_duration(&r.duration))
        .filter(|&minutes| minutes <= max_minutes)
        .count()
}

// ---------------------------------------------------------------------------
// Aggregate for the insight panel
// ---------------------------------------------------------------------------

/// Everything the insight panel needs for one filtered view.
#[derive(Debug, Clone)]
pub struct DurationStats {
    /// Normalized samples in record order (histogram input).
    pub samples: Vec<u32>,
    /// Most frequent value among `samples`.
    pub most_frequent: u32,
    /// Titles matching the short-genre rule.
    pub short_count: usize,
}

impl DurationStats {
    /// Aggregate over a filtered record view.
    ///
    /// Fails with [`EmptyInputError`] when no record yields a usable
    /// duration; callers surface that as a "no data" notice.
    pub fn compute(
        records: &[&CatalogRecord],
        genre_tag: &str,
        max_minutes: u32,
    ) -> Result<Self, EmptyInputError> {
        let samples = duration_samples(records.iter().copied());
        let most_frequent = most_frequent_duration(&samples)?;
        let short_count = count_short_genre_titles(records.iter().copied(), genre_tag, max_minutes);
        Ok(DurationStats {
            samples,
            most_frequent,
            short_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_by_year_range, YearRange};
    use std::collections::BTreeMap;

    fn record(year: Option<i32>, duration: FieldValue, genres: &[&str]) -> CatalogRecord {
        CatalogRecord {
            title: String::new(),
            release_year: year,
            duration,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn normalize_passes_numeric_input_through() {
        assert_eq!(normalize_duration(&FieldValue::Integer(90)), Some(90));
        assert_eq!(normalize_duration(&FieldValue::Float(95.0)), Some(95));
    }

    #[test]
    fn normalize_extracts_leading_digits_from_text() {
        assert_eq!(
            normalize_duration(&FieldValue::String("90 min".into())),
            Some(90)
        );
        assert_eq!(
            normalize_duration(&FieldValue::String("about 110 minutes".into())),
            Some(110)
        );
        // Only the first digit run counts.
        assert_eq!(
            normalize_duration(&FieldValue::String("1h 30m".into())),
            Some(1)
        );
    }

    #[test]
    fn normalize_soft_excludes_malformed_input() {
        assert_eq!(normalize_duration(&FieldValue::String("abc".into())), None);
        assert_eq!(normalize_duration(&FieldValue::String(String::new())), None);
        assert_eq!(normalize_duration(&FieldValue::Null), None);
        assert_eq!(normalize_duration(&FieldValue::Bool(true)), None);
        assert_eq!(normalize_duration(&FieldValue::Integer(-5)), None);
    }

    #[test]
    fn leading_digits_saturates_on_overflow() {
        assert_eq!(leading_digits("99999999999999 min"), Some(u32::MAX));
    }

    #[test]
    fn samples_preserve_order_and_skip_unparseable() {
        let records = vec![
            record(None, FieldValue::String("101 min".into()), &[]),
            record(None, FieldValue::String("n/a".into()), &[]),
            record(None, FieldValue::Integer(88), &[]),
        ];
        assert_eq!(duration_samples(&records), vec![101, 88]);
    }

    #[test]
    fn mode_picks_highest_count() {
        assert_eq!(most_frequent_duration(&[90, 90, 100, 100, 100]), Ok(100));
    }

    #[test]
    fn mode_ties_break_to_first_encountered() {
        assert_eq!(most_frequent_duration(&[90, 100]), Ok(90));
        assert_eq!(most_frequent_duration(&[100, 90, 90, 100]), Ok(100));
    }

    #[test]
    fn mode_fails_on_empty_input() {
        assert_eq!(most_frequent_duration(&[]), Err(EmptyInputError));
    }

    #[test]
    fn short_count_requires_exact_tag_and_cutoff() {
        let records = vec![
            record(None, FieldValue::String("90 min".into()), &["Action"]),
            record(None, FieldValue::String("95 min".into()), &["Action"]),
            record(None, FieldValue::String("80 min".into()), &["Action & Adventure"]),
            record(None, FieldValue::Null, &["Action"]),
        ];
        // 95 min is over the cutoff, "Action & Adventure" is a different
        // tag, and the unparseable duration is not short.
        assert_eq!(count_short_genre_titles(&records, "Action", 90), 1);
    }

    #[test]
    fn short_count_is_zero_on_empty_input() {
        assert_eq!(count_short_genre_titles(&[], "Action", 90), 0);
    }

    #[test]
    fn nineties_scenario_end_to_end() {
        let records = vec![
            record(Some(1995), FieldValue::String("90 min".into()), &["Action"]),
            record(Some(1995), FieldValue::String("95 min".into()), &["Action"]),
            record(Some(1995), FieldValue::String("90 min".into()), &["Drama"]),
            record(Some(2005), FieldValue::String("90 min".into()), &["Action"]),
        ];

        let filtered = filter_by_year_range(&records, YearRange::NINETIES);
        assert_eq!(filtered.len(), 3);

        let stats =
            DurationStats::compute(&filtered, DEFAULT_SHORT_GENRE, SHORT_RUNTIME_CUTOFF_MIN)
                .unwrap();
        assert_eq!(stats.most_frequent, 90);
        assert_eq!(stats.short_count, 1);
        assert_eq!(stats.samples, vec![90, 95, 90]);
    }

    #[test]
    fn compute_surfaces_empty_input() {
        let records = vec![record(Some(1995), FieldValue::Null, &["Action"])];
        let view: Vec<&CatalogRecord> = records.iter().collect();
        assert!(DurationStats::compute(&view, "Action", 90).is_err());
    }
}
