use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{AggregationError, UnitError};
use crate::models::{MeasurementEntry, MeasurementKind, UnitSystem};
use crate::units::UnitConverter;

/// Calendar window, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl AggregationWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AggregationError> {
        if start > end {
            return Err(AggregationError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering a single day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for AggregationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Relative date range offered by the range picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeSelector {
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "365d", alias = "1y")]
    Last365Days,
}

impl RangeSelector {
    pub fn days(&self) -> u64 {
        match self {
            RangeSelector::Last7Days => 7,
            RangeSelector::Last30Days => 30,
            RangeSelector::Last90Days => 90,
            RangeSelector::Last365Days => 365,
        }
    }

    /// Window of `days()` calendar days ending on `today`
    pub fn window_ending(&self, today: NaiveDate) -> AggregationWindow {
        let start = today
            .checked_sub_days(Days::new(self.days() - 1))
            .unwrap_or(NaiveDate::MIN);
        AggregationWindow { start, end: today }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeSelector::Last7Days => "7d",
            RangeSelector::Last30Days => "30d",
            RangeSelector::Last90Days => "90d",
            RangeSelector::Last365Days => "365d",
        }
    }
}

impl Default for RangeSelector {
    fn default() -> Self {
        RangeSelector::Last30Days
    }
}

impl fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeSelector {
    type Err = AggregationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" | "7" | "week" | "last_7_days" => Ok(RangeSelector::Last7Days),
            "30d" | "30" | "month" | "last_30_days" => Ok(RangeSelector::Last30Days),
            "90d" | "90" | "quarter" | "last_90_days" => Ok(RangeSelector::Last90Days),
            "365d" | "365" | "1y" | "year" | "last_365_days" => Ok(RangeSelector::Last365Days),
            other => Err(AggregationError::InvalidRange(other.to_string())),
        }
    }
}

/// Summary statistics over a normalized series, in the display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Arithmetic mean of all values
    pub average_value: Decimal,

    /// Last value minus first value
    pub change_value: Decimal,

    /// Mean of the recent half-window minus mean of the prior half-window
    pub trend_value: Decimal,
}

/// Result of aggregating one measurement series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub display_unit: UnitSystem,
    pub window: AggregationWindow,

    /// Retained entries, ascending by date, restated in `display_unit`
    pub normalized: Vec<MeasurementEntry>,

    pub summary: Summary,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn values(&self) -> Vec<Decimal> {
        self.normalized.iter().map(MeasurementEntry::value).collect()
    }
}

/// Aggregation tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Number of most recent entries split into halves for the trend
    pub trend_window: usize,

    /// Decimal places kept on summary values
    pub summary_decimals: u32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        AggregationConfig {
            trend_window: 14,
            summary_decimals: 2,
        }
    }
}

/// Turns raw measurement entries into chart-ready series and summaries
#[derive(Debug, Clone, Default)]
pub struct MetricAggregator {
    config: AggregationConfig,
    converter: UnitConverter,
}

impl MetricAggregator {
    /// Create an aggregator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with custom configuration
    pub fn with_config(config: AggregationConfig) -> Self {
        MetricAggregator {
            config,
            converter: UnitConverter::new(),
        }
    }

    /// Replace the converter, e.g. to use a custom conversion table
    pub fn with_converter(mut self, converter: UnitConverter) -> Self {
        self.converter = converter;
        self
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Filter to the window, drop same-day duplicates, normalize and summarize
    ///
    /// Expects a single kind of measurement; use [`aggregate_by_kind`] for
    /// mixed input. Empty input, or a window containing nothing, yields an
    /// empty series with a zero summary. The only failure is a conversion the
    /// table cannot make.
    ///
    /// [`aggregate_by_kind`]: MetricAggregator::aggregate_by_kind
    pub fn aggregate(
        &self,
        entries: &[MeasurementEntry],
        window: &AggregationWindow,
        display_unit: UnitSystem,
    ) -> Result<Aggregation, UnitError> {
        let retained = latest_per_day(entries, window);

        let kinds: BTreeSet<MeasurementKind> = retained.iter().map(|entry| entry.kind()).collect();
        if kinds.len() > 1 {
            tracing::warn!(
                kinds = ?kinds,
                "Aggregating several measurement kinds into one series; use aggregate_by_kind"
            );
        }

        tracing::debug!(
            total = entries.len(),
            retained = retained.len(),
            window = %window,
            display_unit = %display_unit,
            "Aggregating measurement entries"
        );

        let normalized = retained
            .into_iter()
            .map(|entry| self.converter.normalize(entry, display_unit))
            .collect::<Result<Vec<_>, _>>()?;

        let values: Vec<Decimal> = normalized.iter().map(MeasurementEntry::value).collect();
        let summary = self.summarize(&values);

        Ok(Aggregation {
            display_unit,
            window: *window,
            normalized,
            summary,
        })
    }

    /// Aggregate mixed-kind input into one series per kind
    pub fn aggregate_by_kind(
        &self,
        entries: &[MeasurementEntry],
        window: &AggregationWindow,
        display_unit: UnitSystem,
    ) -> Result<BTreeMap<MeasurementKind, Aggregation>, UnitError> {
        let mut by_kind: BTreeMap<MeasurementKind, Vec<MeasurementEntry>> = BTreeMap::new();
        for entry in entries {
            by_kind.entry(entry.kind()).or_default().push(entry.clone());
        }

        by_kind
            .into_iter()
            .map(|(kind, kind_entries)| {
                self.aggregate(&kind_entries, window, display_unit)
                    .map(|aggregation| (kind, aggregation))
            })
            .collect()
    }

    /// Summary statistics over an ordered series
    pub fn summarize(&self, values: &[Decimal]) -> Summary {
        if values.is_empty() {
            return Summary::default();
        }

        let average_value = mean(values);

        let change_value = match (values.first(), values.last()) {
            (Some(first), Some(last)) if values.len() >= 2 => last.saturating_sub(*first),
            _ => Decimal::ZERO,
        };

        let trend_value = if values.len() >= 2 {
            let recent = &values[values.len().saturating_sub(self.config.trend_window)..];
            let (earlier, later) = recent.split_at(recent.len() / 2);
            mean(later).saturating_sub(mean(earlier))
        } else {
            Decimal::ZERO
        };

        Summary {
            average_value: self.round(average_value),
            change_value: self.round(change_value),
            trend_value: self.round(trend_value),
        }
    }

    fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(
            self.config.summary_decimals,
            RoundingStrategy::MidpointAwayFromZero,
        )
    }
}

/// Aggregate with the default configuration and standard conversion table
pub fn aggregate(
    entries: &[MeasurementEntry],
    window: &AggregationWindow,
    display_unit: UnitSystem,
) -> Result<Aggregation, UnitError> {
    MetricAggregator::new().aggregate(entries, window, display_unit)
}

/// Summary statistics with the default configuration
pub fn summarize(values: &[Decimal]) -> Summary {
    MetricAggregator::new().summarize(values)
}

/// Entries inside the window, one per (date, kind), ascending by date
///
/// For a duplicated day the latest-created entry is kept; when creation times
/// tie, the one later in the input wins.
fn latest_per_day<'a>(
    entries: &'a [MeasurementEntry],
    window: &AggregationWindow,
) -> Vec<&'a MeasurementEntry> {
    let mut latest: BTreeMap<(NaiveDate, MeasurementKind), &MeasurementEntry> = BTreeMap::new();
    let mut outside_window = 0usize;
    let mut superseded = 0usize;

    for entry in entries {
        if !window.contains(entry.date()) {
            outside_window += 1;
            continue;
        }

        latest
            .entry((entry.date(), entry.kind()))
            .and_modify(|kept| {
                superseded += 1;
                if entry.created_at() >= kept.created_at() {
                    *kept = entry;
                }
            })
            .or_insert(entry);
    }

    if outside_window > 0 || superseded > 0 {
        tracing::debug!(outside_window, superseded, "Dropped measurement entries");
    }

    latest.into_values().collect()
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let count = Decimal::from(values.len());

    match values
        .iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value))
    {
        Some(sum) => sum / count,
        // The sum left the Decimal range; divide before adding instead
        None => values
            .iter()
            .fold(Decimal::ZERO, |acc, value| acc.saturating_add(*value / count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weight(day: NaiveDate, value: Decimal, unit: UnitSystem, created_secs: i64) -> MeasurementEntry {
        MeasurementEntry::with_metadata(
            format!("w-{}-{}", day, created_secs),
            day,
            value,
            unit,
            MeasurementKind::Weight,
            Utc.timestamp_opt(1_700_000_000 + created_secs, 0).unwrap(),
        )
    }

    fn january() -> AggregationWindow {
        AggregationWindow::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap()
    }

    #[test]
    fn test_window_rejects_reversed_dates() {
        let result = AggregationWindow::new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(AggregationError::InvalidWindow { .. })));
    }

    #[test]
    fn test_window_is_inclusive() {
        let window = january();
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 1, 31)));
        assert!(!window.contains(date(2024, 2, 1)));
        assert_eq!(window.days(), 31);
    }

    #[test]
    fn test_range_selector_window() {
        let today = date(2024, 3, 10);
        let window = RangeSelector::Last7Days.window_ending(today);
        assert_eq!(window.start(), date(2024, 3, 4));
        assert_eq!(window.end(), today);
        assert_eq!(window.days(), 7);

        let year = RangeSelector::Last365Days.window_ending(today);
        assert_eq!(year.days(), 365);
    }

    #[test]
    fn test_range_selector_parsing() {
        assert_eq!("30d".parse::<RangeSelector>().unwrap(), RangeSelector::Last30Days);
        assert_eq!("1y".parse::<RangeSelector>().unwrap(), RangeSelector::Last365Days);
        assert!("2w".parse::<RangeSelector>().is_err());
    }

    #[test]
    fn test_empty_input_yields_zero_summary() {
        let result = aggregate(&[], &january(), UnitSystem::Imperial).unwrap();
        assert!(result.normalized.is_empty());
        assert_eq!(result.summary, Summary::default());
        assert_eq!(result.summary.average_value, Decimal::ZERO);
    }

    #[test]
    fn test_window_with_no_entries_is_not_an_error() {
        let entries = vec![weight(date(2023, 12, 1), dec!(80), UnitSystem::Metric, 0)];
        let result = aggregate(&entries, &january(), UnitSystem::Metric).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.summary, Summary::default());
    }

    #[test]
    fn test_single_entry() {
        let entries = vec![weight(date(2024, 1, 5), dec!(80), UnitSystem::Metric, 0)];
        let result = aggregate(&entries, &january(), UnitSystem::Metric).unwrap();

        assert_eq!(result.normalized.len(), 1);
        assert_eq!(result.summary.average_value, dec!(80));
        assert_eq!(result.summary.change_value, Decimal::ZERO);
        assert_eq!(result.summary.trend_value, Decimal::ZERO);
    }

    #[test]
    fn test_metric_to_imperial_example() {
        let entries = vec![
            weight(date(2024, 1, 1), dec!(80), UnitSystem::Metric, 0),
            weight(date(2024, 1, 8), dec!(78), UnitSystem::Metric, 1),
        ];
        let result = aggregate(&entries, &january(), UnitSystem::Imperial).unwrap();

        assert_eq!(result.values(), vec![dec!(176.4), dec!(172.0)]);
        assert_eq!(result.summary.change_value, dec!(-4.4));
        assert_eq!(result.summary.average_value, dec!(174.2));
        assert_eq!(result.summary.trend_value, dec!(-4.4));
        assert!(result
            .normalized
            .iter()
            .all(|entry| entry.unit() == UnitSystem::Imperial));
    }

    #[test]
    fn test_mixed_units_normalize_to_display_unit() {
        let entries = vec![
            weight(date(2024, 1, 1), dec!(176.4), UnitSystem::Imperial, 0),
            weight(date(2024, 1, 2), dec!(79.5), UnitSystem::Metric, 1),
        ];
        let result = aggregate(&entries, &january(), UnitSystem::Metric).unwrap();

        // 176.4 lb -> 80.01 kg, rounded to 80.0; the metric entry is untouched
        assert_eq!(result.values(), vec![dec!(80.0), dec!(79.5)]);
    }

    #[test]
    fn test_sorts_by_date() {
        let entries = vec![
            weight(date(2024, 1, 20), dec!(79), UnitSystem::Metric, 0),
            weight(date(2024, 1, 3), dec!(81), UnitSystem::Metric, 1),
            weight(date(2024, 1, 10), dec!(80), UnitSystem::Metric, 2),
        ];
        let result = aggregate(&entries, &january(), UnitSystem::Metric).unwrap();

        assert_eq!(result.values(), vec![dec!(81), dec!(80), dec!(79)]);
        assert_eq!(result.summary.change_value, dec!(-2));
    }

    #[test]
    fn test_same_day_keeps_latest_created() {
        let day = date(2024, 1, 5);
        let entries = vec![
            weight(day, dec!(82), UnitSystem::Metric, 500),
            weight(day, dec!(80), UnitSystem::Metric, 100),
        ];
        let result = aggregate(&entries, &january(), UnitSystem::Metric).unwrap();

        assert_eq!(result.normalized.len(), 1);
        assert_eq!(result.normalized[0].value(), dec!(82));
    }

    #[test]
    fn test_same_day_creation_tie_keeps_later_input() {
        let day = date(2024, 1, 5);
        let entries = vec![
            weight(day, dec!(80), UnitSystem::Metric, 100),
            weight(day, dec!(81), UnitSystem::Metric, 100),
        ];
        let result = aggregate(&entries, &january(), UnitSystem::Metric).unwrap();

        assert_eq!(result.values(), vec![dec!(81)]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let entries = vec![
            weight(date(2024, 1, 9), dec!(80), UnitSystem::Metric, 0),
            weight(date(2024, 1, 2), dec!(81), UnitSystem::Metric, 1),
        ];
        let before = entries.clone();
        let _ = aggregate(&entries, &january(), UnitSystem::Imperial).unwrap();
        assert_eq!(entries, before);
    }

    #[test]
    fn test_trend_uses_last_fourteen_entries() {
        // 20 daily entries: 100, 101, ..., 119
        let entries: Vec<MeasurementEntry> = (0..20)
            .map(|i| {
                weight(
                    date(2024, 1, 1 + i as u32),
                    Decimal::from(100 + i),
                    UnitSystem::Metric,
                    i,
                )
            })
            .collect();
        let result = aggregate(&entries, &january(), UnitSystem::Metric).unwrap();

        // Last 14 are 106..=119: earlier half 106..=112 (mean 109), later 113..=119 (mean 116)
        assert_eq!(result.summary.trend_value, dec!(7));
        assert_eq!(result.summary.change_value, dec!(19));
        assert_eq!(result.summary.average_value, dec!(109.5));
    }

    #[test]
    fn test_trend_with_odd_count_gives_later_half_the_extra() {
        let values = vec![dec!(10), dec!(20), dec!(30)];
        let summary = summarize(&values);
        // earlier [10], later [20, 30]
        assert_eq!(summary.trend_value, dec!(15));
    }

    #[test]
    fn test_custom_trend_window() {
        let aggregator = MetricAggregator::with_config(AggregationConfig {
            trend_window: 4,
            ..AggregationConfig::default()
        });
        let values = vec![dec!(1), dec!(100), dec!(10), dec!(20), dec!(30), dec!(40)];
        // last 4: [10, 20] vs [30, 40]
        assert_eq!(aggregator.summarize(&values).trend_value, dec!(20));
    }

    #[test]
    fn test_summary_rounding() {
        let values = vec![dec!(1), dec!(1), dec!(2)];
        assert_eq!(summarize(&values).average_value, dec!(1.33));
    }

    #[test]
    fn test_aggregate_by_kind() {
        let day = date(2024, 1, 5);
        let entries = vec![
            weight(day, dec!(80), UnitSystem::Metric, 0),
            MeasurementEntry::with_metadata(
                "waist",
                day,
                dec!(81),
                UnitSystem::Metric,
                MeasurementKind::LinearMeasurement,
                Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            ),
        ];
        let by_kind = MetricAggregator::new()
            .aggregate_by_kind(&entries, &january(), UnitSystem::Imperial)
            .unwrap();

        assert_eq!(by_kind.len(), 2);
        assert_eq!(by_kind[&MeasurementKind::Weight].values(), vec![dec!(176.4)]);
        assert_eq!(
            by_kind[&MeasurementKind::LinearMeasurement].values(),
            vec![dec!(31.9)]
        );
    }

    #[test]
    fn test_missing_conversion_propagates() {
        let aggregator = MetricAggregator::new()
            .with_converter(UnitConverter::with_table(crate::units::ConversionTable::empty()));
        let entries = vec![weight(date(2024, 1, 5), dec!(80), UnitSystem::Metric, 0)];

        let result = aggregator.aggregate(&entries, &january(), UnitSystem::Imperial);
        assert!(matches!(result, Err(UnitError::InvalidUnitKind { .. })));

        // Same-unit entries never touch the table
        let result = aggregator.aggregate(&entries, &january(), UnitSystem::Metric);
        assert!(result.is_ok());
    }

    #[test]
    fn test_extreme_values_do_not_overflow_summary() {
        let huge = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
        let entries = vec![
            weight(date(2024, 1, 1), huge, UnitSystem::Metric, 0),
            weight(date(2024, 1, 2), huge, UnitSystem::Metric, 1),
        ];

        let result = aggregate(&entries, &january(), UnitSystem::Metric).unwrap();
        assert_eq!(result.summary.average_value, huge);
        assert_eq!(result.summary.change_value, Decimal::ZERO);
        assert_eq!(result.summary.trend_value, Decimal::ZERO);

        let summary = summarize(&[Decimal::MIN, Decimal::MAX]);
        assert_eq!(summary.change_value, Decimal::MAX);
    }

    #[test]
    fn test_extreme_value_conversion_is_an_error() {
        let entries = vec![weight(date(2024, 1, 1), Decimal::MAX, UnitSystem::Metric, 0)];

        let result = aggregate(&entries, &january(), UnitSystem::Imperial);
        assert!(matches!(result, Err(UnitError::OutOfRange { .. })));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture_warnings<F: FnOnce()>(f: F) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        log.contents()
    }

    #[test]
    fn test_mixed_kinds_are_flagged() {
        let day = date(2024, 1, 5);
        let entries = vec![
            weight(day, dec!(80), UnitSystem::Metric, 0),
            MeasurementEntry::with_metadata(
                "waist",
                day,
                dec!(81),
                UnitSystem::Metric,
                MeasurementKind::LinearMeasurement,
                Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            ),
        ];

        let mixed = capture_warnings(|| {
            aggregate(&entries, &january(), UnitSystem::Metric).unwrap();
        });
        assert!(mixed.contains("aggregate_by_kind"));

        let single = capture_warnings(|| {
            aggregate(&entries[..1], &january(), UnitSystem::Metric).unwrap();
        });
        assert!(single.is_empty());

        let split = capture_warnings(|| {
            MetricAggregator::new()
                .aggregate_by_kind(&entries, &january(), UnitSystem::Metric)
                .unwrap();
        });
        assert!(split.is_empty());
    }

    proptest! {
        #[test]
        fn test_aggregate_is_idempotent(
            raw in proptest::collection::vec((0u32..31, 400i64..1500i64, any::<bool>(), 0i64..50), 0..40)
        ) {
            let entries: Vec<MeasurementEntry> = raw
                .iter()
                .map(|(offset, tenths, imperial, created)| {
                    let unit = if *imperial { UnitSystem::Imperial } else { UnitSystem::Metric };
                    weight(date(2024, 1, 1 + offset), Decimal::new(*tenths, 1), unit, *created)
                })
                .collect();

            let first = aggregate(&entries, &january(), UnitSystem::Imperial).unwrap();
            let second = aggregate(&entries, &january(), UnitSystem::Imperial).unwrap();
            prop_assert_eq!(&first, &second);

            let mut previous: Option<NaiveDate> = None;
            for entry in &first.normalized {
                if let Some(prev) = previous {
                    prop_assert!(entry.date() > prev);
                }
                previous = Some(entry.date());
            }
        }
    }
}
