//! Nutrition log aggregation
//!
//! Daily calorie and macro totals, the whole-calorie figure shown on the
//! nutrition overview, reconciliation of that figure against the total the
//! backend reports, and calorie progression over a date window.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregation::{summarize, AggregationWindow, Summary};
use crate::models::NutritionLogEntry;

/// Largest difference (kcal) still treated as agreement with the backend
pub const RECONCILIATION_TOLERANCE: Decimal = dec!(0.01);

/// Totals for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyNutrition {
    pub date: NaiveDate,
    pub total_calories: Decimal,

    /// Number of logged items, including zero-calorie supplements
    pub item_count: u32,

    pub protein_g: Decimal,
    pub carbs_g: Decimal,
    pub fat_g: Decimal,
}

impl DailyNutrition {
    fn empty(date: NaiveDate) -> Self {
        DailyNutrition {
            date,
            total_calories: Decimal::ZERO,
            item_count: 0,
            protein_g: Decimal::ZERO,
            carbs_g: Decimal::ZERO,
            fat_g: Decimal::ZERO,
        }
    }

    fn add(&mut self, entry: &NutritionLogEntry) {
        self.total_calories = self.total_calories.saturating_add(entry.calories);
        self.item_count = self.item_count.saturating_add(1);
        self.protein_g = self.protein_g.saturating_add(entry.protein_g.unwrap_or(Decimal::ZERO));
        self.carbs_g = self.carbs_g.saturating_add(entry.carbs_g.unwrap_or(Decimal::ZERO));
        self.fat_g = self.fat_g.saturating_add(entry.fat_g.unwrap_or(Decimal::ZERO));
    }

    /// Whole-calorie total as displayed
    pub fn rounded_calories(&self) -> Decimal {
        round_calories(self.total_calories)
    }
}

/// Sum of a set of log items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieTotal {
    pub exact: Decimal,
    pub rounded: Decimal,
    pub item_count: u32,
}

/// Client-side total compared against the backend's figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieReconciliation {
    pub computed: Decimal,
    pub reported: Decimal,
    pub difference: Decimal,
    pub matches: bool,
}

/// Daily totals over a window, summarized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionProgression {
    pub window: AggregationWindow,

    /// Logged days inside the window, ascending
    pub days: Vec<DailyNutrition>,

    /// Statistics over daily calorie totals
    pub summary: Summary,
}

/// Sum every logged item per day
///
/// Repeated identical items are separate servings and all count.
pub fn daily_totals(entries: &[NutritionLogEntry]) -> BTreeMap<NaiveDate, DailyNutrition> {
    let mut days: BTreeMap<NaiveDate, DailyNutrition> = BTreeMap::new();

    for entry in entries {
        days.entry(entry.date)
            .or_insert_with(|| DailyNutrition::empty(entry.date))
            .add(entry);
    }

    days
}

/// Total calories across all given items
pub fn total_calories(entries: &[NutritionLogEntry]) -> CalorieTotal {
    let exact = entries
        .iter()
        .fold(Decimal::ZERO, |sum, entry| sum.saturating_add(entry.calories));

    CalorieTotal {
        exact,
        rounded: round_calories(exact),
        item_count: u32::try_from(entries.len()).unwrap_or(u32::MAX),
    }
}

/// Compare the summed log against the total reported by the backend
pub fn reconcile(entries: &[NutritionLogEntry], reported: Decimal) -> CalorieReconciliation {
    let computed = total_calories(entries).exact;
    let difference = computed.saturating_sub(reported).abs();
    let matches = difference < RECONCILIATION_TOLERANCE;

    if !matches {
        tracing::warn!(
            %computed,
            %reported,
            %difference,
            "Summed calories disagree with reported total"
        );
    }

    CalorieReconciliation {
        computed,
        reported,
        difference,
        matches,
    }
}

/// Daily calorie totals inside the window with summary statistics
///
/// Days without any logged item are absent rather than counted as zero.
pub fn nutrition_progression(
    entries: &[NutritionLogEntry],
    window: &AggregationWindow,
) -> NutritionProgression {
    let days: Vec<DailyNutrition> = daily_totals(entries)
        .into_values()
        .filter(|day| window.contains(day.date))
        .collect();

    let calories: Vec<Decimal> = days.iter().map(|day| day.total_calories).collect();

    NutritionProgression {
        window: *window,
        days,
        summary: summarize(&calories),
    }
}

/// Round to whole calories, ties to even
pub fn round_calories(calories: Decimal) -> Decimal {
    calories.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}
