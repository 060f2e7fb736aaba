//! Unit conversion between metric and imperial
//!
//! Conversions are table driven: every supported `(kind, from, to)` triple has a
//! fixed multiplier and a rounding precision. Converting within the same unit
//! system is an identity and never rounds, so repeated no-op calls cannot drift.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::UnitError;
use crate::models::{MeasurementEntry, MeasurementKind, UnitSystem};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Pounds per kilogram
pub const LB_PER_KG: Decimal = dec!(2.20462);
/// Kilograms per pound
pub const KG_PER_LB: Decimal = dec!(0.453592);
/// Inches per centimeter
pub const IN_PER_CM: Decimal = dec!(0.393701);
/// Centimeters per inch
pub const CM_PER_IN: Decimal = dec!(2.54);

/// Decimal places kept after a cross-system conversion
pub const DISPLAY_DECIMALS: u32 = 1;

/// Multiplier and rounding applied for one conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionFactor {
    pub multiplier: Decimal,
    pub rounding_digits: u32,
}

impl ConversionFactor {
    pub const fn new(multiplier: Decimal, rounding_digits: u32) -> Self {
        Self {
            multiplier,
            rounding_digits,
        }
    }

    /// Multiply and round half away from zero, `None` when the product
    /// leaves the `Decimal` range
    pub fn apply(&self, value: Decimal) -> Option<Decimal> {
        value.checked_mul(self.multiplier).map(|product| {
            product.round_dp_with_strategy(self.rounding_digits, RoundingStrategy::MidpointAwayFromZero)
        })
    }
}

/// Lookup of conversion factors keyed by `(kind, from, to)`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionTable {
    factors: BTreeMap<(MeasurementKind, UnitSystem, UnitSystem), ConversionFactor>,
}

impl ConversionTable {
    /// Table with no conversions at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fixed factors used throughout the application
    ///
    /// Body fat is a percentage in either system, so it converts with a
    /// multiplier of one.
    pub fn standard() -> Self {
        let mut table = Self::empty();

        table.insert_pair(
            MeasurementKind::Weight,
            ConversionFactor::new(LB_PER_KG, DISPLAY_DECIMALS),
            ConversionFactor::new(KG_PER_LB, DISPLAY_DECIMALS),
        );
        table.insert_pair(
            MeasurementKind::LinearMeasurement,
            ConversionFactor::new(IN_PER_CM, DISPLAY_DECIMALS),
            ConversionFactor::new(CM_PER_IN, DISPLAY_DECIMALS),
        );
        table.insert_pair(
            MeasurementKind::BodyFatPercentage,
            ConversionFactor::new(Decimal::ONE, DISPLAY_DECIMALS),
            ConversionFactor::new(Decimal::ONE, DISPLAY_DECIMALS),
        );

        table
    }

    /// Register a factor for one direction
    pub fn insert(
        &mut self,
        kind: MeasurementKind,
        from: UnitSystem,
        to: UnitSystem,
        factor: ConversionFactor,
    ) {
        self.factors.insert((kind, from, to), factor);
    }

    /// Register metric→imperial and imperial→metric factors for a kind
    pub fn insert_pair(
        &mut self,
        kind: MeasurementKind,
        metric_to_imperial: ConversionFactor,
        imperial_to_metric: ConversionFactor,
    ) {
        self.insert(kind, UnitSystem::Metric, UnitSystem::Imperial, metric_to_imperial);
        self.insert(kind, UnitSystem::Imperial, UnitSystem::Metric, imperial_to_metric);
    }

    pub fn factor(
        &self,
        kind: MeasurementKind,
        from: UnitSystem,
        to: UnitSystem,
    ) -> Option<&ConversionFactor> {
        self.factors.get(&(kind, from, to))
    }

    /// Kinds with at least one registered direction
    pub fn supported_kinds(&self) -> Vec<MeasurementKind> {
        let mut kinds: Vec<MeasurementKind> = self.factors.keys().map(|(kind, _, _)| *kind).collect();
        kinds.dedup();
        kinds
    }
}

/// Stateless converter over a conversion table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitConverter {
    table: ConversionTable,
}

impl UnitConverter {
    /// Converter using the standard factors
    pub fn new() -> Self {
        Self {
            table: ConversionTable::standard(),
        }
    }

    /// Converter using a custom table
    pub fn with_table(table: ConversionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ConversionTable {
        &self.table
    }

    /// Convert `value` of the given kind from one unit system to another
    pub fn convert(
        &self,
        value: Decimal,
        kind: MeasurementKind,
        from: UnitSystem,
        to: UnitSystem,
    ) -> Result<Decimal, UnitError> {
        if from == to {
            return Ok(value);
        }

        let factor = self
            .table
            .factor(kind, from, to)
            .ok_or(UnitError::InvalidUnitKind { kind, from, to })?;

        factor
            .apply(value)
            .ok_or(UnitError::OutOfRange { kind, value, to })
    }

    /// Restate an entry in the target unit system, leaving the original intact
    pub fn normalize(
        &self,
        entry: &MeasurementEntry,
        to: UnitSystem,
    ) -> Result<MeasurementEntry, UnitError> {
        if entry.unit() == to {
            return Ok(entry.clone());
        }

        let value = self.convert(entry.value(), entry.kind(), entry.unit(), to)?;
        Ok(entry.restated(value, to))
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert with the standard conversion table
pub fn convert(
    value: Decimal,
    kind: MeasurementKind,
    from: UnitSystem,
    to: UnitSystem,
) -> Result<Decimal, UnitError> {
    UnitConverter::new().convert(value, kind, from, to)
}

pub fn kg_to_lb(kg: Decimal) -> Option<Decimal> {
    ConversionFactor::new(LB_PER_KG, DISPLAY_DECIMALS).apply(kg)
}

pub fn lb_to_kg(lb: Decimal) -> Option<Decimal> {
    ConversionFactor::new(KG_PER_LB, DISPLAY_DECIMALS).apply(lb)
}

pub fn cm_to_in(cm: Decimal) -> Option<Decimal> {
    ConversionFactor::new(IN_PER_CM, DISPLAY_DECIMALS).apply(cm)
}

pub fn in_to_cm(inches: Decimal) -> Option<Decimal> {
    ConversionFactor::new(CM_PER_IN, DISPLAY_DECIMALS).apply(inches)
}

/// Render a value with its unit symbol, e.g. `176.4 lb` or `18.5%`
pub fn format_value(value: Decimal, kind: MeasurementKind, unit: UnitSystem) -> String {
    let shown = value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    match kind {
        MeasurementKind::BodyFatPercentage => format!("{}%", shown),
        _ => format!("{} {}", shown, kind.unit_symbol(unit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_weight_conversion() {
        let lb = convert(dec!(80), MeasurementKind::Weight, UnitSystem::Metric, UnitSystem::Imperial)
            .unwrap();
        assert_eq!(lb, dec!(176.4));

        let lb = convert(dec!(78), MeasurementKind::Weight, UnitSystem::Metric, UnitSystem::Imperial)
            .unwrap();
        assert_eq!(lb, dec!(172.0));

        let kg = convert(dec!(200), MeasurementKind::Weight, UnitSystem::Imperial, UnitSystem::Metric)
            .unwrap();
        assert_eq!(kg, dec!(90.7));
    }

    #[test]
    fn test_linear_conversion() {
        let inches = convert(
            dec!(81),
            MeasurementKind::LinearMeasurement,
            UnitSystem::Metric,
            UnitSystem::Imperial,
        )
        .unwrap();
        assert_eq!(inches, dec!(31.9));

        let cm = convert(
            dec!(32),
            MeasurementKind::LinearMeasurement,
            UnitSystem::Imperial,
            UnitSystem::Metric,
        )
        .unwrap();
        assert_eq!(cm, dec!(81.3));
    }

    #[test]
    fn test_body_fat_is_unit_invariant() {
        let value = convert(
            dec!(18.5),
            MeasurementKind::BodyFatPercentage,
            UnitSystem::Metric,
            UnitSystem::Imperial,
        )
        .unwrap();
        assert_eq!(value, dec!(18.5));
    }

    #[test]
    fn test_identity_does_not_round() {
        let value = dec!(80.123456);
        for unit in [UnitSystem::Metric, UnitSystem::Imperial] {
            for kind in MeasurementKind::ALL {
                assert_eq!(convert(value, kind, unit, unit).unwrap(), value);
            }
        }
    }

    #[test]
    fn test_missing_factor_is_rejected() {
        let mut table = ConversionTable::empty();
        table.insert_pair(
            MeasurementKind::Weight,
            ConversionFactor::new(LB_PER_KG, 1),
            ConversionFactor::new(KG_PER_LB, 1),
        );
        let converter = UnitConverter::with_table(table);

        let err = converter
            .convert(
                dec!(81),
                MeasurementKind::LinearMeasurement,
                UnitSystem::Metric,
                UnitSystem::Imperial,
            )
            .unwrap_err();

        assert_eq!(
            err,
            UnitError::InvalidUnitKind {
                kind: MeasurementKind::LinearMeasurement,
                from: UnitSystem::Metric,
                to: UnitSystem::Imperial,
            }
        );
    }

    #[test]
    fn test_one_way_table_rejects_reverse_direction() {
        let mut table = ConversionTable::empty();
        table.insert(
            MeasurementKind::Weight,
            UnitSystem::Metric,
            UnitSystem::Imperial,
            ConversionFactor::new(LB_PER_KG, 1),
        );
        let converter = UnitConverter::with_table(table);

        assert!(converter
            .convert(dec!(80), MeasurementKind::Weight, UnitSystem::Metric, UnitSystem::Imperial)
            .is_ok());
        assert!(converter
            .convert(dec!(176), MeasurementKind::Weight, UnitSystem::Imperial, UnitSystem::Metric)
            .is_err());
    }

    #[test]
    fn test_supported_kinds() {
        let kinds = ConversionTable::standard().supported_kinds();
        assert_eq!(kinds.len(), 3);
        assert!(ConversionTable::empty().supported_kinds().is_empty());
    }

    #[test]
    fn test_normalize_entry() {
        let entry = MeasurementEntry::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            dec!(80),
            UnitSystem::Metric,
            MeasurementKind::Weight,
        );
        let converter = UnitConverter::new();

        let normalized = converter.normalize(&entry, UnitSystem::Imperial).unwrap();
        assert_eq!(normalized.value(), dec!(176.4));
        assert_eq!(normalized.unit(), UnitSystem::Imperial);
        assert_eq!(entry.value(), dec!(80));

        let unchanged = converter.normalize(&entry, UnitSystem::Metric).unwrap();
        assert_eq!(unchanged, entry);
    }

    #[test]
    fn test_convenience_helpers() {
        assert_eq!(kg_to_lb(dec!(100)), Some(dec!(220.5)));
        assert_eq!(lb_to_kg(dec!(220.5)), Some(dec!(100.0)));
        assert_eq!(cm_to_in(dec!(100)), Some(dec!(39.4)));
        assert_eq!(in_to_cm(dec!(10)), Some(dec!(25.4)));
        assert_eq!(kg_to_lb(Decimal::MAX), None);
    }

    #[test]
    fn test_conversion_overflow_is_an_error() {
        let err = convert(
            Decimal::MAX,
            MeasurementKind::Weight,
            UnitSystem::Metric,
            UnitSystem::Imperial,
        )
        .unwrap_err();
        assert_eq!(
            err,
            UnitError::OutOfRange {
                kind: MeasurementKind::Weight,
                value: Decimal::MAX,
                to: UnitSystem::Imperial,
            }
        );

        // Shrinking factors stay in range
        let kg = convert(
            Decimal::MAX,
            MeasurementKind::Weight,
            UnitSystem::Imperial,
            UnitSystem::Metric,
        );
        assert!(kg.is_ok());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(
            format_value(dec!(176.36), MeasurementKind::Weight, UnitSystem::Imperial),
            "176.4 lb"
        );
        assert_eq!(
            format_value(dec!(18.5), MeasurementKind::BodyFatPercentage, UnitSystem::Metric),
            "18.5%"
        );
    }

    fn one_decimal_value() -> impl Strategy<Value = Decimal> {
        (0i64..5000i64).prop_map(|tenths| Decimal::new(tenths, 1))
    }

    fn any_kind() -> impl Strategy<Value = MeasurementKind> {
        prop_oneof![
            Just(MeasurementKind::Weight),
            Just(MeasurementKind::LinearMeasurement),
            Just(MeasurementKind::BodyFatPercentage),
        ]
    }

    fn any_unit() -> impl Strategy<Value = UnitSystem> {
        prop_oneof![Just(UnitSystem::Metric), Just(UnitSystem::Imperial)]
    }

    proptest! {
        #[test]
        fn test_round_trip_within_one_rounding_step(
            value in one_decimal_value(),
            kind in any_kind(),
            from in any_unit()
        ) {
            let to = from.opposite();
            let there = convert(value, kind, from, to).unwrap();
            let back = convert(there, kind, to, from).unwrap();

            prop_assert!((back - value).abs() <= dec!(0.1));
        }

        #[test]
        fn test_identity_is_exact(
            mantissa in -1_000_000i64..1_000_000i64,
            scale in 0u32..6u32,
            kind in any_kind(),
            unit in any_unit()
        ) {
            let value = Decimal::new(mantissa, scale);
            prop_assert_eq!(convert(value, kind, unit, unit).unwrap(), value);
        }
    }
}
