//! Default display unit resolution

use crate::models::{MeasurementEntry, UnitSystem, UserProfile};

/// Pick the unit system values should be displayed in by default
///
/// An explicit profile preference wins. Without one, the unit of the most
/// recent entry is used (latest date, then latest creation time, then last in
/// input order). With neither, metric.
pub fn resolve_preferred_unit(
    profile_unit: Option<UnitSystem>,
    recent_entries: &[MeasurementEntry],
) -> UnitSystem {
    if let Some(unit) = profile_unit {
        return unit;
    }

    most_recent(recent_entries)
        .map(MeasurementEntry::unit)
        .unwrap_or_default()
}

/// Resolve using a fetched profile
pub fn resolve_for_profile(
    profile: Option<&UserProfile>,
    recent_entries: &[MeasurementEntry],
) -> UnitSystem {
    resolve_preferred_unit(profile.and_then(|p| p.preferred_units), recent_entries)
}

fn most_recent(entries: &[MeasurementEntry]) -> Option<&MeasurementEntry> {
    // max_by_key returns the last maximum, so input order breaks full ties
    entries
        .iter()
        .max_by_key(|entry| (entry.date(), entry.created_at()))
}
