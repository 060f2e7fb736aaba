use super::{ExportError, MetricsReport, NutritionReport};
use crate::units::format_value;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;

/// Export a measurement report to human-readable text format
pub fn export_metrics_report<P: AsRef<Path>>(
    report: &MetricsReport,
    output_path: P,
) -> Result<(), ExportError> {
    let mut file = std::fs::File::create(output_path)?;
    write_metrics_report(report, &mut file)?;
    Ok(())
}

/// Render a measurement report into any writer
pub fn write_metrics_report<W: Write>(report: &MetricsReport, out: &mut W) -> std::io::Result<()> {
    let aggregation = &report.aggregation;
    let unit = aggregation.display_unit;
    let kind = report.kind;

    writeln!(out, "{} REPORT", kind.display_name().to_uppercase())?;
    writeln!(out, "Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "Period: {}", aggregation.window)?;
    writeln!(out, "Units: {}", unit)?;
    writeln!(out)?;

    if aggregation.is_empty() {
        writeln!(out, "No entries in this period.")?;
        return Ok(());
    }

    writeln!(out, "SUMMARY")?;
    writeln!(out, "Entries: {}", aggregation.normalized.len())?;
    writeln!(out, "Average: {}", format_value(aggregation.summary.average_value, kind, unit))?;
    writeln!(out, "Change:  {}", signed(aggregation.summary.change_value, kind.unit_symbol(unit)))?;
    writeln!(out, "Trend:   {}", signed(aggregation.summary.trend_value, kind.unit_symbol(unit)))?;
    writeln!(out)?;

    writeln!(out, "ENTRIES")?;
    for entry in &aggregation.normalized {
        writeln!(
            out,
            "{}  {}",
            entry.date().format("%Y-%m-%d"),
            format_value(entry.value(), kind, unit)
        )?;
    }

    Ok(())
}

/// Export a nutrition report to human-readable text format
pub fn export_nutrition_report<P: AsRef<Path>>(
    report: &NutritionReport,
    output_path: P,
) -> Result<(), ExportError> {
    let mut file = std::fs::File::create(output_path)?;

    writeln!(file, "NUTRITION REPORT")?;
    writeln!(file, "Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(file, "Period: {}", report.progression.window)?;
    writeln!(file)?;

    writeln!(
        file,
        "Total: {} kcal over {} items ({} kcal exact)",
        report.total.rounded, report.total.item_count, report.total.exact
    )?;
    writeln!(file, "Daily average: {} kcal", report.progression.summary.average_value)?;
    writeln!(file, "Trend: {} kcal", signed(report.progression.summary.trend_value, ""))?;
    writeln!(file)?;

    for day in &report.progression.days {
        writeln!(
            file,
            "{}  {:>6} kcal  {:>3} items  P {}g  C {}g  F {}g",
            day.date.format("%Y-%m-%d"),
            day.rounded_calories(),
            day.item_count,
            day.protein_g,
            day.carbs_g,
            day.fat_g
        )?;
    }

    Ok(())
}

fn signed(value: Decimal, symbol: &str) -> String {
    let sign = if value > Decimal::ZERO { "+" } else { "" };
    if symbol.is_empty() {
        format!("{}{}", sign, value)
    } else if symbol == "%" {
        format!("{}{}%", sign, value)
    } else {
        format!("{}{} {}", sign, value, symbol)
    }
}
