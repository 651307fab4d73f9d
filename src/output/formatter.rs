use std::io::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{
    label_for, Feature, FeatureRecord, RankedContribution, RiskBand, ScoreResult,
};

/// Bar width when output is piped or the terminal is too narrow to measure.
const DEFAULT_BAR_WIDTH: usize = 30;
const MAX_BAR_WIDTH: usize = 40;
const MIN_BAR_WIDTH: usize = 10;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format a probability as a percentage with one decimal ("6.5%")
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Signed contribution with three decimals ("+0.016", "-0.415")
pub fn format_contribution(contribution: f64) -> String {
    if contribution > 0.0 {
        format!("+{:.3}", contribution)
    } else {
        format!("{:.3}", contribution)
    }
}

fn colored_band(band: RiskBand, text: &str) -> String {
    match band {
        RiskBand::Low => text.green().bold().to_string(),
        RiskBand::Moderate => text.yellow().bold().to_string(),
        RiskBand::High => text.red().bold().to_string(),
        RiskBand::VeryHigh => text.bright_red().bold().to_string(),
    }
}

/// Headline: probability, band and log-odds
pub fn format_summary(result: &ScoreResult, use_colors: bool) -> String {
    let band = RiskBand::from_probability(result.probability);
    let probability = format_probability(result.probability);
    let band_label = band.to_string();

    if use_colors {
        format!(
            "Dementia risk: {}  {}\n  Log-odds: {:.3}",
            colored_band(band, &probability),
            colored_band(band, &band_label),
            result.log_odds
        )
    } else {
        format!(
            "Dementia risk: {}  {}\n  Log-odds: {:.3}",
            probability, band_label, result.log_odds
        )
    }
}

/// Horizontal bar proportional to `relative` (0..=1)
fn render_bar(relative: f64, width: usize) -> String {
    let filled = (relative.clamp(0.0, 1.0) * width as f64).round() as usize;
    "█".repeat(filled.max(if relative > 0.0 { 1 } else { 0 }))
}

/// Format ranked contributions as one line per feature: label, signed
/// contribution, magnitude bar. Red bars raise risk, green bars lower it.
/// `top` limits the number of lines.
pub fn format_breakdown(
    ranked: &[RankedContribution],
    use_colors: bool,
    top: Option<usize>,
) -> String {
    if ranked.is_empty() {
        return "No contributions.".to_string();
    }

    let shown = &ranked[..top.unwrap_or(ranked.len()).min(ranked.len())];
    let label_width = shown
        .iter()
        .map(|r| label_for(&r.feature).chars().count())
        .max()
        .unwrap_or(0);
    let value_width = 7;
    let separator = "  ";

    let bar_width = match get_terminal_width() {
        Some(width) => width
            .saturating_sub(label_width + value_width + separator.len() * 2)
            .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH),
        None => DEFAULT_BAR_WIDTH,
    };

    shown
        .iter()
        .map(|r| {
            let label = format!("{:<width$}", label_for(&r.feature), width = label_width);
            let value = format!(
                "{:>width$}",
                format_contribution(r.contribution),
                width = value_width
            );
            let bar = render_bar(r.relative, bar_width);

            if use_colors {
                let (value, bar) = if r.increases_risk() {
                    (value.red().to_string(), bar.red().to_string())
                } else {
                    (value.green().to_string(), bar.green().to_string())
                };
                format!("{}{}{}{}{}", label, separator, value, separator, bar)
            } else {
                format!("{}{}{}{}{}", label, separator, value, separator, bar)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked contributions as tab-separated values for scripting
/// Columns: feature key, contribution (no headers, no colors)
pub fn format_tsv(ranked: &[RankedContribution]) -> String {
    ranked
        .iter()
        .map(|r| format!("{}\t{}", r.feature, r.contribution))
        .collect::<Vec<_>>()
        .join("\n")
}

/// List the recognized inputs with their ranges and encodings
pub fn format_feature_catalogue(use_colors: bool) -> String {
    let key_width = Feature::ALL
        .iter()
        .map(|f| f.key().len())
        .max()
        .unwrap_or(0);

    Feature::ALL
        .iter()
        .map(|f| {
            let domain = f.domain();
            let key = format!("{:<width$}", f.key(), width = key_width);
            let key = if use_colors {
                key.bold().to_string()
            } else {
                key
            };
            format!(
                "{}  {} [{}]\n{:indent$}  range {}..={} step {}; {}",
                key,
                f.label(),
                f.group(),
                "",
                domain.min,
                domain.max,
                domain.step,
                f.encoding(),
                indent = key_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    record: &'a FeatureRecord,
    probability: f64,
    log_odds: f64,
    intercept: f64,
    band: RiskBand,
    contributions: &'a [RankedContribution],
}

/// Machine-readable report: input record, score and ranked breakdown
pub fn format_json(
    record: &FeatureRecord,
    result: &ScoreResult,
    ranked: &[RankedContribution],
) -> serde_json::Result<String> {
    let report = JsonReport {
        record,
        probability: result.probability,
        log_odds: result.log_odds,
        intercept: result.intercept,
        band: RiskBand::from_probability(result.probability),
        contributions: ranked,
    };
    serde_json::to_string_pretty(&report)
}
