// =============================================================================
// Narrator Prompt
// =============================================================================
//
// One neutral analyst prompt per request.  Each timeframe's bundle is embedded
// as pretty JSON, or a fixed placeholder when the frame had no candles.
// =============================================================================

use std::fmt::Write as _;

use crate::analysis::{FrameAnalysis, TechnicalAnalysis};

/// Placeholder rendered for a timeframe with no analysis.
pub const NO_DATA: &str = "No data available.";

/// Build the analyst prompt for `symbol` from its per-timeframe bundles.
pub fn build_prompt(symbol: &str, frames: &[FrameAnalysis]) -> String {
    let labels: Vec<String> = frames.iter().map(|f| timeframe_label(&f.timeframe)).collect();

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "As a crypto market analyst, provide a brief analysis for {symbol} based on the {} timeframes.",
        join_labels(&labels)
    );
    prompt.push_str(
        "Focus on trend, momentum, and volume. Do not provide any financial advice, \
         trading signals, or price predictions.\n",
    );

    for (frame, label) in frames.iter().zip(&labels) {
        let _ = write!(
            prompt,
            "\n{label} Analysis:\n{}\n",
            format_analysis(frame.analysis.as_ref())
        );
    }

    prompt.push_str("\nSynthesize these findings into a short, neutral summary.\n");
    prompt
}

fn format_analysis(analysis: Option<&TechnicalAnalysis>) -> String {
    match analysis {
        Some(a) => serde_json::to_string_pretty(a)
            .unwrap_or_else(|_| "Error formatting analysis.".to_string()),
        None => NO_DATA.to_string(),
    }
}

/// `15m` => `15-Minute`, `1h` => `1-Hour`.  Unknown suffixes pass through.
fn timeframe_label(interval: &str) -> String {
    let Some((split, _)) = interval.char_indices().last() else {
        return String::new();
    };
    let (count, unit) = interval.split_at(split);
    let unit = match unit {
        "m" => "Minute",
        "h" => "Hour",
        "d" => "Day",
        "w" => "Week",
        "M" => "Month",
        _ => return interval.to_string(),
    };
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return interval.to_string();
    }
    format!("{count}-{unit}")
}

fn join_labels(labels: &[String]) -> String {
    match labels {
        [] => "available".to_string(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}
