//! Prompt assembly for the chat pipeline.
//!
//! Pure string rendering: identical inputs always produce byte-identical
//! output, so the template is testable without a database or a model.

use std::fmt::Write;

use crate::data::DatasetStats;
use crate::db::models::Measurement;

const PREAMBLE: &str = "You are FloatChat, an oceanographic assistant specializing in ARGO float data. \
ARGO floats are autonomous profiling buoys that measure temperature (°C), \
salinity (PSU) and pressure (dbar) as they drift with ocean currents.";

const INSTRUCTION: &str = "Answer the question using the data above. Be concise and scientifically \
accurate, reference specific measurements where relevant, and state the units \
you use.";

/// Render the user question plus retrieved context into the completion
/// prompt sent to the backend.
pub fn render(question: &str, stats: &DatasetStats, recent: &[Measurement]) -> String {
    let mut out = String::new();

    out.push_str(PREAMBLE);
    out.push_str("\n\nDATASET STATISTICS\n");
    let _ = writeln!(out, "Total Measurements: {}", stats.total_measurements);
    let _ = writeln!(out, "Unique Floats: {}", stats.unique_floats);
    let _ = writeln!(out, "Average Temperature: {} °C", stats.average_temperature);

    out.push_str("\nRECENT MEASUREMENTS\n");
    if recent.is_empty() {
        out.push_str("(none recorded)\n");
    }
    for (i, m) in recent.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. Float {} | temperature {} °C | salinity {} PSU | pressure {} dbar | position {}, {} | time {}",
            i + 1,
            m.float_id,
            opt(m.temperature),
            opt(m.salinity),
            opt(m.pressure),
            opt(m.latitude),
            opt(m.longitude),
            m.timestamp
                .map_or_else(|| "N/A".to_owned(), |t| t.to_rfc3339()),
        );
    }

    out.push_str("\nUSER QUESTION\n");
    out.push_str(question);
    out.push_str("\n\n");
    out.push_str(INSTRUCTION);
    out
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |v| v.to_string())
}
