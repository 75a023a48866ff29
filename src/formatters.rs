//! Report rendering
//!
//! Entries are ordered by descending count, ties by keyword so output is
//! reproducible across runs.

use crate::colors::ColorScheme;
use crate::config::OutputFormat;
use crate::counter::KeywordCounts;

/// Sort counts for display: highest count first, then keyword ascending
pub fn sorted_counts(counts: &KeywordCounts) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

/// Renders sorted entries into a complete report
pub trait ReportFormatter: Send + Sync {
    fn format(&self, entries: &[(&str, u64)]) -> String;
}

/// `KEYWORD: count` per line
pub struct DefaultFormatter {
    colors: ColorScheme,
}

impl DefaultFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self {
            colors: ColorScheme::new(use_colors),
        }
    }
}

impl ReportFormatter for DefaultFormatter {
    fn format(&self, entries: &[(&str, u64)]) -> String {
        let c = &self.colors;
        let mut output = String::new();
        for (keyword, count) in entries {
            output.push_str(&format!(
                "{}{}{}: {}{}{}\n",
                c.keyword, keyword, c.reset, c.count, count, c.reset
            ));
        }
        output
    }
}

/// One JSON object, keys in report order
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, entries: &[(&str, u64)]) -> String {
        let map: serde_json::Map<String, serde_json::Value> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        format!("{}\n", serde_json::Value::Object(map))
    }
}

/// `keyword,count` header followed by one row per keyword
pub struct CsvFormatter;

impl ReportFormatter for CsvFormatter {
    fn format(&self, entries: &[(&str, u64)]) -> String {
        let mut output = String::from("keyword,count\n");
        for (keyword, count) in entries {
            output.push_str(&format!("{},{}\n", escape_csv_value(keyword), count));
        }
        output
    }
}

/// Check if a CSV value needs quoting
fn needs_csv_quoting(value: &str) -> bool {
    value.is_empty()
        || value.contains(',')
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r')
        || value.starts_with(' ')
        || value.ends_with(' ')
}

/// Escape CSV value with proper quoting
fn escape_csv_value(value: &str) -> String {
    if needs_csv_quoting(value) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn create_formatter(format: OutputFormat, use_colors: bool) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Default => Box::new(DefaultFormatter::new(use_colors)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Sort and render `counts` in one step
pub fn format_report(counts: &KeywordCounts, format: OutputFormat, use_colors: bool) -> String {
    create_formatter(format, use_colors).format(&sorted_counts(counts))
}
