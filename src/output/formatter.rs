//! Output formatters for discovered items
//!
//! Provides plain, JSON, YAML and CSV listings.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::models::{DiscoveryResult, Item};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
    JsonPretty,
    Yaml,
    Csv,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Some(OutputFormat::Plain),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

/// Serializable envelope around one discovery result
#[derive(Debug, Serialize)]
pub struct DiscoveryReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub artifact_directory: PathBuf,
    pub engines: Vec<String>,
    pub total: usize,
    pub items: &'a [Item],
}

impl<'a> DiscoveryReport<'a> {
    pub fn new(artifact_directory: &Path, engines: &[String], result: &'a DiscoveryResult) -> Self {
        Self {
            generated_at: Utc::now(),
            artifact_directory: artifact_directory.to_path_buf(),
            engines: engines.to_vec(),
            total: result.len(),
            items: result.items(),
        }
    }
}

/// Formatter for discovery reports
pub struct ItemFormatter {
    format: OutputFormat,
}

impl ItemFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a report in the configured format
    pub fn format_report(&self, report: &DiscoveryReport<'_>) -> Result<String> {
        match self.format {
            OutputFormat::Plain => Ok(self.format_plain(report.items)),
            OutputFormat::Json => serde_json::to_string(report).context("Failed to serialize report"),
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(report).context("Failed to serialize report")
            }
            OutputFormat::Yaml => serde_yaml::to_string(report).context("Failed to serialize report"),
            OutputFormat::Csv => self.format_csv(report.items),
        }
    }

    fn format_plain(&self, items: &[Item]) -> String {
        let mut output = String::new();
        for item in items {
            output.push_str(item.fully_qualified_name());
            output.push('\n');
        }
        output
    }

    fn format_csv(&self, items: &[Item]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["fully_qualified_name", "fingerprint", "selectors", "explicit"])?;

        for item in items {
            let selectors: Vec<String> = item.selectors().iter().map(|s| s.to_string()).collect();
            writer.write_record([
                item.fully_qualified_name().to_string(),
                item.fingerprint().to_string(),
                selectors.join(";"),
                item.is_explicit().to_string(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }
}

impl Default for ItemFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Plain)
    }
}

/// Write a rendered report to `out`
pub fn write_report(out: &mut impl Write, formatter: &ItemFormatter, report: &DiscoveryReport<'_>) -> Result<()> {
    let content = formatter.format_report(report)?;
    out.write_all(content.as_bytes())
        .context("Failed to write report")?;
    if !content.is_empty() && !content.ends_with('\n') {
        out.write_all(b"\n").context("Failed to write report")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::map_plan;
    use crate::engine::{TestDescriptor, TestPlan, TestSource, UniqueId};

    fn sample_result() -> DiscoveryResult {
        let root = UniqueId::for_engine("junit-jupiter");
        let plan = TestPlan::from_roots(vec![TestDescriptor::new(root.clone(), "JUnit Jupiter")
            .with_child(
                TestDescriptor::new(root.append("class", "com.acme.FooTest"), "FooTest")
                    .with_source(TestSource::class("com.acme.FooTest")),
            )
            .with_child(
                TestDescriptor::new(root.append("method", "m"), "bar(String, int)").with_source(
                    TestSource::method("com.acme.Foo", "bar", "java.lang.String, int"),
                ),
            )]);
        map_plan(&plan).unwrap()
    }

    fn report(result: &DiscoveryResult) -> DiscoveryReport<'_> {
        DiscoveryReport::new(Path::new("/tmp/classes"), &["junit-jupiter".to_string()], result)
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("YAML"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_str("table"), None);
    }

    #[test]
    fn test_plain_output() {
        let result = sample_result();
        let output = ItemFormatter::new(OutputFormat::Plain)
            .format_report(&report(&result))
            .unwrap();
        assert_eq!(output, "com.acme.FooTest\ncom.acme.Foo#bar(java.lang.String, int)\n");
    }

    #[test]
    fn test_json_output() {
        let result = sample_result();
        let output = ItemFormatter::new(OutputFormat::Json)
            .format_report(&report(&result))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["items"][0]["fully_qualified_name"], "com.acme.FooTest");
        assert_eq!(value["items"][0]["selectors"][0]["kind"], "suite");
        assert_eq!(value["items"][0]["explicit"], false);
    }

    #[test]
    fn test_csv_quotes_commas() {
        let result = sample_result();
        let output = ItemFormatter::new(OutputFormat::Csv)
            .format_report(&report(&result))
            .unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "fully_qualified_name,fingerprint,selectors,explicit");
        assert!(lines[2].starts_with("\"com.acme.Foo#bar(java.lang.String, int)\""));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_report_appends_newline() {
        let result = DiscoveryResult::default();
        let mut out = Vec::new();
        write_report(&mut out, &ItemFormatter::new(OutputFormat::Json), &report(&result)).unwrap();
        assert!(out.ends_with(b"\n"));
    }

    #[test]
    fn test_write_report_empty_plain_writes_nothing() {
        let result = DiscoveryResult::default();
        let mut out = Vec::new();
        write_report(&mut out, &ItemFormatter::new(OutputFormat::Plain), &report(&result)).unwrap();
        assert!(out.is_empty());
    }
}
