//! Result formatting for the command line
//!
//! JSON is the machine-readable default; the human format prints the
//! container tree with one line per package.

use anyhow::{Context, Result};

use crate::model::{Container, ContainerKind, InspectionResult, InspectionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// Human-readable tree
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, results: &[InspectionResult]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(results),
            OutputFormat::Human => Ok(self.format_human(results)),
        }
    }

    fn format_json(&self, results: &[InspectionResult]) -> Result<String> {
        serde_json::to_string_pretty(results).context("Failed to serialize inspection results to JSON")
    }

    fn format_human(&self, results: &[InspectionResult]) -> String {
        let mut output = String::new();

        for result in results {
            match result.status {
                InspectionStatus::Success => {
                    output.push_str(&format!(
                        "\u{2713} {}\n",
                        result.result_name.as_deref().unwrap_or("(unnamed)")
                    ));
                    for container in &result.containers {
                        write_container(&mut output, container, "");
                    }
                    if result.containers.is_empty() {
                        output.push_str("  (no containers)\n");
                    }
                }
                InspectionStatus::Error => {
                    output.push_str(&format!(
                        "\u{2717} Inspection failed: {}\n",
                        result.failure.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
            output.push('\n');
        }

        output
    }
}

fn write_container(output: &mut String, container: &Container, indent: &str) {
    let version = container
        .version
        .as_deref()
        .map(|v| format!(" {}", v))
        .unwrap_or_default();
    output.push_str(&format!(
        "{}\u{251C}\u{2500} {} {}{}\n",
        indent, container.kind, container.name, version
    ));

    let nested = format!("{}\u{2502}  ", indent);
    if container.kind == ContainerKind::Project {
        match &container.packages {
            Some(packages) if packages.is_empty() => {
                output.push_str(&format!("{}(no packages)\n", nested));
            }
            Some(packages) => {
                for package in packages {
                    output.push_str(&format!("{}\u{2022} {}\n", nested, package));
                }
            }
            None => output.push_str(&format!("{}(not resolved)\n", nested)),
        }
    }
    for child in &container.children {
        write_container(output, child, &nested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PackageId;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn create_test_results() -> Vec<InspectionResult> {
        let mut project = Container::project("Web", Some("1.2.0".to_string()), PathBuf::from("/src/Web/Web.csproj"));
        project.packages = Some(BTreeSet::from([PackageId::new("Serilog", "3.1.1")]));
        project.dependencies = Some(BTreeSet::new());
        let solution = Container::solution("App", PathBuf::from("/src/App.sln"), vec![project]);

        #[derive(Debug, thiserror::Error)]
        #[error("Solution file /src/Other.sln not found")]
        struct Missing;

        vec![
            InspectionResult::success("App", PathBuf::from("/out"), vec![solution]),
            InspectionResult::error(&Missing),
        ]
    }

    #[test]
    fn test_json_format() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = formatter.format(&create_test_results()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["status"], "Success");
        assert_eq!(parsed[0]["containers"][0]["children"][0]["name"], "Web");
        assert_eq!(parsed[1]["status"], "Error");
    }

    #[test]
    fn test_human_format() {
        let formatter = OutputFormatter::new(OutputFormat::Human);
        let output = formatter.format(&create_test_results()).unwrap();

        assert!(output.contains("\u{2713} App"));
        assert!(output.contains("Project Web 1.2.0"));
        assert!(output.contains("Serilog/3.1.1"));
        assert!(output.contains("Inspection failed: Solution file /src/Other.sln not found"));
    }
}
