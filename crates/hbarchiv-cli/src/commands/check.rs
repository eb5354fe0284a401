//! Check command implementation
//!
//! Walks the archive structure, optionally repairing it first, and prints
//! the sorted violation list.

use anyhow::Result;
use colored::Colorize;
use hbarchiv_core::{check_structure, ensure_root, CheckConfig, Violation};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

/// JSON output for the check command.
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    /// True if the tree conforms fully.
    pub success: bool,
    /// Archive root that was checked.
    pub root: String,
    /// Whether repairs were enabled.
    pub fix: bool,
    /// Number of violations found.
    pub violation_count: usize,
    /// Violations, sorted by their formatted message.
    pub violations: Vec<Violation>,
    /// Fatal error, set only when the root itself was unusable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run the check command
///
/// # Arguments
/// * `root` - Archive root directory
/// * `fix` - Whether to apply repairs before the corresponding checks
/// * `json` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if the tree conforms, 1 if violations were found, 2 if the
/// root is not a directory
pub fn run(root: &str, fix: bool, json: bool) -> Result<ExitCode> {
    let root_path = Path::new(root);
    if let Err(err) = ensure_root(root_path) {
        if json {
            let output = CheckOutput {
                success: false,
                root: root.to_string(),
                fix,
                violation_count: 0,
                violations: Vec::new(),
                error: Some(err.to_string()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        eprintln!("{}", err.to_string().red());
        return Ok(ExitCode::from(2));
    }

    let config = CheckConfig::new(root_path).fix(fix);
    let report = check_structure(&config);

    let mut violations = report.violations.clone();
    violations.sort_by_key(|v| v.to_string());

    if json {
        let output = CheckOutput {
            success: report.ok(),
            root: root.to_string(),
            fix,
            violation_count: violations.len(),
            violations,
            error: None,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Prüfe:".cyan().bold(), root);
        if fix {
            println!("{}", "Automatische Reparatur ist aktiv.".dimmed());
        }
        if report.ok() {
            println!("{}", "Keine Regelverletzungen gefunden.".green());
        } else {
            println!(
                "{} ({})",
                "Verletzungen der Strukturregeln gefunden:".red().bold(),
                report.len()
            );
            for message in report.sorted_messages() {
                println!(" {} {}", "-".red(), message);
            }
        }
    }

    Ok(if report.ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
