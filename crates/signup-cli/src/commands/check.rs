use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use signup_validation_core::age::today_local;
use signup_validation_core::{
    Config, FieldOutcome, FormController, FormValues, MemorySlots, ValidationReport,
    Validator,
};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

pub fn execute(
    config: &Config,
    values_path: &Path,
    today: Option<NaiveDate>,
    json: bool,
) -> Result<ExitCode> {
    tracing::debug!(path = ?values_path, "checking values file");
    let content = fs::read_to_string(values_path)
        .with_context(|| format!("Failed to read values file: {:?}", values_path))?;
    let values: FormValues = toml::from_str(&content)
        .with_context(|| format!("Failed to parse values file: {:?}", values_path))?;

    let validator = Validator::new(config.rule_set()?);
    let mut form = FormController::new(validator, MemorySlots::new());
    let submission = form.submit_on(&values, today.unwrap_or_else(today_local));
    let report = submission.report();

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render_report(report));
    }

    Ok(if submission.is_cancelled() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Human readable report, one line per field
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();

    for (field, outcome) in report.outcomes() {
        match outcome {
            FieldOutcome::Ok => {
                out.push_str(&format!("  {} {}\n", "✓".green(), field));
            }
            FieldOutcome::Fail(failure) => {
                out.push_str(&format!(
                    "  {} {} [{}] {}\n",
                    "✗".red(),
                    field.to_string().bold(),
                    failure.kind,
                    failure.message
                ));
            }
        }
    }

    out.push('\n');
    if report.all_submittable() {
        out.push_str(&format!("{}\n", "Form can be submitted".green().bold()));
    } else {
        out.push_str(&format!(
            "{}\n",
            format!("Submission blocked: {} field(s) invalid", report.failure_count())
                .red()
                .bold()
        ));
    }

    out
}
