use anyhow::Result;
use colored::Colorize;
use signup_validation_core::{Config, FieldRule, RuleSet};

pub fn execute(config: &Config) -> Result<()> {
    let rules = config.rule_set()?;

    println!("{}", "Registration form rules".green().bold());
    println!();
    print!("{}", render_rules(&rules));

    Ok(())
}

pub fn render_rules(rules: &RuleSet) -> String {
    let mut out = String::new();

    for rule in rules.iter() {
        out.push_str(&format!("{}{}\n", rule.name().to_string().cyan().bold(), flags(rule)));
        for check in rule.checks() {
            out.push_str(&format!("    {}\n", check));
        }
        for kind in rule.failure_kinds() {
            if let Some(message) = rule.message_for(kind) {
                out.push_str(&format!("    {:<9} {}\n", format!("{}:", kind), message.dimmed()));
            }
        }
    }

    out
}

fn flags(rule: &FieldRule) -> String {
    let mut flags = Vec::new();
    if rule.is_required() {
        flags.push("required");
    } else {
        flags.push("optional");
    }
    if !rule.trims() {
        flags.push("untrimmed");
    }
    format!(" ({})", flags.join(", "))
}
