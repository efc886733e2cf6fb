//! List rules command implementation.

use barrc_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<16} {:<30} {:<8} {:<8} Description",
        "Code", "Name", "Category", "Severity"
    );
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!(
            "{:<16} {:<30} {:<8} {:<8} {}",
            rule.code(),
            rule.name(),
            rule.category().to_string(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - all rules (default)");
    println!("  strict       - all rules, POINTER_CONST as error");
    println!("  minimal      - NAMING_FUNCTION, NAMING_VARIABLE, NAMING_CONSTANT");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  barrc-lint check --rules NAMING_FUNCTION,TYPE_PRIMITIVE");
    println!("  barrc-lint check --rules barrc-types-stdint");
    println!("\nSuppress a finding with a comment on the same line or the line above:");
    println!("  // barrc-lint: allow(MAGIC_NUMBER) reason=\"datasheet timing\"");
}
