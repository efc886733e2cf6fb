//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "barrc-lint.toml";

const DEFAULT_CONFIG: &str = r#"# barrc-lint configuration

# Rule preset: "recommended" (default), "strict" or "minimal"
preset = "recommended"

# Restrict the run to these rules (codes or names). Omit to run the preset.
# enabled_rule_codes = ["NAMING_FUNCTION", "TYPE_PRIMITIVE"]

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/vendor/**",
    "**/third_party/**",
]

# File extensions to analyze
extensions = ["c", "h"]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations, keyed by code or name.
# Each rule can be enabled/disabled and have its severity overridden.

[rules.NAMING_FUNCTION]
enabled = true
# severity = "warning"
exempt = ["main"]
allow_digits = true

[rules.POINTER_CONST]
# Skip pointer parameters the function body writes through
analyze_writes = false

# [rules.MAGIC_NUMBER]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: barrc-lint check");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}
