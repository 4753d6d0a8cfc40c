//! Init command implementation.

use anyhow::{bail, Result};
use flint_core::Severity;
use flint_rules::Preset;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# flint configuration

# Skip C++-only checks (for pure C code bases)
c_mode = false

# Weakest severity to run and report: "error", "warning" or "advice"
min_severity = "{min_severity}"

[analyzer]
# Descend into subdirectories
recursive = true

# Respect .gitignore files
respect_gitignore = true

# Glob patterns to exclude from analysis
exclude = [
    "**/third-party/**",
    "**/build/**",
]

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.upcase-null]
enabled = true
# severity = "warning"  # Override default severity

[rules.deprecated-includes]
headers = ["common/base/Base.h", "common/base/StringUtil.h"]

# [rules.defined-names]
# allow = ["_MY_FEATURE_MACRO"]

# [rules.banned-identifiers.identifiers]
# auto_ptr = "Use std::unique_ptr instead."
"#;

/// Name of the generated configuration file.
const CONFIG_FILE: &str = "flint.toml";

/// Renders the default configuration for `preset`.
fn render(preset: Preset) -> String {
    let level = match preset.level() {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Advice => "advice",
    };
    CONFIG_TEMPLATE.replace("{min_severity}", level)
}

/// Runs the init command.
pub fn run(force: bool, preset: Preset) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force, preset)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: flint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool, preset: Preset) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }
    std::fs::write(config_path, render(preset))?;
    Ok(())
}
