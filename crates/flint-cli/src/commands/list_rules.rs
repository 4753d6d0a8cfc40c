//! List rules command implementation.

use flint_core::Config;
use flint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<28} {:<8} {:<5} Description", "Code", "Name", "Tier", "C++");
    println!("{}", "-".repeat(100));

    for rule in all_rules(&Config::default()) {
        println!(
            "{:<8} {:<28} {:<8} {:<5} {}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            if rule.cpp_only() { "yes" } else { "" },
            rule.description()
        );
    }

    println!("\nPresets (flint init --preset):");
    println!("  minimal      - error-tier rules only");
    println!("  recommended  - error and warning tiers");
    println!("  strict       - every rule (default)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  flint check --rules catch-by-reference,constructors");
    println!("  flint check --rules FL008,FL009");
}
