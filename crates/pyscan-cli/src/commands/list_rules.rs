//! List rules command implementation.

use pyscan::rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - at most 5 parameters, nesting depth 3 (default)");
    println!("  strict       - at most 3 parameters, nesting depth 2");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  pyscan check --rules deep-nesting app.py");
    println!("  pyscan check --rules PY001 app.py");
}
