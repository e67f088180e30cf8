//! List rules command implementation.

use codesniff_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<30} Description", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!("{:<30} {}", rule.name(), rule.description());
    }

    println!("\nPresets:");
    println!("  standard  - All rules with default settings (default)");
    println!("  strict    - Case-sensitive comments, braces on functions, die is an error");
    println!("  lenient   - Brace placement only, comments from 20 lines, no bracket spacing");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  codesniff check --rules die-function,extract-function dump.json");
}
