use colored::Colorize;

/// Print a success message to stderr with a green checkmark prefix.
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print an informational message to stderr with a blue info prefix.
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue(), msg);
}

/// Print a dimmed frame rule of `width` columns to stdout.
pub fn rule_stdout(width: usize) {
    println!("{}", "─".repeat(width).dimmed());
}

/// Print a dimmed label to stdout.
pub fn label_stdout(msg: &str) {
    println!("{}", msg.dimmed());
}
