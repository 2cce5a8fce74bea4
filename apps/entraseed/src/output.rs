//! Terminal output helpers shared by the commands.
//!
//! Colored markers on stdout, warnings on stderr; `NO_COLOR` switches
//! every helper to plain labels.

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const HEADER_WIDTH: usize = 60;

fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

fn marker(code: &str, colored: &str, plain: &str) -> String {
    if use_color() {
        format!("{code}{colored}{RESET}")
    } else {
        plain.to_string()
    }
}

/// Confirmation line for a completed action.
pub fn print_success(message: &str) {
    println!("{} {message}", marker(GREEN, "✓", "OK:"));
}

/// Warning line, written to stderr so it survives stdout redirection.
pub fn print_warning(message: &str) {
    eprintln!("{} {message}", marker(YELLOW, "Warning:", "Warning:"));
}

/// Informational hint line.
pub fn print_info(message: &str) {
    println!("{} {message}", marker(BLUE, "ℹ", "Info:"));
}

/// Bordered section header for summaries.
pub fn print_header(title: &str) {
    let border = "═".repeat(HEADER_WIDTH);
    println!();
    println!("{border}");
    println!("{title:^width$}", width = HEADER_WIDTH);
    println!("{border}");
    println!();
}

/// Indented `key: value` line with the key emphasized.
pub fn print_key_value(key: &str, value: &str) {
    let label = format!("{key}:");
    println!("  {} {value}", marker(BOLD, &label, &label));
}

/// Numbered follow-up actions, printed after a summary.
pub fn print_next_steps(steps: &[String]) {
    println!("\nNext steps:");
    for (n, step) in (1..).zip(steps) {
        println!("  {n}. {step}");
    }
}
