//! Output formatting for CLI

use crate::q_learning::{ActionValues, SavedQTable};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a percentage from a 0..1 rate
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// One Q-table row as fixed-width columns
pub fn format_row(values: &ActionValues) -> String {
    values
        .iter()
        .map(|v| format!("{v:>10.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print provenance recorded in a saved table
pub fn print_artifact_info(saved: &SavedQTable) {
    print_kv("Algorithm", &saved.algorithm.to_string());
    print_kv("Format version", &saved.version.to_string());
    print_kv("States", &format_number(saved.table().len()));
    let meta = &saved.metadata;
    if let Some(episodes) = meta.episodes {
        print_kv("Episodes trained", &format_number(episodes));
    }
    if let Some(successes) = meta.successes {
        print_kv("Successes", &format_number(successes));
    }
    if let Some(epsilon) = meta.final_epsilon {
        print_kv("Final epsilon", &format!("{epsilon:.4}"));
    }
    if let Some(seed) = meta.seed {
        print_kv("Seed", &seed.to_string());
    }
    if let Some(saved_at) = meta.saved_at {
        print_kv("Saved at (unix)", &saved_at.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.256), "25.6%");
    }
}
