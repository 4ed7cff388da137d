use owo_colors::OwoColorize;
use verto_core::ExtractionResult;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Verto".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Scrape, chunk and translate long text\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print a labelled value under a step
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    eprintln!("  {} {}", format!("{label}:").dimmed(), value.to_string().bright_white());
}

/// Print the per-strategy table of an extraction
pub fn print_extraction_details(result: &ExtractionResult) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Extraction Details".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for candidate in &result.candidates {
        let marker = if Some(candidate.strategy) == result.strategy { "→" } else { " " };
        let status = if candidate.error { "error".red().to_string() } else { "ok".green().to_string() };
        eprintln!(
            "  {} {:<14} {:>8} chars  {}",
            marker.bright_cyan(),
            candidate.strategy.name(),
            candidate.chars,
            status
        );
    }

    if result.degraded {
        print_warning("No strategy passed the quality bar; using the longest candidate");
    }
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
