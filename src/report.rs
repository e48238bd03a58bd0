use colored::*;

use crate::models::summary::RunSummary;

/// Prints the two-line result on stdout.
pub fn print_summary(summary: &RunSummary) {
    for line in summary.lines() {
        println!("{}", line);
    }
}

pub fn print_breakdown(summary: &RunSummary) {
    println!();
    println!("{}", "======== STATUS BREAKDOWN ========".bold().white().on_blue());
    println!(
        "{} {}",
        "Started            :".blue().bold(),
        summary.started_at.format("%Y/%m/%d %H:%M:%S").to_string().bold()
    );
    println!(
        "{} {}",
        "Failed requests    :".red().bold(),
        summary.failed.to_string().bold()
    );
    println!(
        "{} {}/{}",
        "Peak in flight     :".cyan().bold(),
        summary.peak_in_flight.to_string().bold(),
        summary.concurrency
    );

    for (label, count) in &summary.status_counts {
        let label = if label == "200" {
            label.green().bold()
        } else if label.parse::<u16>().is_ok() {
            label.yellow().bold()
        } else {
            label.red().bold()
        };
        println!("• {}: {}", label, count);
    }
}
