//! Summary reporting for one batch run.

use crate::batch::BatchResult;
use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

pub fn print_summary_report(discovered: usize, result: &BatchResult, duration: Duration) {
    println!();
    println!("╔══════════════════════════════════════════════╗");
    println!("║           📊 Resize Summary Report           ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  📁 Files Discovered:              {:>6}    ║", discovered);
    println!("║  ✅ Processed:                     {:>6}    ║", result.succeeded);
    println!("║  ❌ Failed:                        {:>6}    ║", result.failed);
    println!("║  ⏭️  Skipped:                       {:>6}    ║", result.skipped);
    println!(
        "║  📈 Success Rate:                 {:>6.1}%   ║",
        result.success_rate()
    );
    println!(
        "║  ⏱️  Total Time:               {:>10}    ║",
        format_duration(duration)
    );
    if result.succeeded > 0 {
        let avg_ms = duration.as_millis() as f64 / result.succeeded as f64;
        println!("║  ⏱️  Avg Time/File:          {:>10.1}ms    ║", avg_ms);
    }
    println!("╚══════════════════════════════════════════════╝");

    if !result.errors.is_empty() {
        println!();
        println!("❌ Errors encountered:");
        for (path, error) in &result.errors {
            println!("   {} → {}", path.display(), error);
        }
    }
}
