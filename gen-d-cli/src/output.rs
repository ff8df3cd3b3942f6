//! Formatted terminal output for the CLI commands.

use colored::Colorize;
use gen_d_core::types::{DriftExplanation, DriftReport, ScanRecord, ScanResult};

pub fn print_scan_summary(result: &ScanResult, scan_id: &str, db_path: &str) {
    println!("\n{}", "Scan complete".green().bold());
    println!("  Files scanned:    {}", result.files_scanned);
    println!("  Callables found:  {}", result.callables.len());
    println!("  Call edges:       {}", result.call_sites.len());
    println!("  Parse errors:     {}", result.error_count());
    println!("  Scan time:        {:.2}s", result.elapsed_seconds);
    println!("  Scan id:          {scan_id}");
    println!("  Database:         {db_path}");

    if !result.errors.is_empty() {
        println!(
            "\n{} {} file(s) had parse errors:",
            "warning:".yellow().bold(),
            result.error_count()
        );
        for e in result.errors.iter().take(5) {
            println!("   - {}: {}", e.file_path, e.message);
        }
        if result.errors.len() > 5 {
            println!("   ... and {} more", result.errors.len() - 5);
        }
    }
}

pub fn print_status_table(report: &DriftReport) {
    let total = report.total();
    if total == 0 {
        println!("{}", "No callables to analyze.".yellow());
        return;
    }
    println!("\n{}", "Documentation status".bold());
    println!(
        "  {} Fresh:        {:>5}  ({:>5.1}%)",
        "✓".green(),
        report.fresh_count,
        pct(report.fresh_count, total)
    );
    println!(
        "  {} Stale:        {:>5}  ({:>5.1}%)",
        "⚠".yellow(),
        report.stale_count,
        pct(report.stale_count, total)
    );
    println!(
        "  {} Undocumented: {:>5}  ({:>5.1}%)",
        "○".dimmed(),
        report.undocumented_count,
        pct(report.undocumented_count, total)
    );
    println!("  {}               {:>5}  (100.0%)", "Total".bold(), total);
}

fn pct(count: u32, total: u32) -> f64 {
    (count as f64 / total as f64) * 100.0
}

pub fn print_stale_list(stale_ids: &[String], limit: Option<usize>) {
    println!("\n{} Stale documentation ({} total):", "⚠".yellow(), stale_ids.len());
    let display: &[String] = match limit {
        Some(n) => &stale_ids[..stale_ids.len().min(n)],
        None => stale_ids,
    };
    for id in display {
        println!("   - {}", id.cyan());
    }
    if let Some(n) = limit {
        if stale_ids.len() > n {
            println!("   ... and {} more", stale_ids.len() - n);
        }
    }
    println!("\nRun `gdg explain <id>` for details.");
}

pub fn print_explanation(explanation: &DriftExplanation) {
    use gen_d_core::types::DriftStatus;

    let (label, colored_label) = match explanation.status {
        DriftStatus::Fresh => ("FRESH", "✓ FRESH".green().to_string()),
        DriftStatus::Stale => ("STALE", "⚠ STALE".yellow().to_string()),
        DriftStatus::Undocumented => ("UNDOCUMENTED", "○ UNDOCUMENTED".dimmed().to_string()),
    };
    let _ = label;

    println!("\n{} {}", "Callable:".bold(), explanation.callable_id);
    println!("{} {}", "Status:".bold(), colored_label);
    println!("\n{}", "Reason:".bold());
    println!("   {}", explanation.reason);

    println!("\n{}", "Hashes:".bold());
    println!("   Current semantic: {}", prefix16(&explanation.current_semantic_fingerprint).cyan());
    if let Some(s) = &explanation.stored_semantic_fingerprint {
        println!("   Stored semantic:  {}", prefix16(s).dimmed());
    }
    if let Some(d) = &explanation.current_doc_fingerprint {
        println!("   Current doc:      {}", prefix16(d).cyan());
    }
    if let Some(d) = &explanation.stored_doc_fingerprint {
        println!("   Stored doc:       {}", prefix16(d).dimmed());
    }

    println!("\n{}", "Suggestions:".bold());
    for s in &explanation.suggestions {
        println!("   - {s}");
    }
}

fn prefix16(s: &str) -> String {
    format!("{}...", &s[..s.len().min(16)])
}

pub fn print_history_table(scans: &[ScanRecord]) {
    println!("\n{}", "Scan history".bold());
    println!("  {:<20} {:>8} {:>10} {:>8}", "Timestamp", "Files", "Functions", "Errors");
    for s in scans {
        println!(
            "  {:<20} {:>8} {:>10} {:>8}",
            s.timestamp.format("%Y-%m-%d %H:%M:%S"),
            s.files_count,
            s.callables_count,
            if s.parse_error_count > 0 { s.parse_error_count.to_string() } else { "-".to_string() }
        );
    }
}
