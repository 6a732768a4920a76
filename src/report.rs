//! Text and JSON rendering of a [`ScanResult`].

use humansize::{format_size, BINARY};

use crate::recommend::Recommendation;
use crate::scanner::ScanResult;

/// Human readable size for a KiB count.
pub fn format_kb(kb: u64) -> String {
    format_size(kb.saturating_mul(1024), BINARY)
}

/// Pretty JSON of the whole result.
pub fn format_json(result: &ScanResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

fn shorten(path: &str, width: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= width {
        return path.to_string();
    }
    let tail: String = chars[chars.len() - (width - 3)..].iter().collect();
    format!("...{}", tail)
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Ranked recommendation table followed by disk and warning summaries.
pub fn format_report(result: &ScanResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("Scanned {}\n", result.root.display()));
    if let Some(disk) = &result.disk {
        out.push_str(&format!(
            "Disk: {} used of {} ({:.1}%), {} free\n",
            format_kb(disk.used_kb),
            format_kb(disk.total_kb),
            disk.percent,
            format_kb(disk.available_kb)
        ));
    }

    if result.recommendations.is_empty() {
        out.push_str("\nNothing reclaimable found.\n");
    } else {
        out.push_str(&format!(
            "\n  {:>2}  {:<28} {:>10}  {:>5}  {:<6}  {}\n",
            "#", "CATEGORY", "SIZE", "COUNT", "SAFETY", "ACTION"
        ));
        out.push_str(&format!("  {}\n", "─".repeat(76)));
        for rec in &result.recommendations {
            out.push_str(&format_row(rec));
        }
        out.push_str(&format!(
            "\nTotal reclaimable: {}{}\n",
            format_kb(result.total_reclaimable_kb()),
            if result.approximate() { " (approximate)" } else { "" }
        ));
    }

    if result.partial {
        out.push_str("Scan stopped at the deadline; results are partial.\n");
    }

    if !result.warnings.is_empty() {
        out.push_str(&format!(
            "\n{} warning{}:\n",
            result.warnings.len(),
            plural(result.warnings.len())
        ));
        for warning in &result.warnings {
            out.push_str(&format!("  {}\n", warning));
        }
    }

    out
}

fn format_row(rec: &Recommendation) -> String {
    format!(
        "  {:>2}  {:<28} {:>10}  {:>5}  {:<6}  {}\n",
        rec.rank,
        shorten(rec.label, 28),
        format_kb(rec.reclaimable_kb),
        rec.instance_count,
        rec.safety,
        rec.action
    )
}

/// Shell commands for every safe recommendation, with the largest
/// instances listed as comments so the user can check what is affected.
pub fn format_clean_plan(result: &ScanResult, recommendations: &[&Recommendation]) -> String {
    let mut out = String::new();

    if recommendations.is_empty() {
        out.push_str("# Nothing safe to clean.\n");
        return out;
    }

    for rec in recommendations {
        out.push_str(&format!(
            "# {} - {} in {} location{}\n",
            rec.label,
            format_kb(rec.reclaimable_kb),
            rec.instance_count,
            plural(rec.instance_count)
        ));
        if let Some(total) = result.total(rec.category) {
            let mut instances: Vec<_> = total.instances.iter().collect();
            instances.sort_by(|a, b| b.size_kb.cmp(&a.size_kb));
            for hit in instances.iter().take(5) {
                out.push_str(&format!(
                    "#   {:>10}  {}\n",
                    format_kb(hit.size_kb),
                    shorten(&hit.path.display().to_string(), 60)
                ));
            }
            if instances.len() > 5 {
                out.push_str(&format!("#   ... {} more\n", instances.len() - 5));
            }
        }
        match rec.command {
            Some(command) => out.push_str(&format!("{}\n\n", command)),
            None => out.push_str(&format!("# {}\n\n", rec.action)),
        }
    }

    out
}
