//! Clean command implementation.
//!
//! Prints the commands for safe categories; nothing is deleted here.

use anyhow::Result;

use crate::cli::CleanArgs;
use crate::config::Config;
use crate::recommend::RecommendationEngine;
use crate::report::format_clean_plan;

/// Run the clean command.
pub fn run(args: CleanArgs, config: &Config, quiet: bool) -> Result<()> {
    let result = super::run_scan(&args.scan, config, quiet)?;
    let safe = RecommendationEngine::safe_only(&result.recommendations);

    print!("{}", format_clean_plan(&result, &safe));

    let review = result.recommendations.len() - safe.len();
    if review > 0 && !quiet {
        eprintln!(
            "{} more categor{} review; run `rusty-reclaim scan` to see them.",
            review,
            if review == 1 { "y needs" } else { "ies need" }
        );
    }

    Ok(())
}
