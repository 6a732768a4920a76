//! Scan command implementation

use anyhow::Result;

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::report::{format_json, format_report};

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config, quiet: bool) -> Result<()> {
    let result = super::run_scan(&args.scan, config, quiet || args.json)?;

    if args.json {
        println!("{}", format_json(&result)?);
    } else {
        print!("{}", format_report(&result));
    }

    Ok(())
}
