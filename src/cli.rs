use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Rusty Reclaim - find reclaimable developer disk usage
#[derive(Parser, Debug)]
#[command(name = "rusty-reclaim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a directory tree and rank reclaimable space by category
    Scan(ScanArgs),

    /// Print the cleanup commands for safe categories (never runs them)
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Flags shared by every subcommand that runs a scan.
#[derive(Args, Debug, Clone, Default)]
pub struct ScanFlags {
    /// Directory to scan (defaults to the home directory)
    pub path: Option<PathBuf>,

    /// Maximum descent depth below the root
    #[arg(short = 'd', long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Don't query Docker
    #[arg(long)]
    pub no_docker: bool,

    /// Stop the scan after this many seconds and report partial results
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Parallel measurement threads
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Don't cross filesystem boundaries
    #[arg(short = 'x', long)]
    pub one_file_system: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub scan: ScanFlags,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub scan: ScanFlags,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_scan_command() {
        let cli = Cli::parse_from(["rusty-reclaim", "scan", "/home"]);
        match cli.command {
            Command::Scan(args) => {
                assert_eq!(args.scan.path, Some(PathBuf::from("/home")));
                assert!(!args.json);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = Cli::try_parse_from(["rusty-reclaim", "scan", "--timeout", "0"]);
        assert!(result.is_err());
        assert!(Cli::try_parse_from(["rusty-reclaim", "clean", "--timeout", "1"]).is_ok());
    }

    #[test]
    fn parse_scan_with_options() {
        let cli = Cli::parse_from([
            "rusty-reclaim",
            "scan",
            "--json",
            "--no-docker",
            "--timeout",
            "30",
            "-d",
            "5",
            "-j",
            "2",
            "-x",
        ]);
        match cli.command {
            Command::Scan(args) => {
                assert!(args.json);
                assert!(args.scan.no_docker);
                assert!(args.scan.one_file_system);
                assert_eq!(args.scan.timeout, Some(30));
                assert_eq!(args.scan.max_depth, Some(5));
                assert_eq!(args.scan.jobs, Some(2));
                assert!(args.scan.path.is_none());
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn parse_clean_command() {
        let cli = Cli::parse_from(["rusty-reclaim", "clean", "--no-docker", "/projects"]);
        match cli.command {
            Command::Clean(args) => {
                assert_eq!(args.scan.path, Some(PathBuf::from("/projects")));
                assert!(args.scan.no_docker);
            }
            _ => panic!("Expected Clean command"),
        }
    }

    #[test]
    fn global_verbose_flag() {
        let cli = Cli::parse_from(["rusty-reclaim", "-vvv", "scan"]);
        assert_eq!(cli.verbose, 3);
    }
}
