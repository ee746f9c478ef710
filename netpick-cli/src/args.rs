//! CLI argument parsing

use clap::{Parser, Subcommand};
use netpick_select::{KeywordTables, SelectorConfig};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "netpick")]
#[command(
    version,
    about = "Find the network interface carrying live traffic",
    long_about = None
)]
pub struct Cli {
    /// Probe observation window in milliseconds
    #[arg(short = 'w', long, value_name = "MS", default_value = "3000", global = true)]
    pub window_ms: u64,

    /// Number of top-scored candidates probed in the fallback phase
    #[arg(
        short = 'n',
        long,
        value_name = "COUNT",
        default_value = "5",
        value_parser = parse_candidate_count,
        global = true
    )]
    pub max_candidates: usize,

    /// BPF filter used while probing
    #[arg(short = 'f', long, value_name = "BPF", default_value = "ip and tcp", global = true)]
    pub filter: String,

    /// Extra keyword marking VPN adapters (repeatable)
    #[arg(long = "extra-vpn-keyword", value_name = "KEYWORD", global = true)]
    pub extra_vpn_keywords: Vec<String>,

    /// Extra keyword marking virtual adapters (repeatable)
    #[arg(long = "extra-virtual-keyword", value_name = "KEYWORD", global = true)]
    pub extra_virtual_keywords: Vec<String>,

    /// Extra keyword marking adapters that are never considered (repeatable)
    #[arg(long = "extra-excluded-keyword", value_name = "KEYWORD", global = true)]
    pub extra_excluded_keywords: Vec<String>,

    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Fallback probing needs at least one candidate
fn parse_candidate_count(value: &str) -> Result<usize, String> {
    let count: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if count == 0 {
        return Err("at least one candidate must be probed".to_string());
    }
    Ok(count)
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List capture devices with their classification
    Devices,

    /// Show suitable devices ranked by score
    Candidates,

    /// Show the device carrying the default route
    Route,

    /// Count packets on one device for the probe window
    Probe {
        /// Device index as shown by `devices`
        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// Select the default device (route check, then probing)
    Select,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Subcommand to run; `select` when none is given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Select)
    }

    /// Keyword tables with any extra keywords appended
    pub fn keyword_tables(&self) -> KeywordTables {
        let mut tables = KeywordTables::default();
        for keyword in &self.extra_vpn_keywords {
            tables = tables.with_vpn_keyword(keyword.as_str());
        }
        for keyword in &self.extra_virtual_keywords {
            tables = tables.with_virtual_keyword(keyword.as_str());
        }
        for keyword in &self.extra_excluded_keywords {
            tables = tables.with_excluded_keyword(keyword.as_str());
        }
        tables
    }

    /// Selector configuration from the command line
    pub fn selector_config(&self) -> SelectorConfig {
        let defaults = SelectorConfig::default();
        SelectorConfig {
            max_candidates: self.max_candidates,
            capture: defaults
                .capture
                .with_filter(self.filter.as_str())
                .with_window(Duration::from_millis(self.window_ms)),
            keywords: self.keyword_tables(),
        }
    }

    /// Default log directive for the verbosity level
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
