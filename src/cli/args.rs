//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// kiln asset compiler and server CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: kiln.toml)
    #[arg(short = 'C', long, global = true, default_value = "kiln.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile the source and print the resulting index
    #[command(visible_alias = "l")]
    List {
        #[command(flatten)]
        load_args: LoadArgs,

        /// Output JSON instead of a table
        #[arg(short, long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, requires = "json")]
        pretty: bool,
    },

    /// Compile the source and serve it over HTTP
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        load_args: LoadArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Answer unknown paths with "404 - No such page"
        #[arg(short = 'e', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
        display_errors: Option<bool>,

        /// Cache-Control max-age in seconds
        #[arg(short, long)]
        cache: Option<u64>,
    },
}

/// Shared load arguments for List and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct LoadArgs {
    /// Directory to compile (relative to the current directory)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Root that public paths are relative to (default: source)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Minify output (default: on when KILN_ENV or NODE_ENV is "production")
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub minify: Option<bool>,

    /// Skip files under this path fragment (repeatable)
    #[arg(short, long, value_name = "FRAGMENT")]
    pub skip: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::parse_from(["kiln", "-v", "list", "site", "--json", "--pretty"]);
        assert!(cli.verbose);
        let Commands::List {
            load_args,
            json,
            pretty,
        } = cli.command
        else {
            unreachable!()
        };
        assert_eq!(load_args.source, Some(PathBuf::from("site")));
        assert!(json && pretty);
    }

    #[test]
    fn test_pretty_requires_json() {
        assert!(Cli::try_parse_from(["kiln", "list", "--pretty"]).is_err());
    }

    #[test]
    fn test_verbose_and_version_flags() {
        let cli = Cli::parse_from(["kiln", "serve", "-v"]);
        assert!(cli.verbose);

        let err = Cli::try_parse_from(["kiln", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
