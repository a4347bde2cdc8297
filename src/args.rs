//! This module defines the command line arguments docql accepts.

use std::path::PathBuf;
use termcolor::ColorChoice;

use crate::{cmd, db::cmd::DbCommand};


#[derive(Debug, clap::Parser)]
#[clap(about = "GraphQL API for users and posts stored in MongoDB.")]
pub(crate) struct Args {
    #[clap(subcommand)]
    pub(crate) cmd: Command,

    /// Whether to use colors for output. Default: 'auto'. Possible values:
    /// 'always', 'auto', 'never'.
    #[clap(long, global = true, value_parser = parse_color_choice, default_value = "auto")]
    pub(crate) color: ColorChoice,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Command {
    /// Starts the HTTP server serving the GraphQL API and the GraphiQL page.
    Serve {
        #[clap(flatten)]
        shared: Shared,
    },

    /// Database operations.
    Db {
        #[clap(subcommand)]
        cmd: DbCommand,

        #[clap(flatten)]
        shared: Shared,
    },

    /// Checks the configuration and the database connection. Exits with 0 if
    /// everything is Ok, and with 1 otherwise.
    Check {
        #[clap(flatten)]
        shared: Shared,
    },

    /// Outputs a template for the configuration file (which includes
    /// descriptions or all options).
    WriteConfig {
        /// Target file. If not specified, the template is written to stdout.
        target: Option<PathBuf>,
    },

    /// Exports the API as GraphQL schema.
    ExportApiSchema {
        #[clap(flatten)]
        args: cmd::export_api_schema::Args,
    },
}

impl Command {
    /// Short name used for the `${cmd}` placeholder in the log file path.
    pub(crate) fn log_name(&self) -> &'static str {
        match self {
            Command::Serve { .. } => "serve",
            _ => "other",
        }
    }
}

#[derive(Debug, clap::Args)]
pub(crate) struct Shared {
    /// Path to the configuration file. If this is not specified, docql will
    /// check `DOCQL_CONFIG_PATH`, then try opening `config.toml` or
    /// `/etc/docql/config.toml`. If none of those exist, default values are
    /// used for everything.
    #[clap(short, long)]
    pub(crate) config: Option<PathBuf>,
}

impl Args {
    pub(crate) fn stdout_color(&self) -> ColorChoice {
        if self.color == ColorChoice::Auto && !std::io::IsTerminal::is_terminal(&std::io::stdout()) {
            ColorChoice::Never
        } else {
            self.color
        }
    }

    pub(crate) fn stderr_color(&self) -> ColorChoice {
        if self.color == ColorChoice::Auto && !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
            ColorChoice::Never
        } else {
            self.color
        }
    }
}

fn parse_color_choice(s: &str) -> Result<ColorChoice, &'static str> {
    match s {
        "always" => Ok(ColorChoice::Always),
        "auto" => Ok(ColorChoice::Auto),
        "never" => Ok(ColorChoice::Never),
        _ => Err("invalid color choice, has to be 'always', 'auto' or 'never'"),
    }
}
