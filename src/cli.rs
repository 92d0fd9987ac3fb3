use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::engine::Locator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "dataloc")]
#[command(about = "Locate the table entry behind a table-driven test case", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the `path:line` of the entry whose key is passed on a lookup line
    Locate {
        /// Test file containing the lookup call
        #[arg(long, value_name = "FILE")]
        file: PathBuf,

        /// 1-based line of the lookup call
        #[arg(long)]
        line: usize,

        /// Key value to look for in the table
        #[arg(long)]
        key: String,

        #[command(flatten)]
        callees: CalleeArgs,
    },

    /// List every lookup call site and the table entries it reaches
    Entries {
        /// File or directory to scan
        #[arg(long, value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        callees: CalleeArgs,

        /// Output format
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,

        /// Output file path (prints to stdout if not specified)
        #[arg(short = 'O', long, value_name = "FILE")]
        output_file: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct CalleeArgs {
    /// Additional lookup function name. Can be specified multiple times.
    #[arg(long = "track", value_name = "NAME")]
    pub track: Vec<String>,

    /// Treat any call on the line as the lookup (for helper layers)
    #[arg(long)]
    pub any_callee: bool,
}

impl CalleeArgs {
    pub fn locator(&self) -> Locator {
        self.track
            .iter()
            .fold(Locator::builder(), |builder, name| builder.track(name.clone()))
            .any_callee(self.any_callee)
            .build()
    }
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Locate { file, line, .. } => {
                validate_path(file)?;
                if !file.is_file() {
                    anyhow::bail!("Not a file: {}", file.display());
                }
                if *line == 0 {
                    anyhow::bail!("Line numbers start at 1");
                }
            }
            Command::Entries { path, .. } => validate_path(path)?,
        }
        Ok(())
    }
}

pub fn validate_path(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        std::fs::metadata(path).with_context(|| format!("Cannot read file: {}", path.display()))?;
    } else if path.is_dir() {
        std::fs::metadata(path)
            .with_context(|| format!("Cannot read directory: {}", path.display()))?;
    } else {
        anyhow::bail!("Path is neither a file nor a directory: {}", path.display());
    }

    Ok(())
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}
