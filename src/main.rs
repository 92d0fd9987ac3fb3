use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use dataloc::cli::{self, Command};
use dataloc::logging::{self, Verbosity};
use dataloc::output::OutputFormatter;
use dataloc::scanner::Scanner;
use dataloc::UNKNOWN;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));
    args.validate().context("Invalid arguments")?;

    match args.command {
        Command::Locate {
            file,
            line,
            key,
            callees,
        } => {
            let position = callees
                .locator()
                .locate_file(&file, line, &key)
                .with_context(|| format!("Cannot resolve {}", file.display()))?;
            match position {
                Some(position) => println!("{position}"),
                None => println!("{UNKNOWN}"),
            }
        }
        Command::Entries {
            path,
            callees,
            format,
            output_file,
        } => {
            let results = Scanner::with_locator(callees.locator())
                .scan_path(&path)
                .with_context(|| format!("Cannot scan {}", path.display()))?;
            let rendered = OutputFormatter::format(&results, format)?;

            match output_file {
                Some(out) => std::fs::write(&out, rendered)
                    .with_context(|| format!("Cannot write {}", out.display()))?,
                None => print!("{rendered}"),
            }
        }
    }

    Ok(())
}
