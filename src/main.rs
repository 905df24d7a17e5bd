//! laxjson CLI.
//!
//! Reads a file, parses it as relaxed JSON, and re-renders it pretty or
//! minified. All I/O lives here; the library never touches the filesystem.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::Parser;
use tracing::debug;

use laxjson::{parse_with_options, render_minified, render_pretty, ParseOptions};

mod logging;

#[derive(Debug, Parser)]
#[command(name = "laxjson")]
#[command(about = "Parse a relaxed JSON file and render it back", long_about = None)]
#[command(version)]
struct Args {
    /// The file to parse.
    input: PathBuf,

    /// Emit minified output instead of pretty-printed.
    #[arg(long)]
    minify: bool,

    /// In pretty mode, also put a separator after the last element of each
    /// container.
    #[arg(long)]
    trailing_separator: bool,

    /// Reject input with leftover bytes after the document.
    #[arg(long)]
    strict: bool,

    /// Write the rendering here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    logging::setup();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    debug!(input = ?args.input, minify = args.minify, strict = args.strict);

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read file `{}`", args.input.display()))?;

    let path = args.input.display().to_string();

    let options = if args.strict {
        ParseOptions::strict()
    } else {
        ParseOptions::relaxed()
    };

    let value = match parse_with_options(&text, options) {
        Ok(value) => value,
        Err(err) => {
            if text.is_empty() {
                eprintln!("error: {err}");
                return Ok(ExitCode::FAILURE);
            }
            let offset = err.offset();
            // keep the label on a real character, even for EOF errors
            let end = (offset + 1).min(text.len());
            let span = offset.min(end - 1)..end;
            Report::build(ReportKind::Error, &path, offset)
                .with_message(err.to_string())
                .with_label(
                    Label::new((&path, span))
                        .with_message("parsing stopped here")
                        .with_color(Color::Red),
                )
                .finish()
                .print((&path, Source::from(&text)))
                .context("failed to render the parse error report")?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let rendered = if args.minify {
        render_minified(&value)
    } else {
        render_pretty(&value, args.trailing_separator)
    };

    match &args.output {
        Some(path) => fs::write(path, rendered + "\n")
            .with_context(|| format!("failed to write `{}`", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(ExitCode::SUCCESS)
}
