// SPDX-License-Identifier: MIT
// Project: decomment
// Description: A streaming filter that strips comments from source text.
// File: src/main.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use anyhow::{bail, Context};
use clap::Parser;
use decomment::{decomment_stream, Summary};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(name = "decomment", author = "Volker Schwaberow <volker@schwaberow.de>", version, about = "Decomment: Removes /* */ comments from source text.", long_about = None)]
struct Args {
    /// File to read; standard input when omitted or `-`.
    #[clap(value_parser)]
    input: Option<String>,

    /// Number of leading lines to copy verbatim, comments included.
    #[clap(short = 'H', long, default_value_t = 0)]
    header_lines: usize,

    #[clap(short, long)]
    output: Option<String>,

    #[clap(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,

    #[clap(short, long, action = clap::ArgAction::SetTrue)]
    dry_run: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn open_input(input: Option<&str>) -> anyhow::Result<Box<dyn BufRead>> {
    match input {
        None | Some("-") => Ok(Box::new(BufReader::new(io::stdin().lock()))),
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                bail!("Input file '{}' does not exist.", path_str);
            }
            if !path.is_file() {
                bail!("Input path '{}' is not a file.", path_str);
            }
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file '{}'", path_str))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

fn open_output(args: &Args) -> anyhow::Result<Box<dyn Write>> {
    if args.dry_run {
        return Ok(Box::new(io::sink()));
    }
    match &args.output {
        Some(output_path_str) => {
            let output_file = File::create(output_path_str)
                .with_context(|| format!("Failed to create output file '{}'", output_path_str))?;
            Ok(Box::new(BufWriter::new(output_file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn run(args: &Args) -> anyhow::Result<Summary> {
    let mut reader = open_input(args.input.as_deref())?;
    let mut writer = open_output(args)?;
    let summary = decomment_stream(&mut reader, &mut writer, args.header_lines)?;

    if args.dry_run {
        println!(
            "Decomment: Dry run complete. {} comments would be removed. No output written.",
            summary.stats.comments_removed
        );
    } else if let Some(output_path) = &args.output {
        log::info!("Output written to {}", output_path);
    }
    Ok(summary)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
