//! `toon` CLI — encode, decode, and extract agent TOON payloads from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Encode a JSON object to TOON (stdin → stdout)
//! echo '{"name":"Alpha","tags":["a","b"]}' | toon encode
//!
//! # Encode with comma tables, as older prompts expect
//! toon encode --delimiter comma -i plan.json -o plan.toon
//!
//! # Decode TOON back to pretty-printed JSON
//! toon decode -i plan.toon
//!
//! # Pull structured data out of a saved model reply
//! toon extract -i reply.txt --show-source
//!
//! # Show size statistics
//! toon stats -i plan.json
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG`; `-v` enables debug output.

use agent_toon::{Delimiter, EncodeOptions, ListStyle, Mapping};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(
    name = "toon",
    version,
    about = "Encode, decode and extract agent TOON payloads"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON object to TOON
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Table delimiter
        #[arg(long, value_enum, default_value_t = DelimiterArg::Pipe)]
        delimiter: DelimiterArg,
        /// Write scalar lists on one line (`key: a, b`)
        #[arg(long)]
        inline_lists: bool,
        /// Comma tables and inline lists, the older output shape
        #[arg(long, conflicts_with_all = ["delimiter", "inline_lists"])]
        legacy: bool,
        /// Spaces to prefix every top-level line with
        #[arg(long, default_value_t = 0)]
        indent: usize,
    },
    /// Decode TOON to pretty-printed JSON
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Extract structured data from a model response
    Extract {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Print which strategy matched to stderr
        #[arg(long)]
        show_source: bool,
        /// Fail when nothing could be extracted
        #[arg(long)]
        require_data: bool,
    },
    /// Show JSON vs TOON size statistics
    Stats {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DelimiterArg {
    Pipe,
    Comma,
}

impl From<DelimiterArg> for Delimiter {
    fn from(arg: DelimiterArg) -> Self {
        match arg {
            DelimiterArg::Pipe => Delimiter::Pipe,
            DelimiterArg::Comma => Delimiter::Comma,
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Encode {
            input,
            output,
            delimiter,
            inline_lists,
            legacy,
            indent,
        } => {
            let options = if legacy {
                EncodeOptions::legacy()
            } else {
                let list_style = if inline_lists {
                    ListStyle::Inline
                } else {
                    ListStyle::Block
                };
                EncodeOptions::new()
                    .with_delimiter(delimiter.into())
                    .with_list_style(list_style)
            }
            .with_indent(indent);

            let json = read_input(input.as_deref())?;
            let data = parse_json_mapping(&json)?;
            let toon = agent_toon::dumps_with(&data, &options);
            write_output(output.as_deref(), &toon)?;
        }
        Commands::Decode { input, output } => {
            let toon = read_input(input.as_deref())?;
            let data = agent_toon::loads(&toon);
            debug!("decoded {} top-level keys", data.len());
            write_json(output.as_deref(), &data)?;
        }
        Commands::Extract {
            input,
            output,
            show_source,
            require_data,
        } => {
            let text = read_input(input.as_deref())?;
            let extracted = agent_toon::extract(&text);
            info!("extracted via {}", extracted.source);
            if show_source {
                eprintln!("source: {}", extracted.source);
            }
            if require_data && extracted.data.is_empty() {
                bail!("no structured data found in input");
            }
            write_json(output.as_deref(), &extracted.data)?;
        }
        Commands::Stats { input } => {
            let json = read_input(input.as_deref())?;
            let data = parse_json_mapping(&json)?;
            let toon = agent_toon::dumps(&data, 0);
            let compact = serde_json::to_string(&data)?;
            let json_bytes = compact.len();
            let toon_bytes = toon.len();
            let ratio = if json_bytes > 0 {
                (1.0 - (toon_bytes as f64 / json_bytes as f64)) * 100.0
            } else {
                0.0
            };
            println!("JSON size:  {} bytes", json_bytes);
            println!("TOON size:  {} bytes", toon_bytes);
            println!("Reduction:  {:.1}%", ratio);
        }
    }

    Ok(())
}

fn parse_json_mapping(json: &str) -> Result<Mapping> {
    agent_toon::parse_json_object(json).context("Input must be a JSON object")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json(path: Option<&str>, data: &Mapping) -> Result<()> {
    let pretty = serde_json::to_string_pretty(data)?;
    write_output(path, &pretty)
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
