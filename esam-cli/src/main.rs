//! ESAM Frame Decoder
//!
//! A command line tool for field staff working with security units: decodes
//! command and acknowledgement frames given as hex text, assembles frames for
//! testing, and lists the commands it knows how to lay out.

mod output;
mod settings;

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use esam_protocol::frame::preprocess;
use esam_protocol::layout::registered_keys;
use esam_protocol::{decode, hex, FrameBuilder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use output::{FrameReport, Renderer};
use settings::{OutputFormat, Settings};

/// Security unit (ESAM) frame decoder
#[derive(Parser)]
#[command(name = "esamdec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (default: $XDG_CONFIG_HOME/esamdec/settings.json)
    #[arg(short, long, global = true, env = "ESAMDEC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode frames given as hex text
    Decode {
        /// Frames to decode; read from --file or stdin when omitted
        frames: Vec<String>,

        /// Read frames from a file, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Leave out the details column
        #[arg(long)]
        no_details: bool,
    },

    /// Assemble a frame, filling in length and checksum
    Build {
        /// Main function byte (hex)
        #[arg(short = 'f', long, value_parser = parse_hex_byte, required_unless_present = "special")]
        main_function: Option<u8>,

        /// Command code (hex, low 7 bits)
        #[arg(short = 'k', long, value_parser = parse_hex_byte, required_unless_present = "special")]
        code: Option<u8>,

        /// Status byte (hex); makes the frame an acknowledgement
        #[arg(short, long, value_parser = parse_hex_byte)]
        status: Option<u8>,

        /// Data domain (hex, spaces allowed)
        #[arg(short, long, default_value = "")]
        data: String,

        /// Upgrade-end acknowledgement without a command byte
        #[arg(long, conflicts_with_all = ["main_function", "code", "status"])]
        special: bool,
    },

    /// List every command with a data-domain layout
    Keys,
}

fn parse_hex_byte(s: &str) -> Result<u8, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid hex byte '{}': {}", s, e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose raises our crates to debug
    let default_filter = if cli.verbose {
        "esamdec=debug,esam_protocol=debug"
    } else {
        "esamdec=info,esam_protocol=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let settings = Settings::load(cli.config.as_deref());
    if !settings.color {
        colored::control::set_override(false);
    }

    match run(cli.command, &settings) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, settings: &Settings) -> Result<ExitCode> {
    match command {
        Commands::Decode {
            frames,
            file,
            format,
            no_details,
        } => {
            let renderer = Renderer::new(settings, format, no_details);
            run_decode(collect_frames(frames, file)?, renderer)
        }
        Commands::Build {
            main_function,
            code,
            status,
            data,
            special,
        } => {
            let data = hex::decode_bytes(&preprocess(&data))
                .with_context(|| format!("Data is not whole hex bytes: {}", data))?;
            let builder = if special {
                FrameBuilder::upgrade_end()
            } else {
                let f = main_function.context("--main-function is required")?;
                let code = code.context("--code is required")?;
                match status {
                    Some(status) => FrameBuilder::ack(f, code, status),
                    None => FrameBuilder::command(f, code),
                }
            };
            println!("{}", builder.data(data).build()?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Keys => {
            print!("{}", output::render_keys(&registered_keys(), settings.table_style));
            println!();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Frames from the arguments, else the file, else stdin
///
/// Blank lines and lines starting with `#` are skipped.
fn collect_frames(frames: Vec<String>, file: Option<PathBuf>) -> Result<Vec<String>> {
    if !frames.is_empty() {
        return Ok(frames);
    }

    let text = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            text
        }
    };

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn run_decode(frames: Vec<String>, renderer: Renderer) -> Result<ExitCode> {
    let reports: Vec<FrameReport> = frames
        .into_iter()
        .map(|frame| {
            let outcome = decode(&frame);
            tracing::debug!("{} -> {}", frame, outcome.name());
            FrameReport { frame, outcome }
        })
        .collect();

    let failed = reports.iter().filter(|r| !r.outcome.is_complete()).count();
    print!("{}", renderer.render(&reports)?);

    if failed > 0 {
        tracing::info!("{} of {} frames failed to decode", failed, reports.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_byte() {
        assert_eq!(parse_hex_byte("FE"), Ok(0xFE));
        assert_eq!(parse_hex_byte("0x0a"), Ok(0x0A));
        assert!(parse_hex_byte("100").is_err());
        assert!(parse_hex_byte("zz").is_err());
    }

    #[test]
    fn test_collect_frames_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.txt");
        std::fs::write(&path, "# captured 2024-06-01\nE9000500021234568CE6\n\n  e9 00 02 07 01 f3 e6  \n").unwrap();

        let frames = collect_frames(Vec::new(), Some(path)).unwrap();
        assert_eq!(frames, ["E9000500021234568CE6", "e9 00 02 07 01 f3 e6"]);
    }

    #[test]
    fn test_arguments_win_over_file() {
        let frames = collect_frames(vec!["E9".into()], Some(PathBuf::from("/nonexistent"))).unwrap();
        assert_eq!(frames, ["E9"]);
    }

    #[test]
    fn test_cli_parses_build() {
        let cli = Cli::try_parse_from(["esamdec", "build", "-f", "00", "-k", "02", "-d", "12 34 56"]).unwrap();
        match cli.command {
            Commands::Build {
                main_function,
                code,
                data,
                special,
                ..
            } => {
                assert_eq!(main_function, Some(0x00));
                assert_eq!(code, Some(0x02));
                assert_eq!(data, "12 34 56");
                assert!(!special);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_cli_special_needs_no_code() {
        assert!(Cli::try_parse_from(["esamdec", "build", "--special"]).is_ok());
        assert!(Cli::try_parse_from(["esamdec", "build", "-f", "00"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
