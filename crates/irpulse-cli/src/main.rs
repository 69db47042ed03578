use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use irpulse_core::{
    Catalog, Packet, ProtocolId, Tolerance, build_report, decode_traced, encode, histogram,
};

#[derive(Parser, Debug)]
#[command(name = "irpulse")]
#[command(version)]
#[command(
    about = "Decode and re-encode infrared remote captures (pulse-distance timings).",
    long_about = None,
    after_help = "Examples:\n  irpulse decode capture.txt -o report.json\n  irpulse decode - --stdout --pretty\n  irpulse encode packet.json --stdout\n  irpulse analyse capture.txt --stdout"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a raw timing capture against the built-in protocol catalog.
    #[command(
        after_help = "The capture is whitespace/comma-separated unsigned durations in\nmicroseconds, first value being the lead space; '#' starts a comment.\nA run with no matching protocol still succeeds and reports \"packet\": null."
    )]
    Decode {
        /// Capture file; pass '-' to read from stdin
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Matching tolerance in percent
        #[arg(long, default_value_t = 25)]
        tolerance: u32,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },

    /// Re-encode a packet description into transmitter pulse instructions.
    #[command(
        after_help = "The packet description is JSON:\n  {\"protocol\": \"Junco\", \"bits\": 16, \"payload_hex\": \"20df\", \"repeated\": false}"
    )]
    Encode {
        /// Packet description file (JSON); pass '-' to read from stdin
        input: PathBuf,

        /// Output pulse list path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write JSON pulse list to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },

    /// Histogram the distinct durations in a capture.
    #[command(alias = "analyze")]
    Analyse {
        /// Capture file; pass '-' to read from stdin
        input: PathBuf,

        /// Output histogram path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write JSON histogram to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            report,
            stdout,
            pretty,
            compact,
            tolerance,
            quiet,
        } => cmd_decode(input, report, stdout, pretty, compact, tolerance, quiet),
        Commands::Encode {
            input,
            output,
            stdout,
            pretty,
            quiet,
        } => cmd_encode(input, output, stdout, pretty, quiet),
        Commands::Analyse {
            input,
            output,
            stdout,
            pretty,
            quiet,
        } => cmd_analyse(input, output, stdout, pretty, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn cmd_decode(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    tolerance: u32,
    quiet: bool,
) -> Result<(), CliError> {
    let raw = read_durations(&input)?;
    let tolerance = Tolerance::new(tolerance);
    let catalog = Catalog::standard();

    let outcome = decode_traced(&raw, &catalog, tolerance);
    let rep = build_report(&raw, &outcome, tolerance);
    let json = serialize_json(&rep, pretty, compact)?;
    write_output(&json, report, stdout, quiet, "report")
}

fn cmd_encode(
    input: PathBuf,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let text = read_input_text(&input)?;
    let description: PacketDescription = serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            format!("invalid packet description: {err}"),
            Some(
                "expected JSON like {\"protocol\": \"Junco\", \"bits\": 16, \
                 \"payload_hex\": \"20df\"}"
                    .to_string(),
            ),
        )
    })?;
    let packet = description.into_packet()?;

    let catalog = Catalog::standard();
    let pulses = encode(&packet, &catalog)
        .map_err(|err| CliError::new(format!("encoding failed: {err}"), None))?;
    let json = serialize_json(&pulses, pretty, false)?;
    write_output(&json, output, stdout, quiet, "pulse list")
}

fn cmd_analyse(
    input: PathBuf,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let raw = read_durations(&input)?;
    let bins = histogram(&raw);
    let json = serialize_json(&bins, pretty, false)?;
    write_output(&json, output, stdout, quiet, "histogram")
}

/// Packet description accepted by `encode`.
#[derive(Debug, Deserialize)]
struct PacketDescription {
    protocol: String,
    bits: u8,
    #[serde(default)]
    payload_hex: String,
    #[serde(default)]
    repeated: bool,
}

impl PacketDescription {
    fn into_packet(self) -> Result<Packet, CliError> {
        let protocol = ProtocolId::from_name(&self.protocol).ok_or_else(|| {
            CliError::new(
                format!("unknown protocol name: {}", self.protocol),
                Some("known protocols: Junco, Yawl, Draftee, Ampul, Marl".to_string()),
            )
        })?;
        let payload = parse_hex(&self.payload_hex)?;
        let mut packet = Packet::assemble(protocol, self.bits, &payload)
            .map_err(|err| CliError::new(format!("invalid packet description: {err}"), None))?;
        packet.is_repeated = self.repeated;
        Ok(packet)
    }
}

fn parse_hex(hex: &str) -> Result<Vec<u8>, CliError> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return Err(CliError::new(
            format!("payload_hex has odd length {}", hex.len()),
            Some("each payload byte is two hex digits".to_string()),
        ));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| {
                CliError::new(
                    format!("payload_hex is not hexadecimal: {:?}", &hex[i..i + 2]),
                    None,
                )
            })
        })
        .collect()
}

fn read_input_text(input: &Path) -> Result<String, CliError> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass '-' to read from stdin".to_string()),
        ));
    }
    Ok(fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?)
}

fn read_durations(input: &Path) -> Result<Vec<u32>, CliError> {
    let text = read_input_text(input)?;
    let mut durations = Vec::new();
    for line in text.lines() {
        let line = line.split('#').next().unwrap_or("");
        for token in line.split(|c: char| c.is_whitespace() || c == ',') {
            if token.is_empty() {
                continue;
            }
            let duration: u32 = token.parse().map_err(|_| {
                CliError::new(
                    format!("invalid duration {token:?}"),
                    Some(
                        "captures are unsigned microsecond durations separated by \
                         spaces or commas"
                            .to_string(),
                    ),
                )
            })?;
            durations.push(duration);
        }
    }
    Ok(durations)
}

fn serialize_json<T: serde::Serialize>(
    value: &T,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn write_output(
    json: &str,
    path: Option<PathBuf>,
    stdout: bool,
    quiet: bool,
    what: &str,
) -> Result<(), CliError> {
    if stdout {
        println!("{}", json);
        return Ok(());
    }

    let path = path.ok_or_else(|| {
        CliError::new(
            "missing output path",
            Some("use -o or --stdout".to_string()),
        )
    })?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&path, json)
        .with_context(|| format!("Failed to write {what}: {}", path.display()))?;
    if !quiet {
        eprintln!("OK: {what} written -> {}", path.display());
    }
    Ok(())
}
