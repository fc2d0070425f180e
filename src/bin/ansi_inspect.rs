//! ANSI Inspector
//!
//! Reads terminal output (raw bytes or backslash-escaped text) from a file
//! or stdin and prints the decoded control codes, the tokens, or the result
//! of replaying them on a virtual terminal buffer.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ansi_tools::app::{CliArgs, Config, OutputFormat};
use ansi_tools::input::read_input;
use ansi_tools::{parser, tokenizer, ControlCode, Mode, Result, VirtualTerminalBuffer};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = Config::load_with_args(args)?;
    let input = read_input(args.file.as_deref())?;
    let mode = config.mode.resolve(&input);
    let limit = config.limit.unwrap_or(usize::MAX);
    tracing::debug!(
        "Inspecting {} bytes as {} input ({} output)",
        input.len(),
        mode,
        config.format
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match config.format {
        OutputFormat::Codes => {
            for code in codes(&input, mode, &config).take(limit) {
                writeln!(out, "{}", code)?;
            }
        },
        OutputFormat::Tokens => {
            for token in tokenizer(&input, mode).take(limit) {
                let class = token.class.map_or("", |class| class.name());
                writeln!(
                    out,
                    "{:<11}@{:<6}{:<4}{:?}",
                    token.kind.name(),
                    token.position,
                    class,
                    token.raw
                )?;
            }
        },
        OutputFormat::Json => {
            let codes: Vec<ControlCode> = codes(&input, mode, &config).take(limit).collect();
            serde_json::to_writer_pretty(&mut out, &codes)?;
            writeln!(out)?;
        },
        OutputFormat::Render | OutputFormat::Snapshot => {
            let mut buffer = VirtualTerminalBuffer::new();
            for code in parser(&input, mode).take(limit) {
                buffer.apply(&code);
            }
            let snapshot = buffer.into_snapshot();

            if config.format == OutputFormat::Snapshot {
                writeln!(out, "{}", snapshot.to_json()?)?;
            } else if config.show_frames {
                write!(out, "{}", snapshot.to_text())?;
            } else {
                writeln!(out, "{}", snapshot.text())?;
            }
        },
    }

    out.flush()?;
    Ok(())
}

/// Parsed codes, with decoded text dropped when the config asks for it
fn codes<'a>(
    input: &'a str,
    mode: Mode,
    config: &Config,
) -> impl Iterator<Item = ControlCode> + 'a {
    let decode_text = config.decode_text;
    parser(input, mode).map(move |mut code| {
        if let ControlCode::Text(text) = &mut code {
            if !decode_text {
                text.plain = None;
            }
        }
        code
    })
}
