use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use common::log_setup::setup_logging;
use normaliser::{
    nominal_chunk_counts, parse_chunk_count, AppConfig, Grid, Normaliser, Phase, RemainderPolicy,
    TransformKind, WorkerEvent,
};

const USAGE: &str = "\
Usage: normaliser <input> [options]

Options:
  -c, --chunks <N>          number of chunks / worker threads (asks interactively if omitted)
  -o, --output <FILE>       output image (default: output.png)
      --config <FILE>       TOML settings file
      --remainder <POLICY>  truncate | extend-last
      --transform <KIND>    channel-permutation | linear-rescale
      --log-level <FILTER>  tracing filter, overridden by RUST_LOG
  -h, --help                print this help";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    input: PathBuf,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    chunk_count: Option<usize>,
    remainder: Option<RemainderPolicy>,
    transform: Option<TransformKind>,
    log_level: Option<String>,
}

impl CliArgs {
    /// Returns `None` when help was requested.
    fn parse<I>(args: I) -> Result<Option<CliArgs>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut input = None;
        let mut parsed = CliArgs::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "-c" | "--chunks" => {
                    parsed.chunk_count = Some(parse_chunk_count(&option_value(&mut args, &arg)?)?)
                }
                "-o" | "--output" => parsed.output = Some(option_value(&mut args, &arg)?.into()),
                "--config" => parsed.config = Some(option_value(&mut args, &arg)?.into()),
                "--remainder" => parsed.remainder = Some(option_value(&mut args, &arg)?.parse()?),
                "--transform" => parsed.transform = Some(option_value(&mut args, &arg)?.parse()?),
                "--log-level" => parsed.log_level = Some(option_value(&mut args, &arg)?),
                flag if flag.starts_with('-') => bail!("Unknown option '{flag}'\n\n{USAGE}"),
                _ if input.is_none() => input = Some(PathBuf::from(&arg)),
                _ => bail!("Unexpected argument '{arg}'\n\n{USAGE}"),
            }
        }

        parsed.input = input.with_context(|| format!("Missing input image\n\n{USAGE}"))?;
        Ok(Some(parsed))
    }

    /// Command line values win over the settings file.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(chunk_count) = self.chunk_count {
            config.chunk_count = Some(chunk_count);
        }
        if let Some(remainder) = self.remainder {
            config.remainder = remainder;
        }
        if let Some(transform) = self.transform {
            config.transform = transform;
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone();
        }
    }
}

fn option_value(args: &mut impl Iterator<Item = String>, option: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("Option '{option}' needs a value"))
}

fn main() -> Result<()> {
    let Some(args) = CliArgs::parse(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config);

    setup_logging(&config.log_level, &config.log_dir)?;

    let grid = Grid::read_file(&args.input)
        .with_context(|| format!("Image could not be loaded from {}", args.input.display()))?;
    tracing::info!(
        width = grid.width(),
        height = grid.height(),
        "{} loaded",
        args.input.display()
    );

    match config.chunk_count {
        Some(chunk_count) => run_once(&grid, &config, chunk_count)?,
        None => interactive(&grid, &config)?,
    }

    Ok(())
}

const COLUMN_WIDTH: usize = 6;

/// One column per chunk, numbered.
fn trace_header(chunk_count: usize) -> String {
    (0..chunk_count)
        .map(|chunk| format!("{chunk:^COLUMN_WIDTH$}"))
        .collect()
}

/// Barrier trace line for `event`: `****` on arrival, `CAPT` for the leader,
/// `GO` once released. Other phases are not shown.
fn trace_line(event: WorkerEvent, chunk_count: usize) -> Option<String> {
    let label = match event.phase {
        Phase::Arrive1 | Phase::Arrive2 => "****",
        Phase::Aggregate => "CAPT",
        Phase::Transform => "GO",
        _ => return None,
    };

    let line = (0..chunk_count)
        .map(|chunk| {
            let cell = if chunk == event.chunk { label } else { "|" };
            format!("{cell:^COLUMN_WIDTH$}")
        })
        .collect::<String>();
    Some(line.trim_end().to_string())
}

fn run_once(grid: &Grid, config: &AppConfig, chunk_count: usize) -> normaliser::Result<()> {
    println!("{}", trace_header(chunk_count));
    let output = Normaliser::new(config.normalise_config(chunk_count))
        .on_event(Arc::new(move |event: WorkerEvent| {
            if let Some(line) = trace_line(event, chunk_count) {
                println!("{line}");
            }
        }))
        .run(grid)?;

    tracing::info!("Reassembled output image, saving to {}", config.output.display());
    output.grid.save_file(&config.output)?;

    println!(
        "    > Done! {} workers took {:?} (global brightness {:.3}..{:.3})",
        chunk_count, output.elapsed, output.global_range.min, output.global_range.max
    );

    Ok(())
}

/// Prompts for chunk counts until the input is empty or closed.
fn interactive(grid: &Grid, config: &AppConfig) -> Result<()> {
    let nominal = nominal_chunk_counts(grid.height())
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("    > Nominal chunk counts (divide the image height): {nominal}");
        print!("   >> Enter in chunks to use (empty to quit): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            break;
        }

        let result = parse_chunk_count(&line).and_then(|n| run_once(grid, config, n));
        match result {
            Ok(()) => {}
            Err(err) if err.is_chunk_count_error() => println!("    > {err}"),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
