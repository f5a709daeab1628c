//! CLI tool for vgrid - lays out a grid description and prints a frame report
//!
//! Usage:
//!   vgrid_cli <grid.json>                                 # Report at 1024x768
//!   vgrid_cli <grid.json> --width 800 --height 600        # Custom viewport
//!   vgrid_cli <grid.json> --scroll-x 120 --scroll-y 4000  # Report after scrolling
//!   vgrid_cli <grid.json> --summary qty=sum               # Summary rule (repeatable)
//!
//! Set `RUST_LOG=vgrid=debug` for engine logs on stderr.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vgrid::error::{GridError, Result};
use vgrid::summary::WorkerExecutor;
use vgrid::{FrameReport, GridEngine, GridSpec, SummaryRule};

const USAGE: &str = "Usage: vgrid_cli <grid.json> [--width W] [--height H] [--scroll-x X] [--scroll-y Y] [--summary column=rule]...";
const AGGREGATION_TIMEOUT: Duration = Duration::from_secs(5);

struct Options {
    input: String,
    width: f64,
    height: f64,
    scroll_x: f64,
    scroll_y: f64,
    summaries: Vec<(String, SummaryRule)>,
}

fn parse_number(flag: &str, value: Option<String>) -> Result<f64> {
    let value = value.ok_or_else(|| GridError::Config(format!("{flag} needs a value")))?;
    value
        .parse()
        .map_err(|_| GridError::Config(format!("{flag}: not a number: {value}")))
}

fn parse_rule(value: Option<String>) -> Result<(String, SummaryRule)> {
    let value = value.ok_or_else(|| GridError::Config("--summary needs a value".to_string()))?;
    let (column, rule) = value
        .split_once('=')
        .ok_or_else(|| GridError::Config(format!("--summary expects column=rule, got {value}")))?;
    let rule: SummaryRule = serde_json::from_value(serde_json::Value::String(rule.to_string()))?;
    Ok((column.to_string(), rule))
}

fn parse_args() -> Result<Options> {
    let mut args = env::args().skip(1);
    let mut options = Options {
        input: String::new(),
        width: 1024.0,
        height: 768.0,
        scroll_x: 0.0,
        scroll_y: 0.0,
        summaries: Vec::new(),
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" => options.width = parse_number(&arg, args.next())?,
            "--height" => options.height = parse_number(&arg, args.next())?,
            "--scroll-x" => options.scroll_x = parse_number(&arg, args.next())?,
            "--scroll-y" => options.scroll_y = parse_number(&arg, args.next())?,
            "--summary" => options.summaries.push(parse_rule(args.next())?),
            "-h" | "--help" => return Err(GridError::Config(USAGE.to_string())),
            _ if options.input.is_empty() => options.input = arg,
            _ => return Err(GridError::Config(format!("unexpected argument {arg}\n{USAGE}"))),
        }
    }
    if options.input.is_empty() {
        return Err(GridError::Config(USAGE.to_string()));
    }
    Ok(options)
}

#[derive(Serialize)]
struct Report {
    frame: FrameReport,
    summaries: BTreeMap<String, String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let options = parse_args()?;
    let json = fs::read_to_string(&options.input)?;
    let spec = GridSpec::from_json(&json)?;
    let summary_enabled = spec.config.enable_summary;

    let mut engine = GridEngine::from_spec(spec);
    engine.set_executor(Box::new(WorkerExecutor::spawn()?));
    engine.attach(options.width, options.height);
    engine.scroll_to(options.scroll_x, options.scroll_y);

    for (column, rule) in &options.summaries {
        engine.set_summary_rule(column, *rule);
    }
    let started = Instant::now();
    while engine.has_pending_summaries() && started.elapsed() < AGGREGATION_TIMEOUT {
        if engine.poll_aggregations() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
    }

    let summaries = if summary_enabled {
        engine
            .columns()
            .iter()
            .filter_map(|c| {
                let text = engine.summary_text(&c.column_name)?;
                (!text.is_empty()).then(|| (c.column_name.clone(), text.to_string()))
            })
            .collect()
    } else {
        BTreeMap::new()
    };

    let report = Report {
        frame: engine.frame_report(),
        summaries,
    };
    info!(
        rows = report.frame.row_count,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "frame laid out"
    );

    let out = serde_json::to_string_pretty(&report)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    writeln!(stdout)?;
    Ok(())
}
