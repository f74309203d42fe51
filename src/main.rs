//! xspace2json: Convert a profiler session to the JSON trace-event format
//!
//! Reads a serialized `XSpace` protobuf, reports what it contains on stderr
//! and writes a trace loadable by ui.perfetto.dev or chrome://tracing to
//! stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use xspace2json::protos::xplane::XSpace;
use xspace2json::trace::constants::MAX_TRACE_EVENTS;
use xspace2json::xspace::plane_event_count;
use xspace2json::{load_xspace, to_json, xspace_to_trace_container, SessionSummary};

#[derive(Debug, Parser)]
#[command(name = "xspace2json")]
#[command(about = "Convert an XSpace profiler session to the JSON trace-event format")]
#[command(version)]
struct Command {
    /// Serialized XSpace protobuf
    input: PathBuf,

    /// Print a per-plane breakdown to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Keep at most this many events (the earliest ones)
    #[arg(long, default_value_t = MAX_TRACE_EVENTS)]
    max_events: usize,
}

fn report_session(space: &XSpace, verbose: bool) {
    for error in &space.errors {
        eprintln!("XSpace error: {error}");
    }
    for warning in &space.warnings {
        eprintln!("XSpace warning: {warning}");
    }

    if verbose {
        for plane in &space.planes {
            eprintln!(
                "  plane {} '{}': {} lines, {} events",
                plane.id,
                plane.name,
                plane.lines.len(),
                plane_event_count(plane)
            );
        }
    }

    eprintln!("{}", SessionSummary::of(space));
}

// Any error returned here is printed to stderr and the process exits with
// status 1; success exits with 0. Nothing reaches stdout before every guard
// check has passed. The 0/1 status is deliberate: a `true`/`false` result
// used directly as the exit code would report success as 1.
fn main() -> Result<()> {
    let opts = Command::parse();

    let space = load_xspace(&opts.input)?;
    report_session(&space, opts.verbose);

    let mut container = xspace_to_trace_container(&space);
    let dropped = container.cap_events(opts.max_events);
    if dropped > 0 {
        eprintln!(
            "Dropped {dropped} events to stay within the {} event limit",
            opts.max_events
        );
    }

    let json = to_json(&container, opts.pretty)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("Failed to write trace to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}
