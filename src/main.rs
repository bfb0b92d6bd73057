//! cmosdraw - CMOS network diagram renderer
//!
//! Draws the pull-up and pull-down networks of a synthesized CMOS gate.
//!
//! # Usage
//!
//! ```bash
//! curl -s -X POST localhost:8000/synthesize -d '{"expr": "A & (B | !C)"}' \
//!     -H 'content-type: application/json' | cmosdraw > gate.svg
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use cmos_diagram::{
    error::{DiagramError, Result},
    io,
    network::{CmosNetwork, TransistorCount},
    normalize::{self, Document, Normalizer, SynthesisSteps, DEFAULT_NOT_GLYPH},
    render::{self, svg, RailLabels},
    Config,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Standalone SVG document
    Svg,
    /// Positioned primitives as JSON
    Json,
    /// Plain-text networks and transistor counts
    Summary,
}

/// Which network of a PUN/PDN pair to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Which {
    Both,
    Pun,
    Pdn,
}

/// CMOS network diagram renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Synthesis response, PUN/PDN pair, or single network as JSON ("-" for stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Network to draw when the input carries both
    #[arg(short, long, value_enum, default_value_t = Which::Both)]
    network: Which,

    /// Glyph prefixed to inverted gate names (overrides the response's style)
    #[arg(long, value_name = "GLYPH")]
    not: Option<String>,

    /// Transistor footprint size
    #[arg(long)]
    transistor_size: Option<f64>,

    /// Gap between parallel branches
    #[arg(long)]
    h_spacing: Option<f64>,

    /// Gap between series elements
    #[arg(long)]
    v_spacing: Option<f64>,

    /// Whitespace around each network
    #[arg(long)]
    padding: Option<f64>,

    /// Omit VDD/OUT/GND labels
    #[arg(long)]
    no_rail_labels: bool,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file first, then command line overrides.
fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(size) = args.transistor_size {
        config.layout.transistor_size = size;
    }
    if let Some(spacing) = args.h_spacing {
        config.layout.h_spacing = spacing;
    }
    if let Some(spacing) = args.v_spacing {
        config.layout.v_spacing = spacing;
    }
    if let Some(padding) = args.padding {
        config.render.padding = padding;
    }
    if args.no_rail_labels {
        config.render.rail_labels = false;
    }
    if let Some(glyph) = &args.not {
        config.not_glyph = Some(glyph.clone());
    }
    config.validate()?;
    Ok(config)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| DiagramError::OutputError {
        message: e.to_string(),
    })
}

/// Device totals agree; older services do not list inverted inputs.
fn same_totals(a: &TransistorCount, b: &TransistorCount) -> bool {
    (a.pdn_transistors, a.pun_transistors, a.inverter_transistors, a.total_transistors)
        == (b.pdn_transistors, b.pun_transistors, b.inverter_transistors, b.total_transistors)
}

fn render_pair(
    args: &Args,
    config: &Config,
    network: &CmosNetwork,
    steps: Option<&SynthesisSteps>,
) -> Result<String> {
    let count = TransistorCount::from_network(network);
    match steps.map(|s| (s.count.is_some(), s.reported_count())) {
        Some((_, Some(reported))) if !same_totals(&reported, &count) => {
            warn!(?reported, computed = ?count, "service transistor count differs from drawn networks");
        }
        Some((true, None)) => warn!("ignoring service transistor count of unknown shape"),
        _ => {}
    }
    info!(total = count.total_transistors, "normalized CMOS network");

    let diagram = render::render_cmos(network, config);
    match (args.format, args.network) {
        (Format::Summary, _) => Ok(io::summary(network, &count, steps)),
        (Format::Svg, Which::Both) => Ok(svg::cmos_to_svg(&diagram)),
        (Format::Svg, Which::Pun) => Ok(svg::to_svg(&diagram.pun)),
        (Format::Svg, Which::Pdn) => Ok(svg::to_svg(&diagram.pdn)),
        (Format::Json, Which::Both) => to_json(&diagram),
        (Format::Json, Which::Pun) => to_json(&diagram.pun),
        (Format::Json, Which::Pdn) => to_json(&diagram.pdn),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;

    // Read and classify the input
    let text = io::read_input(args.input.as_deref())?;
    let document = normalize::parse_document(&text)?;
    let not_glyph = config.not_glyph.as_deref();

    let output = match &document {
        Document::Single(raw) => {
            let network = normalize::normalize(raw, not_glyph.unwrap_or(DEFAULT_NOT_GLYPH))?;
            let diagram =
                render::render_network("Network", &network, &RailLabels::default(), &config);
            match args.format {
                Format::Svg => svg::to_svg(&diagram),
                Format::Json => to_json(&diagram)?,
                Format::Summary => format!(
                    "{network}\n{} transistors",
                    network.transistor_count()
                ),
            }
        }
        Document::Response(resp) => {
            let network = normalize::to_cmos_network(resp, not_glyph)?;
            render_pair(&args, &config, &network, Some(&resp.steps))?
        }
        Document::Pair { pun, pdn } => {
            let network = Normalizer::new(not_glyph.unwrap_or(DEFAULT_NOT_GLYPH))
                .normalize_pair(pun, pdn)?;
            render_pair(&args, &config, &network, None)?
        }
    };

    io::write_output(&output)
}
