use anyhow::{Context, Result};
use clap::Parser;
use heightmapper::config::{DEFAULT_SIZE, DEFAULT_STEP};
use heightmapper::fetch::{DEFAULT_PROFILE_URL, DEFAULT_TIMEOUT_SECS};
use heightmapper::traversal::DEFAULT_MAX_BATCH_SIZE;
use heightmapper::{FetchConfig, OutputMode, RunConfig, Traversal};
use indicatif::ProgressBar;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Download a heightmap from the Bayernatlas DGM profile service
#[derive(Parser, Debug)]
#[command(name = "heightmapper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GK4 easting of the map center
    #[arg(allow_negative_numbers = true)]
    center_x: i64,

    /// GK4 northing of the map center
    #[arg(allow_negative_numbers = true)]
    center_y: i64,

    /// Output file (raw output goes to stdout if omitted)
    output: Option<PathBuf>,

    /// Metres between samples
    #[arg(short, long = "units", value_name = "STEP", default_value_t = DEFAULT_STEP)]
    units: i64,

    /// Half extent in each direction, as X,Y
    #[arg(short, long, value_name = "X,Y", default_value_t = Size::default())]
    size: Size,

    /// Scale the result by this factor after downloading
    #[arg(short = 'x', long, value_name = "BY", default_value_t = 1.0)]
    scale: f32,

    /// Write raw numeric heights instead of an image
    #[arg(short, long)]
    raw: bool,

    /// Draw a topographic map with contour lines every SPACING metres
    #[arg(short, long, value_name = "SPACING")]
    topo: Option<f32>,

    /// Request one column at a time
    #[arg(short = 'S', long)]
    simple: bool,

    /// Maximum samples per request
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_MAX_BATCH_SIZE)]
    batch_size: usize,

    /// Profile service endpoint
    #[arg(long, env = "HEIGHTMAPPER_URL", default_value = DEFAULT_PROFILE_URL)]
    url: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Print the plan and summary without downloading
    #[arg(long)]
    dry_run: bool,

    /// Include underlying errors in batch failure warnings
    #[arg(short, long)]
    verbose: bool,
}

/// Half extent given on the command line as `X,Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Size {
    x: i64,
    y: i64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            x: DEFAULT_SIZE,
            y: DEFAULT_SIZE,
        }
    }
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid size '{}': {}", v, e))
        };
        Ok(Self {
            x: parse(x)?,
            y: parse(y)?,
        })
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Stderr writer that hides the progress bar while a log line is printed.
#[derive(Clone)]
struct ProgressWriter {
    pb: ProgressBar,
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pb.suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.pb.suspend(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for ProgressWriter {
    type Writer = ProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Cli {
    fn to_config(&self) -> RunConfig {
        // -t is kept alongside -r so validation can reject the combination
        let mode = if self.raw {
            OutputMode::Raw
        } else if self.topo.is_some() {
            OutputMode::Topographic
        } else {
            OutputMode::Image
        };
        let traversal = if self.simple {
            Traversal::PerColumn
        } else {
            Traversal::Boustrophedon
        };

        let mut config = RunConfig::new(self.center_x, self.center_y)
            .with_size(self.size.x, self.size.y)
            .with_step(self.units)
            .with_scale(self.scale)
            .with_mode(mode)
            .with_fetch(
                FetchConfig::default()
                    .with_url(&self.url)
                    .with_timeout(self.timeout)
                    .with_max_batch_size(self.batch_size)
                    .with_traversal(traversal)
                    .with_verbose(self.verbose),
            );
        if let Some(spacing) = self.topo {
            config = config.with_topo_line_spacing(spacing);
        }
        if let Some(output) = &self.output {
            config = config.with_output_path(output);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Shown once the download starts
    let pb = ProgressBar::hidden();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heightmapper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(ProgressWriter { pb: pb.clone() }))
        .init();

    let config = cli.to_config();
    config.validate().context("Invalid arguments")?;

    if cli.dry_run {
        commands::plan::run(&config)
    } else {
        commands::download::run(&config, &pb)
    }
}
