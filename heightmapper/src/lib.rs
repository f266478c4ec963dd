//! # heightmapper - Bayernatlas heightmap downloader
//!
//! Downloads a rectangular grid of terrain heights from the Bayernatlas DGM
//! profile service and renders it as raw numbers, a grayscale heightmap or a
//! colored topographic map with contour lines.
//!
//! ## How it works
//!
//! The service answers "profile" queries: it takes a `LineString` of GK4
//! coordinates and returns one height per point. A grid of `width × height`
//! samples is therefore sent as a sequence of line strings:
//!
//! - **Boustrophedon** (default): a single snake through every column, cut
//!   into requests of at most 5000 points.
//! - **Per-column**: one request per column, for servers that reject long
//!   snakes.
//!
//! Requests run one after another. A failed request is logged and its cells
//! stay at 0, which the renderers treat as "no data".
//!
//! ## Quick Start
//!
//! ```ignore
//! use heightmapper::{fetch::HttpTransport, run, OutputMode, RunConfig};
//!
//! let config = RunConfig::new(4_468_000, 5_333_000)
//!     .with_size(2000, 2000)
//!     .with_mode(OutputMode::Topographic)
//!     .with_topo_line_spacing(20.0)
//!     .with_output_path("zugspitze.png");
//!
//! let transport = HttpTransport::from_config(&config.fetch)?;
//! let output = run(&config, transport, |p| println!("{}", p))?;
//! output.artifact.write_to(config.output_path.as_deref())?;
//! println!("{}", output.summary);
//! ```
//!
//! ## Features
//!
//! - `http`: [`fetch::HttpTransport`], a blocking `reqwest` transport.

pub mod batch;
pub mod color;
pub mod config;
pub mod contour;
pub mod coords;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod render;
pub mod resample;
mod run;
pub mod summary;
pub mod traversal;
pub mod wire;

// Re-export main types at crate root for convenience
pub use config::{OutputMode, RunConfig};
pub use error::{HeightmapError, Result};
pub use fetch::{BatchProgress, FetchConfig, FetchReport, HeightFetcher, Transport};
pub use grid::{GridPosition, HeightGrid, NO_DATA_THRESHOLD};
pub use render::{Artifact, NumberFormat, Renderer};
pub use run::{run, RunOutput};
pub use summary::RunSummary;
pub use traversal::Traversal;
