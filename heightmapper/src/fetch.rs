//! Downloading a height grid from the profile service.
//!
//! [`HeightFetcher`] walks a [`BatchPlan`], posts one request per batch and
//! reconciles each answer into a [`HeightGrid`] before building the next
//! batch. A failed batch is logged and skipped; its cells keep their value.
//!
//! The HTTP layer sits behind the [`Transport`] trait. [`HttpTransport`]
//! (feature `http`) implements it with a blocking `reqwest` client.

use std::fmt;

use tracing::{debug, info, warn};

use crate::batch::{reconcile, Batch, Reconciliation};
use crate::coords::GridMapper;
use crate::error::{HeightmapError, Result};
use crate::grid::HeightGrid;
use crate::traversal::{BatchPlan, Traversal, DEFAULT_MAX_BATCH_SIZE};
use crate::wire::GridResponse;

/// Bayernatlas DGM profile endpoint.
pub const DEFAULT_PROFILE_URL: &str = "https://geoportal.bayern.de/ba-backend/dgm/profile/";

/// Default timeout for a single batch request in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a JSON body to a URL with `POST`.
///
/// Implementations return every HTTP answer as a [`TransportResponse`],
/// whatever its status; [`HeightFetcher`] decides what counts as success.
pub trait Transport {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse> {
        (**self).post(url, body)
    }
}

/// Configuration for downloading a grid.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Profile service endpoint.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum samples per request (boustrophedon traversal only).
    pub max_batch_size: usize,
    /// Order in which cells are requested.
    pub traversal: Traversal,
    /// Include the underlying error in batch failure warnings.
    pub verbose: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PROFILE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            traversal: Traversal::default(),
            verbose: false,
        }
    }
}

impl FetchConfig {
    /// Set the service endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the maximum number of samples per request.
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Batch plan for a `width × height` grid.
    pub fn plan(&self, width: usize, height: usize) -> BatchPlan {
        BatchPlan::new(width, height, self.traversal, self.max_batch_size)
    }
}

/// Progress event emitted after each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based number of the batch just processed.
    pub number: usize,
    /// Total number of batches.
    pub total: usize,
    pub traversal: Traversal,
    /// Whether the batch produced usable data.
    pub succeeded: bool,
}

impl fmt::Display for BatchProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.traversal {
            Traversal::Boustrophedon => "batch",
            Traversal::PerColumn => "line",
        };
        write!(f, "Processing {} {} of {}", unit, self.number, self.total)
    }
}

/// Outcome of a download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Number of batches sent.
    pub batches: usize,
    /// Batches whose request or response failed.
    pub failed_batches: usize,
    /// Samples written into the grid.
    pub samples_written: usize,
}

/// Downloads height grids batch by batch.
pub struct HeightFetcher<T> {
    transport: T,
    config: FetchConfig,
}

impl<T: Transport> HeightFetcher<T> {
    pub fn new(transport: T, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fill `grid` with samples for the area described by `mapper`.
    ///
    /// Batches run strictly in order. `on_progress` is called after every
    /// batch, including failed ones.
    ///
    /// A batch fails when the transport errors, when the status is not 2xx
    /// (the body is then discarded unparsed, even if it holds heights) or
    /// when the body is not a valid response. Its cells keep their value.
    pub fn fetch(
        &self,
        mapper: &GridMapper,
        grid: &mut HeightGrid,
        mut on_progress: impl FnMut(&BatchProgress),
    ) -> FetchReport {
        let plan = self.config.plan(grid.width(), grid.height());
        let policy = Reconciliation::from(self.config.traversal);
        let total = plan.len();
        let mut report = FetchReport::default();

        info!(
            batches = total,
            traversal = %self.config.traversal,
            "Downloading {}x{} grid",
            grid.width(),
            grid.height()
        );

        for (index, positions) in plan.iter().enumerate() {
            let batch = Batch::new(index + 1, positions, mapper);
            let succeeded = match self.fetch_batch(&batch) {
                Ok(response) => {
                    let written = reconcile(&batch, &response, policy, grid);
                    debug!(
                        batch = batch.number,
                        requested = batch.len(),
                        received = response.records().len(),
                        written,
                        "Batch reconciled"
                    );
                    report.samples_written += written;
                    true
                }
                Err(e) => {
                    if self.config.verbose {
                        warn!("Batch {} of {} failed: {}", batch.number, total, e);
                    } else {
                        warn!(
                            "Batch {} of {} failed, its samples are left at 0",
                            batch.number, total
                        );
                    }
                    report.failed_batches += 1;
                    false
                }
            };
            report.batches += 1;

            on_progress(&BatchProgress {
                number: batch.number,
                total,
                traversal: self.config.traversal,
                succeeded,
            });
        }

        report
    }

    /// Send one batch and decode the answer.
    fn fetch_batch(&self, batch: &Batch) -> Result<GridResponse> {
        let body = batch
            .request()
            .to_json()
            .map_err(|e| HeightmapError::RequestFailed {
                batch: batch.number,
                reason: format!("Failed to encode request: {}", e),
            })?;

        let response = self
            .transport
            .post(&self.config.url, body)
            .map_err(|e| HeightmapError::RequestFailed {
                batch: batch.number,
                reason: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(HeightmapError::RequestFailed {
                batch: batch.number,
                reason: format!("HTTP {}", response.status),
            });
        }

        GridResponse::from_slice(&response.body).map_err(|e| HeightmapError::MalformedResponse {
            batch: batch.number,
            reason: e.to_string(),
        })
    }
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a transport whose requests time out after `timeout_secs`.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Create a transport using the timeout from `config`.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Self::new(config.timeout_secs)
    }
}

#[cfg(feature = "http")]
impl Transport for HttpTransport {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(TransportResponse { status, body })
    }
}
