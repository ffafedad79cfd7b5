//! Clean library API for sitegraph.
//!
//! This module provides a programmatic interface for using sitegraph as a Rust library.
//! Unlike the CLI commands which print output and return exit codes, these functions
//! return proper Result types that can be handled by calling code.
//!
//! # Example
//!
//! ```no_run
//! use sitegraph::{generate, neighborhood_of, GenerateOptions, NeighborhoodOptions};
//! use std::path::Path;
//!
//! let extraction = generate(
//!     Path::new("dist"),
//!     Path::new("public/graph.json"),
//!     GenerateOptions::default(),
//! )?;
//! let hood = neighborhood_of(extraction.document, "/blog/", &NeighborhoodOptions::default());
//! println!("{} pages within reach", hood.nodes.len());
//! # Ok::<(), sitegraph::SitegraphError>(())
//! ```

use crate::config::{Config, ConfigError, PageMode, ViewerConfig};
use crate::extract::{ExtractError, Extraction, Extractor, write_document};
use crate::fs::default_fs;
use crate::graph::layout::{DEFAULT_MAX_TICKS, LayoutSnapshot, Viewport, settle};
use crate::graph::{GraphSource, LinkGraph, Neighborhood, neighborhood, resolve_start};
use crate::model::{DocumentError, GraphDocument};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during sitegraph operations.
#[derive(Debug, Error)]
pub enum SitegraphError {
    /// The build output directory does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Walking, reading, or writing during extraction failed.
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// The graph document could not be loaded.
    #[error("Graph document error: {0}")]
    Document(#[from] DocumentError),
}

/// Options for `extract_site` and `generate`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Configuration to use. When `None`, `.sitegraph.toml` is read from the
    /// working directory and a malformed file is an error.
    pub config: Option<Config>,

    /// Scan every `.html` file rather than only `index.html` pages.
    pub all_pages: bool,
}

impl GenerateOptions {
    fn resolve_config(self) -> Result<Config, SitegraphError> {
        let mut config = match self.config {
            Some(c) => c,
            None => Config::load(Path::new("."))?,
        };
        if self.all_pages {
            config.extract.pages = PageMode::All;
        }
        Ok(config)
    }
}

/// Options for neighborhood and layout queries.
#[derive(Debug, Clone)]
pub struct NeighborhoodOptions {
    /// Hop limit.
    pub hops: usize,

    /// Section prefix tried when a location doesn't match a node directly.
    pub section_root: String,
}

impl Default for NeighborhoodOptions {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for NeighborhoodOptions {
    fn from(viewer: &ViewerConfig) -> Self {
        Self {
            hops: viewer.default_hops,
            section_root: viewer.section_root.clone(),
        }
    }
}

/// Extract the link graph of a build output directory without writing it.
pub fn extract_site(dist: &Path, options: GenerateOptions) -> Result<Extraction, SitegraphError> {
    if !dist.is_dir() {
        return Err(SitegraphError::PathNotFound(dist.to_path_buf()));
    }
    let config = options.resolve_config()?;
    Ok(Extractor::new(&config).extract(dist)?)
}

/// Extract the link graph of `dist` and write it to `out` as pretty JSON,
/// creating the parent directory when needed.
pub fn generate(
    dist: &Path,
    out: &Path,
    options: GenerateOptions,
) -> Result<Extraction, SitegraphError> {
    let extraction = extract_site(dist, options)?;
    write_document(&extraction.document, out, default_fs())?;
    Ok(extraction)
}

/// Load and validate a graph document from a path or an http(s) URL.
pub async fn load_graph(location: &str) -> Result<GraphDocument, SitegraphError> {
    Ok(GraphSource::parse(location).fetch().await?)
}

/// Pages within `options.hops` of the node matching `location`. An
/// unmatched location gives an empty neighborhood.
pub fn neighborhood_of(
    document: GraphDocument,
    location: &str,
    options: &NeighborhoodOptions,
) -> Neighborhood {
    let graph = LinkGraph::build(document);
    match resolve_start(&graph, location, &options.section_root) {
        Some(start) => neighborhood(&graph, start, options.hops),
        None => Neighborhood::empty(options.hops),
    }
}

/// Settled layout of the neighborhood around `location`.
pub fn layout_of(
    document: GraphDocument,
    location: &str,
    options: &NeighborhoodOptions,
    viewport: Viewport,
) -> LayoutSnapshot {
    let hood = neighborhood_of(document, location, options);
    settle(&hood, viewport, DEFAULT_MAX_TICKS)
}
