mod classify;
mod href;
mod page;

pub use classify::{Classifier, Decision, Href, SkipReason, normalize_internal, resolve_relative};
pub use href::HrefScanner;
pub use page::{canonical_path, is_page_file};

use crate::config::Config;
use crate::fs::{FileSystem, default_fs};
use crate::model::{GraphDocument, Link, LinkKind, Node};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Build directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Failed to walk build directory: {0}")]
    Walk(#[from] ignore::Error),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Not valid UTF-8: {0}")]
    Encoding(PathBuf),
    #[error("Failed to serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Counters for hrefs that did not become edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub pages: usize,
    pub hrefs: usize,
    pub assets: usize,
    pub ignored: usize,
    pub excluded: usize,
    pub self_loops: usize,
    pub nav_suppressed: usize,
}

impl ExtractStats {
    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Asset => self.assets += 1,
            SkipReason::Ignored => self.ignored += 1,
            SkipReason::ExcludedDomain => self.excluded += 1,
            SkipReason::SelfLoop => self.self_loops += 1,
            SkipReason::NavSuppressed => self.nav_suppressed += 1,
        }
    }

    fn merge(&mut self, other: &ExtractStats) {
        self.pages += other.pages;
        self.hrefs += other.hrefs;
        self.assets += other.assets;
        self.ignored += other.ignored;
        self.excluded += other.excluded;
        self.self_loops += other.self_loops;
        self.nav_suppressed += other.nav_suppressed;
    }
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub document: GraphDocument,
    pub stats: ExtractStats,
}

/// Everything one page contributes, built independently of other pages.
#[derive(Debug, Default)]
struct PageScan {
    nodes: Vec<Node>,
    links: Vec<Link>,
    stats: ExtractStats,
}

pub struct Extractor<'a> {
    config: &'a Config,
    fs: &'a dyn FileSystem,
    scanner: HrefScanner,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self::with_fs(config, default_fs())
    }

    pub fn with_fs(config: &'a Config, fs: &'a dyn FileSystem) -> Self {
        Self {
            config,
            fs,
            scanner: HrefScanner::new(),
        }
    }

    /// All page files under `root`, sorted so repeated runs agree.
    pub fn discover_pages(&self, root: &Path) -> Result<Vec<PathBuf>, ExtractError> {
        if !root.is_dir() {
            return Err(ExtractError::RootNotFound(root.to_path_buf()));
        }

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .build();

        let mut pages = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if is_page_file(name, self.config.extract.pages) {
                pages.push(entry.into_path());
            }
        }

        pages.sort();
        Ok(pages)
    }

    pub fn extract(&self, root: &Path) -> Result<Extraction, ExtractError> {
        let pages = self.discover_pages(root)?;
        info!("Scanning {} pages under {}", pages.len(), root.display());

        let scans = pages
            .par_iter()
            .map(|file| self.scan_page(root, file))
            .collect::<Result<Vec<_>, _>>()?;

        let mut nodes = Vec::new();
        let mut links = Vec::new();
        let mut stats = ExtractStats::default();
        for scan in scans {
            nodes.extend(scan.nodes);
            links.extend(scan.links);
            stats.merge(&scan.stats);
        }

        let mut document = GraphDocument::new(nodes, links);
        document.dedup_nodes();

        info!(
            "Extracted {} nodes and {} links ({} assets, {} nav links suppressed)",
            document.nodes.len(),
            document.links.len(),
            stats.assets,
            stats.nav_suppressed
        );

        Ok(Extraction { document, stats })
    }

    fn scan_page(&self, root: &Path, file: &Path) -> Result<PageScan, ExtractError> {
        let page_path =
            canonical_path(root, file).ok_or_else(|| ExtractError::Encoding(file.to_path_buf()))?;

        let html = self.fs.read_to_string(file).map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                ExtractError::Encoding(file.to_path_buf())
            } else {
                ExtractError::Read {
                    path: file.to_path_buf(),
                    source: e,
                }
            }
        })?;

        Ok(self.scan_html(&page_path, &html))
    }

    fn scan_html(&self, page_path: &str, html: &str) -> PageScan {
        let classifier = Classifier::new(&self.config.extract, &self.config.nav);
        let mut scan = PageScan::default();
        scan.stats.pages = 1;
        scan.nodes.push(Node::page(page_path));

        for href in self.scanner.scan(html) {
            scan.stats.hrefs += 1;
            match classifier.decide(page_path, &href) {
                Decision::Edge { target, kind } => {
                    match kind {
                        LinkKind::External => scan.nodes.push(Node::external(&target)),
                        LinkKind::Asset => {}
                        _ if self.config.extract.include_unscanned_targets => {
                            scan.nodes.push(Node::page(&target))
                        }
                        _ => {}
                    }
                    scan.links.push(Link::new(page_path, target, kind));
                }
                Decision::Skip(reason) => {
                    debug!("{}: skipping {:?} ({:?})", page_path, href, reason);
                    scan.stats.record(reason);
                }
            }
        }

        scan
    }
}

/// Serialize `document` as 2-space pretty JSON at `out`, creating the
/// parent directory when missing.
pub fn write_document(
    document: &GraphDocument,
    out: &Path,
    fs: &dyn FileSystem,
) -> Result<(), ExtractError> {
    let json = document.to_json_pretty()?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !fs.exists(parent) {
            fs.create_dir_all(parent).map_err(|e| ExtractError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs.write(out, &json).map_err(|e| ExtractError::Write {
        path: out.to_path_buf(),
        source: e,
    })
}
