use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".sitegraph.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Unknown page mode {0:?} (expected \"index\" or \"all\")")]
    PageMode(String),
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub nav: Vec<NavRule>,
    pub viewer: ViewerConfig,
}

/// Which files under the build root count as pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageMode {
    /// Only files named exactly `index.html`.
    #[default]
    Index,
    /// Every `.html` file.
    All,
}

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub pages: PageMode,
    pub asset_extensions: Vec<String>,
    pub asset_prefixes: Vec<String>,
    pub tag_prefix: String,
    pub excluded_domains: Vec<String>,
    pub include_unscanned_targets: bool,
}

/// Links to `path` count as site navigation.
///
/// With `suppress`, such links are only kept when the linking page is listed
/// in `allow_from`; kept links are classified as `nav`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRule {
    pub path: String,
    pub prefix: bool,
    pub allow_from: Vec<String>,
    pub suppress: bool,
}

impl NavRule {
    pub fn matches(&self, target: &str) -> bool {
        if target == self.path {
            return true;
        }
        if !self.prefix {
            return false;
        }
        let base = self.path.trim_end_matches('/');
        target
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn allows(&self, source: &str) -> bool {
        self.allow_from.iter().any(|s| s == source)
    }
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub section_root: String,
    pub navigable_prefix: String,
    pub default_hops: usize,
    /// Upper bound on hops a viewer request may ask for.
    pub max_hops: usize,
}

impl ViewerConfig {
    /// `requested` (or the default) limited to `max_hops`.
    pub fn clamp_hops(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_hops)
            .min(self.max_hops)
    }
}

pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    "css", "js", "mjs", "map", "json", "xml", "png", "jpg", "jpeg", "gif", "svg", "ico", "webp",
    "avif", "bmp", "woff", "woff2", "ttf", "otf", "eot", "mp4", "webm", "mov", "mp3", "wav", "ogg",
    "pdf", "txt",
];

pub const DEFAULT_ASSET_PREFIXES: &[&str] = &["/_astro/", "/images/"];

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            pages: PageMode::Index,
            asset_extensions: DEFAULT_ASSET_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            asset_prefixes: DEFAULT_ASSET_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            tag_prefix: "/tags".to_string(),
            excluded_domains: Vec::new(),
            include_unscanned_targets: true,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            section_root: "/blog".to_string(),
            navigable_prefix: "/".to_string(),
            default_hops: 2,
            max_hops: 6,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    extract: Option<RawExtract>,
    nav: Option<Vec<RawNavRule>>,
    viewer: Option<RawViewer>,
}

#[derive(Debug, Deserialize)]
struct RawExtract {
    pages: Option<String>,
    asset_extensions: Option<Vec<String>>,
    asset_prefixes: Option<Vec<String>>,
    tag_prefix: Option<String>,
    excluded_domains: Option<Vec<String>>,
    include_unscanned_targets: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawNavRule {
    path: String,
    prefix: Option<bool>,
    allow_from: Option<Vec<String>>,
    suppress: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawViewer {
    section_root: Option<String>,
    navigable_prefix: Option<String>,
    default_hops: Option<usize>,
    max_hops: Option<usize>,
}

impl Config {
    /// Load `.sitegraph.toml` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let defaults = ExtractConfig::default();
        let extract = match raw.extract {
            Some(e) => ExtractConfig {
                pages: match e.pages.as_deref() {
                    None | Some("index") => PageMode::Index,
                    Some("all") => PageMode::All,
                    Some(other) => return Err(ConfigError::PageMode(other.to_string())),
                },
                asset_extensions: e
                    .asset_extensions
                    .map(|exts| {
                        exts.into_iter()
                            .map(|x| x.trim_start_matches('.').to_lowercase())
                            .collect()
                    })
                    .unwrap_or(defaults.asset_extensions),
                asset_prefixes: e.asset_prefixes.unwrap_or(defaults.asset_prefixes),
                tag_prefix: e.tag_prefix.unwrap_or(defaults.tag_prefix),
                excluded_domains: e
                    .excluded_domains
                    .map(|d| d.into_iter().map(|x| x.to_lowercase()).collect())
                    .unwrap_or_default(),
                include_unscanned_targets: e
                    .include_unscanned_targets
                    .unwrap_or(defaults.include_unscanned_targets),
            },
            None => defaults,
        };

        let nav = raw
            .nav
            .unwrap_or_default()
            .into_iter()
            .map(|r| NavRule {
                path: r.path,
                prefix: r.prefix.unwrap_or(false),
                allow_from: r.allow_from.unwrap_or_default(),
                suppress: r.suppress.unwrap_or(true),
            })
            .collect();

        let viewer_defaults = ViewerConfig::default();
        let viewer = match raw.viewer {
            Some(v) => ViewerConfig {
                section_root: v.section_root.unwrap_or(viewer_defaults.section_root),
                navigable_prefix: v
                    .navigable_prefix
                    .unwrap_or(viewer_defaults.navigable_prefix),
                default_hops: v.default_hops.unwrap_or(viewer_defaults.default_hops),
                max_hops: v.max_hops.unwrap_or(viewer_defaults.max_hops),
            },
            None => viewer_defaults,
        };

        Ok(Self {
            extract,
            nav,
            viewer,
        })
    }
}

/// Starter configuration written by `sitegraph init`.
pub fn generate_config_template() -> String {
    r#"# sitegraph configuration

[extract]
# "index" scans only index.html files, "all" scans every .html file
pages = "index"
asset_prefixes = ["/_astro/", "/images/"]
tag_prefix = "/tags"
# External hosts that never become nodes (subdomains included)
excluded_domains = ["fonts.googleapis.com", "www.googletagmanager.com"]
# Give internal link targets that were not scanned their own node
include_unscanned_targets = true

# Site-wide navigation links saturate the graph with hub edges.
# Only the listed pages keep their links to these targets.
[[nav]]
path = "/"
allow_from = ["/portfolio", "/blog", "/my-journey"]

[[nav]]
path = "/blog"
allow_from = ["/tags"]

[viewer]
section_root = "/blog"
# Clicking a node only navigates when its id starts with this prefix
navigable_prefix = "/blog/"
default_hops = 2
# Larger hop requests are clamped to this
max_hops = 6
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extract.pages, PageMode::Index);
        assert!(config.extract.asset_extensions.contains(&"png".to_string()));
        assert!(config.nav.is_empty());
        assert_eq!(config.viewer.section_root, "/blog");
    }

    #[test]
    fn test_template_parses() {
        let config = Config::parse(&generate_config_template()).unwrap();
        assert_eq!(config.nav.len(), 2);
        assert!(config.nav[0].suppress);
        assert!(config.nav[0].allows("/portfolio"));
        assert!(!config.nav[0].allows("/blog/post"));
        assert_eq!(config.viewer.navigable_prefix, "/blog/");
        assert_eq!(config.extract.excluded_domains.len(), 2);
    }

    #[test]
    fn test_partial_extract_keeps_defaults() {
        let config = Config::parse("[extract]\npages = \"all\"\n").unwrap();
        assert_eq!(config.extract.pages, PageMode::All);
        assert_eq!(config.extract.tag_prefix, "/tags");
        assert!(!config.extract.asset_prefixes.is_empty());
    }

    #[test]
    fn test_hops_clamped_to_max() {
        let config = Config::parse("[viewer]\ndefault_hops = 3\nmax_hops = 4\n").unwrap();
        assert_eq!(config.viewer.clamp_hops(None), 3);
        assert_eq!(config.viewer.clamp_hops(Some(1)), 1);
        assert_eq!(config.viewer.clamp_hops(Some(1000)), 4);
        assert_eq!(ViewerConfig::default().max_hops, 6);
    }

    #[test]
    fn test_bad_page_mode() {
        let err = Config::parse("[extract]\npages = \"some\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::PageMode(_)));
    }

    #[test]
    fn test_nav_rule_prefix() {
        let rule = NavRule {
            path: "/about".to_string(),
            prefix: true,
            allow_from: vec![],
            suppress: false,
        };
        assert!(rule.matches("/about"));
        assert!(rule.matches("/about/team"));
        assert!(!rule.matches("/aboutness"));
    }
}
