use crate::config::{ExtractConfig, NavRule};
use crate::model::LinkKind;
use url::Url;

/// What a raw href turned out to be, before any per-page policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Href {
    External(String),
    /// Canonical internal path.
    Internal(String),
    Asset,
    Ignored,
}

/// Outcome of running a page's href through the link policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Edge {
        target: String,
        kind: LinkKind,
    },
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Asset,
    Ignored,
    ExcludedDomain,
    SelfLoop,
    NavSuppressed,
}

pub struct Classifier<'a> {
    config: &'a ExtractConfig,
    nav: &'a [NavRule],
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a ExtractConfig, nav: &'a [NavRule]) -> Self {
        Self { config, nav }
    }

    /// Classify `raw` as found on the page at canonical path `page`.
    ///
    /// Asset rules run first so that `/logo.png` or a CDN image never turns
    /// into an internal or external node.
    pub fn parse(&self, page: &str, raw: &str) -> Href {
        let href = strip_fragment(raw.trim());
        if href.is_empty() {
            return Href::Ignored;
        }

        let lower = href.to_ascii_lowercase();
        let is_web = lower.starts_with("http://") || lower.starts_with("https://");
        let is_mail = lower.starts_with("mailto:");

        if !is_mail {
            let path = if is_web {
                Url::parse(href)
                    .map(|u| u.path().to_string())
                    .unwrap_or_default()
            } else {
                strip_query(href).to_string()
            };
            if self.has_asset_extension(&path) {
                return Href::Asset;
            }
            if !is_web && self.has_asset_prefix(&path) {
                return Href::Asset;
            }
        }

        if is_web || is_mail {
            return Href::External(href.to_string());
        }

        if href.starts_with("//") {
            return Href::Ignored;
        }

        if href.starts_with('/') {
            return Href::Internal(canonical_internal(strip_query(href)));
        }

        if href.starts_with("./") || href.starts_with("../") {
            let resolved = resolve_relative(page, strip_query(href));
            return Href::Internal(canonical_internal(&resolved));
        }

        Href::Ignored
    }

    /// Full policy for one href on `page`: classification, domain exclusion,
    /// self-loop removal and navigation rules.
    pub fn decide(&self, page: &str, raw: &str) -> Decision {
        match self.parse(page, raw) {
            Href::Asset => Decision::Skip(SkipReason::Asset),
            Href::Ignored => Decision::Skip(SkipReason::Ignored),
            Href::External(href) => {
                if self.is_excluded_domain(&href) {
                    Decision::Skip(SkipReason::ExcludedDomain)
                } else {
                    Decision::Edge {
                        target: href,
                        kind: LinkKind::External,
                    }
                }
            }
            Href::Internal(target) => {
                if target == page {
                    return Decision::Skip(SkipReason::SelfLoop);
                }
                match self.internal_kind(page, &target) {
                    Some(kind) => Decision::Edge { target, kind },
                    None => Decision::Skip(SkipReason::NavSuppressed),
                }
            }
        }
    }

    /// `None` when a navigation rule suppresses the link.
    fn internal_kind(&self, source: &str, target: &str) -> Option<LinkKind> {
        if let Some(rule) = self.nav.iter().find(|r| r.matches(target)) {
            if rule.suppress && !rule.allows(source) {
                return None;
            }
            return Some(LinkKind::Nav);
        }

        let tag = self.config.tag_prefix.trim_end_matches('/');
        if !tag.is_empty()
            && target
                .strip_prefix(tag)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        {
            return Some(LinkKind::Tag);
        }

        // Relative hrefs only reveal an asset location after resolution.
        if self.has_asset_prefix(target) || self.has_asset_extension(target) {
            return Some(LinkKind::Asset);
        }

        Some(LinkKind::Normal)
    }

    fn has_asset_extension(&self, path: &str) -> bool {
        let last = path.rsplit('/').next().unwrap_or(path);
        match last.rsplit_once('.') {
            Some((_, ext)) => {
                let ext = ext.to_ascii_lowercase();
                self.config.asset_extensions.iter().any(|e| *e == ext)
            }
            _ => false,
        }
    }

    fn has_asset_prefix(&self, path: &str) -> bool {
        self.config
            .asset_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn is_excluded_domain(&self, href: &str) -> bool {
        if self.config.excluded_domains.is_empty() {
            return false;
        }
        let Some(host) = external_host(href) else {
            return false;
        };
        self.config
            .excluded_domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    }
}

fn external_host(href: &str) -> Option<String> {
    let lower = href.to_ascii_lowercase();
    if let Some(address) = lower.strip_prefix("mailto:") {
        return strip_query(address)
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_ascii_lowercase());
    }
    Url::parse(href)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

fn strip_fragment(href: &str) -> &str {
    href.split_once('#').map_or(href, |(before, _)| before)
}

fn strip_query(href: &str) -> &str {
    href.split_once('?').map_or(href, |(before, _)| before)
}

/// Site path with dot segments folded, suffixes normalized and percent
/// escapes decoded, so it matches the id of the page file it points at.
fn canonical_internal(path: &str) -> String {
    let folded = normalize_internal(&resolve_relative("/", path));
    match urlencoding::decode(&folded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => folded,
    }
}

/// Trailing slash removed (bare `/` kept); `index.html` and `.html`
/// suffixes collapse onto the page's canonical path.
pub fn normalize_internal(path: &str) -> String {
    let mut path = path;
    if let Some(dir) = path.strip_suffix("index.html") {
        if dir.ends_with('/') {
            path = dir;
        }
    } else if let Some(stem) = path.strip_suffix(".html") {
        if !stem.ends_with('/') {
            path = stem;
        }
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Resolve `./` and `../` hrefs the way a browser resolves them against a
/// document URL: the last segment of `page` is replaced, `..` stops at `/`.
pub fn resolve_relative(page: &str, href: &str) -> String {
    let mut segments: Vec<&str> = page.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop();

    for part in href.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    format!("/{}", segments.join("/"))
}
