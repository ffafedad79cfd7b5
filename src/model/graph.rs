use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Label used for the site root.
pub const HOME_LABEL: &str = "Home";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read graph document: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse graph document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Graph request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Graph request returned HTTP {0}")]
    Status(u16),
    #[error("Invalid graph document: {0}")]
    Invalid(String),
}

/// A page of the site or an external destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub ext: bool,
}

impl Node {
    /// Internal page node; `path` must already be canonical.
    pub fn page(path: &str) -> Self {
        let label = if path == "/" {
            HOME_LABEL.to_string()
        } else {
            path.to_string()
        };
        Self {
            id: path.to_string(),
            label,
            ext: false,
        }
    }

    pub fn external(href: &str) -> Self {
        Self {
            id: href.to_string(),
            label: href.to_string(),
            ext: true,
        }
    }
}

/// Advisory classification of a link, used for styling and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    #[default]
    Normal,
    Tag,
    Nav,
    Asset,
    External,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkKind::Normal => "normal",
            LinkKind::Tag => "tag",
            LinkKind::Nav => "nav",
            LinkKind::Asset => "asset",
            LinkKind::External => "external",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: LinkKind,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// The `{nodes, links}` artifact shared by the extractor and the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

/// Something questionable found while validating a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentIssue {
    DuplicateNode(String),
    DanglingLink { source: String, target: String },
}

impl fmt::Display for DocumentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentIssue::DuplicateNode(id) => write!(f, "duplicate node id {}", id),
            DocumentIssue::DanglingLink { source, target } => {
                write!(f, "link {} -> {} references a missing node", source, target)
            }
        }
    }
}

impl GraphDocument {
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self { nodes, links }
    }

    /// Drops repeated node ids, keeping the first occurrence.
    pub fn dedup_nodes(&mut self) {
        let mut seen = HashSet::new();
        self.nodes.retain(|n| seen.insert(n.id.clone()));
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Parse and validate a document.
    ///
    /// Empty ids are rejected. Duplicate ids are collapsed and links whose
    /// endpoints are not nodes are removed; both are reported through
    /// `tracing` because the viewer can still render the rest.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let mut doc: GraphDocument = serde_json::from_str(json)?;

        if let Some(n) = doc.nodes.iter().find(|n| n.id.is_empty()) {
            return Err(DocumentError::Invalid(format!(
                "node with label {:?} has an empty id",
                n.label
            )));
        }

        let issues = doc.validate();
        for issue in &issues {
            tracing::warn!("graph document: {}", issue);
        }

        doc.dedup_nodes();
        let ids: HashSet<&str> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
        let links = doc
            .links
            .iter()
            .filter(|l| ids.contains(l.source.as_str()) && ids.contains(l.target.as_str()))
            .cloned()
            .collect();
        doc.links = links;

        Ok(doc)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Vec<DocumentIssue> {
        let mut issues = Vec::new();
        let mut ids = HashSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                issues.push(DocumentIssue::DuplicateNode(node.id.clone()));
            }
        }
        for link in &self.links {
            if !ids.contains(link.source.as_str()) || !ids.contains(link.target.as_str()) {
                issues.push(DocumentIssue::DanglingLink {
                    source: link.source.clone(),
                    target: link.target.clone(),
                });
            }
        }
        issues
    }
}
