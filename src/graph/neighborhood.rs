use super::index::LinkGraph;
use crate::model::{GraphDocument, Link, Node};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Induced subgraph within a hop limit of a start node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighborhood {
    pub start: Option<String>,
    pub hops: usize,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    /// Undirected distance of every node from `start`.
    pub distances: BTreeMap<String, usize>,
}

impl Neighborhood {
    pub fn empty(hops: usize) -> Self {
        Self {
            start: None,
            hops,
            nodes: Vec::new(),
            links: Vec::new(),
            distances: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn distance(&self, id: &str) -> Option<usize> {
        self.distances.get(id).copied()
    }

    /// Nodes grouped by distance; index 0 holds the start node.
    pub fn by_distance(&self) -> Vec<Vec<&Node>> {
        let max = self.distances.values().copied().max();
        let Some(max) = max else {
            return Vec::new();
        };
        let mut levels: Vec<Vec<&Node>> = vec![Vec::new(); max + 1];
        for node in &self.nodes {
            if let Some(d) = self.distance(&node.id) {
                levels[d].push(node);
            }
        }
        for level in &mut levels {
            level.sort_by(|a, b| a.id.cmp(&b.id));
        }
        levels
    }

    pub fn into_document(self) -> GraphDocument {
        GraphDocument::new(self.nodes, self.links)
    }
}

/// Everything within `hops` undirected steps of `start`.
///
/// Nodes keep their document order and links are the original links whose
/// endpoints both fall inside. An unknown `start` gives an empty result.
pub fn neighborhood(graph: &LinkGraph, start: &str, hops: usize) -> Neighborhood {
    if !graph.contains(start) {
        return Neighborhood::empty(hops);
    }

    let mut distances: HashMap<&str, usize> = HashMap::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    distances.insert(start, 0);
    queue.push_back((start, 0));

    while let Some((id, depth)) = queue.pop_front() {
        if depth >= hops {
            continue;
        }
        for next in graph.neighbors(id) {
            if !distances.contains_key(next) {
                distances.insert(next, depth + 1);
                queue.push_back((next, depth + 1));
            }
        }
    }

    let doc = graph.document();
    let mut nodes = Vec::new();
    for node in &doc.nodes {
        if distances.contains_key(node.id.as_str()) && !nodes.iter().any(|n: &Node| n.id == node.id)
        {
            nodes.push(node.clone());
        }
    }

    let links = doc
        .links
        .iter()
        .filter(|l| {
            distances.contains_key(l.source.as_str()) && distances.contains_key(l.target.as_str())
        })
        .cloned()
        .collect();

    Neighborhood {
        start: Some(start.to_string()),
        hops,
        nodes,
        links,
        distances: distances
            .into_iter()
            .map(|(id, d)| (id.to_string(), d))
            .collect(),
    }
}

/// Match a browsing location to a node id.
///
/// Tried in order: the exact location, the location without a trailing
/// slash, the location under `section_root`, then the first node whose id
/// contains the location (without its leading slash).
pub fn resolve_start<'g>(graph: &'g LinkGraph, location: &str, section_root: &str) -> Option<&'g str> {
    let doc = graph.document();
    let find = |candidate: &str| {
        doc.nodes
            .iter()
            .find(|n| n.id == candidate)
            .map(|n| n.id.as_str())
    };

    if let Some(id) = find(location) {
        return Some(id);
    }

    let stripped = strip_trailing_slash(location);
    if let Some(id) = find(stripped) {
        return Some(id);
    }

    let root = section_root.trim_end_matches('/');
    if !root.is_empty() {
        let under_root = if stripped.starts_with(&format!("{}/", root)) || stripped == root {
            stripped.to_string()
        } else if stripped == "/" {
            root.to_string()
        } else {
            format!("{}{}", root, stripped)
        };
        if let Some(id) = find(&under_root) {
            return Some(id);
        }
    }

    let needle = stripped.trim_start_matches('/');
    if needle.is_empty() {
        return None;
    }
    doc.nodes
        .iter()
        .find(|n| n.id.contains(needle))
        .map(|n| n.id.as_str())
}

fn strip_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Format a neighborhood as markdown
pub fn format_neighborhood_markdown(hood: &Neighborhood, location: &str) -> String {
    let mut output = String::new();

    let Some(start) = &hood.start else {
        output.push_str(&format!("# Neighborhood: {}\n\n", location));
        output.push_str(&format!("*No page matches `{}`.*\n", location));
        return output;
    };

    output.push_str(&format!(
        "# Neighborhood: {} ({} hop{})\n\n",
        start,
        hood.hops,
        if hood.hops == 1 { "" } else { "s" }
    ));

    output.push_str("## Summary\n\n");
    output.push_str(&format!("- **Pages**: {}\n", hood.nodes.len()));
    output.push_str(&format!("- **Links**: {}\n\n", hood.links.len()));

    output.push_str("## Pages by Distance\n\n");
    for (depth, nodes) in hood.by_distance().iter().enumerate() {
        let label = match depth {
            0 => "Start".to_string(),
            1 => "Direct Neighbors".to_string(),
            d => format!("Distance {}", d),
        };
        output.push_str(&format!("### {} ({})\n\n", label, nodes.len()));
        for node in nodes {
            if node.ext {
                output.push_str(&format!("- `{}` *(external)*\n", node.id));
            } else {
                output.push_str(&format!("- `{}`\n", node.id));
            }
        }
        output.push('\n');
    }

    if !hood.links.is_empty() {
        output.push_str("## Links\n\n");
        for link in &hood.links {
            output.push_str(&format!(
                "- `{}` → `{}` ({})\n",
                link.source, link.target, link.kind
            ));
        }
    }

    output
}

/// Format a neighborhood as JSON
pub fn format_neighborhood_json(hood: &Neighborhood, location: &str) -> String {
    use serde_json::json;

    let by_distance: Vec<_> = hood
        .by_distance()
        .iter()
        .enumerate()
        .map(|(depth, nodes)| {
            let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
            json!({
                "distance": depth,
                "nodes": ids
            })
        })
        .collect();

    let output = json!({
        "location": location,
        "start": hood.start,
        "hops": hood.hops,
        "summary": {
            "nodes": hood.nodes.len(),
            "links": hood.links.len()
        },
        "by_distance": by_distance,
        "nodes": hood.nodes,
        "links": hood.links
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinkKind;
    use std::collections::HashSet;

    fn scenario() -> LinkGraph {
        LinkGraph::build(GraphDocument::new(
            vec![
                Node::page("/"),
                Node::page("/blog"),
                Node::page("/blog/post-a"),
                Node::external("https://example.com"),
            ],
            vec![
                Link::new("/", "/blog", LinkKind::Normal),
                Link::new("/blog", "/blog/post-a", LinkKind::Normal),
                Link::new("/blog", "https://example.com", LinkKind::External),
            ],
        ))
    }

    fn chain(len: usize) -> LinkGraph {
        let nodes = (0..len).map(|i| Node::page(&format!("/n{}", i))).collect();
        let links = (1..len)
            .map(|i| Link::new(format!("/n{}", i), format!("/n{}", i - 1), LinkKind::Normal))
            .collect();
        LinkGraph::build(GraphDocument::new(nodes, links))
    }

    fn ids(hood: &Neighborhood) -> HashSet<&str> {
        hood.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_one_hop_from_blog() {
        let hood = neighborhood(&scenario(), "/blog", 1);
        assert_eq!(
            ids(&hood),
            HashSet::from(["/blog", "/", "/blog/post-a", "https://example.com"])
        );
        assert_eq!(hood.links.len(), 3);
    }

    #[test]
    fn test_zero_hops() {
        let hood = neighborhood(&scenario(), "/blog", 0);
        assert_eq!(ids(&hood), HashSet::from(["/blog"]));
        assert!(hood.links.is_empty());
        assert_eq!(hood.distance("/blog"), Some(0));
    }

    #[test]
    fn test_absent_start() {
        let hood = neighborhood(&scenario(), "/nowhere", 3);
        assert!(hood.is_empty());
        assert!(hood.links.is_empty());
        assert_eq!(hood.start, None);
    }

    #[test]
    fn test_direction_ignored() {
        // Links point from n(i) to n(i-1); traversal from n0 still reaches n2.
        let hood = neighborhood(&chain(5), "/n0", 2);
        assert_eq!(ids(&hood), HashSet::from(["/n0", "/n1", "/n2"]));
        assert_eq!(hood.distance("/n2"), Some(2));
        assert_eq!(hood.links.len(), 2);
    }

    #[test]
    fn test_distances_are_shortest() {
        let graph = LinkGraph::build(GraphDocument::new(
            vec![Node::page("/a"), Node::page("/b"), Node::page("/c"), Node::page("/d")],
            vec![
                Link::new("/a", "/b", LinkKind::Normal),
                Link::new("/b", "/c", LinkKind::Normal),
                Link::new("/c", "/d", LinkKind::Normal),
                Link::new("/a", "/d", LinkKind::Normal),
            ],
        ));
        let hood = neighborhood(&graph, "/a", 5);
        assert_eq!(hood.distance("/d"), Some(1));
        assert_eq!(hood.distance("/c"), Some(2));
        let hood = neighborhood(&graph, "/a", 1);
        assert_eq!(ids(&hood), HashSet::from(["/a", "/b", "/d"]));
        // /b -> /c and /c -> /d leave the set.
        assert_eq!(hood.links.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let graph = chain(8);
        let first = neighborhood(&graph, "/n3", 2);
        let second = neighborhood(&graph, "/n3", 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_links_kept() {
        let graph = LinkGraph::build(GraphDocument::new(
            vec![Node::page("/a"), Node::page("/b")],
            vec![
                Link::new("/a", "/b", LinkKind::Normal),
                Link::new("/a", "/b", LinkKind::Normal),
            ],
        ));
        assert_eq!(neighborhood(&graph, "/b", 1).links.len(), 2);
    }

    #[test]
    fn test_resolve_start_chain() {
        let graph = scenario();
        assert_eq!(resolve_start(&graph, "/blog", "/blog"), Some("/blog"));
        assert_eq!(resolve_start(&graph, "/blog/", "/blog"), Some("/blog"));
        assert_eq!(resolve_start(&graph, "/post-a/", "/blog"), Some("/blog/post-a"));
        assert_eq!(resolve_start(&graph, "/en/post-a", "/blog"), None);
        assert_eq!(resolve_start(&graph, "/", "/blog"), Some("/"));
    }

    #[test]
    fn test_resolve_start_substring() {
        let graph = scenario();
        assert_eq!(resolve_start(&graph, "/post", ""), Some("/blog/post-a"));
        assert_eq!(resolve_start(&graph, "/zzz", "/blog"), None);
    }

    #[test]
    fn test_resolve_root_without_home() {
        let graph = LinkGraph::build(GraphDocument::new(vec![Node::page("/blog")], vec![]));
        assert_eq!(resolve_start(&graph, "/", "/blog"), Some("/blog"));
        assert_eq!(resolve_start(&graph, "/", ""), None);
    }

    #[test]
    fn test_markdown_report() {
        let hood = neighborhood(&scenario(), "/blog", 1);
        let md = format_neighborhood_markdown(&hood, "/blog/");
        assert!(md.contains("# Neighborhood: /blog (1 hop)"));
        assert!(md.contains("### Direct Neighbors (3)"));
        assert!(md.contains("`https://example.com` *(external)*"));
    }

    #[test]
    fn test_markdown_no_match() {
        let hood = Neighborhood::empty(2);
        assert!(format_neighborhood_markdown(&hood, "/x").contains("No page matches"));
    }

    #[test]
    fn test_json_report() {
        let hood = neighborhood(&scenario(), "/", 2);
        let value: serde_json::Value =
            serde_json::from_str(&format_neighborhood_json(&hood, "/")).unwrap();
        assert_eq!(value["start"], "/");
        assert_eq!(value["summary"]["nodes"], 4);
        assert_eq!(value["by_distance"][2]["nodes"].as_array().unwrap().len(), 2);
    }
}
