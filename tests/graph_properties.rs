//! Property-based invariant tests for extraction and the hop filter.
//!
//! 1. Hop filter: node set, link set and distances match an all-pairs
//!    undirected distance table on random graphs
//! 2. Extraction: on random site trees every node id is unique and
//!    canonical, no link is a self-loop, and assets never become nodes

use proptest::prelude::*;
use sitegraph::config::{Config, DEFAULT_ASSET_EXTENSIONS, DEFAULT_ASSET_PREFIXES};
use sitegraph::graph::{LinkGraph, neighborhood};
use sitegraph::{GenerateOptions, GraphDocument, Link, LinkKind, Node, extract_site};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────────

const UNREACHABLE: usize = usize::MAX / 2;

fn page_id(i: usize) -> String {
    format!("/p{i}")
}

fn make_graph(n: usize, edges: &[(usize, usize)]) -> LinkGraph {
    let nodes = (0..n).map(|i| Node::page(&page_id(i))).collect();
    let links = edges
        .iter()
        .filter(|&&(a, b)| a < n && b < n && a != b)
        .map(|&(a, b)| Link::new(page_id(a), page_id(b), LinkKind::Normal))
        .collect();
    LinkGraph::build(GraphDocument::new(nodes, links))
}

/// Floyd-Warshall over the links taken in both directions.
fn all_pairs(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut dist = vec![vec![UNREACHABLE; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0;
    }
    for &(a, b) in edges {
        if a < n && b < n && a != b {
            dist[a][b] = 1;
            dist[b][a] = 1;
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let through = dist[i][k] + dist[k][j];
                if through < dist[i][j] {
                    dist[i][j] = through;
                }
            }
        }
    }
    dist
}

fn graph_strategy(max_nodes: usize, max_edges: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1..=max_nodes).prop_flat_map(move |n| {
        let edges = prop::collection::vec((0..n, 0..n), 0..=max_edges);
        (Just(n), edges)
    })
}

fn segments() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 0..3)
}

fn internal_href() -> impl Strategy<Value = String> {
    let prefix = prop::sample::select(vec!["/", "./", "../", "/a/../", "/./", "../../", ""]);
    let suffix = prop::sample::select(vec![
        "", "/", "/index.html", "#top", "?q=1", ".png", "/style.css", ".html",
    ]);
    (prefix, segments(), suffix).prop_map(|(p, segs, s)| format!("{}{}{}", p, segs.join("/"), s))
}

fn href() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => internal_href(),
        1 => prop::sample::select(vec![
            "https://example.com",
            "https://example.com/photo.jpg",
            "mailto:me@example.com",
            "#frag",
            "/images/hero",
            "/_astro/client.js",
            "//cdn.example.com/lib",
        ])
        .prop_map(str::to_string),
    ]
}

fn site_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<String>>> {
    let page = (segments(), prop::collection::vec(href(), 0..8))
        .prop_map(|(segs, hrefs)| {
            let mut rel: Vec<&str> = segs;
            rel.push("index.html");
            (rel.join("/"), hrefs)
        });
    prop::collection::vec(page, 1..6).prop_map(|pages| pages.into_iter().collect())
}

fn is_asset_id(id: &str) -> bool {
    DEFAULT_ASSET_PREFIXES.iter().any(|p| id.starts_with(p))
        || id
            .rsplit('/')
            .next()
            .and_then(|last| last.rsplit_once('.'))
            .is_some_and(|(_, ext)| DEFAULT_ASSET_EXTENSIONS.contains(&ext))
}

fn is_canonical_path(id: &str) -> bool {
    id == "/"
        || (id.starts_with('/')
            && !id.ends_with('/')
            && !id.contains("//")
            && !id.contains('#')
            && !id.contains('?')
            && id.split('/').all(|s| s != "." && s != ".."))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Hop filter matches undirected distances
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hop_filter_matches_distance_table(
        (n, edges) in graph_strategy(12, 24),
        start in 0usize..12,
        hops in 0usize..5,
    ) {
        let start = start % n;
        let graph = make_graph(n, &edges);
        let dist = all_pairs(n, &edges);
        let hood = neighborhood(&graph, &page_id(start), hops);

        let expected: BTreeSet<String> = (0..n)
            .filter(|&j| dist[start][j] <= hops)
            .map(page_id)
            .collect();
        let got: BTreeSet<String> = hood.nodes.iter().map(|node| node.id.clone()).collect();
        prop_assert_eq!(&got, &expected);
        prop_assert_eq!(got.len(), hood.nodes.len(), "duplicate node in neighborhood");

        for j in 0..n {
            let id = page_id(j);
            if dist[start][j] <= hops {
                prop_assert_eq!(hood.distance(&id), Some(dist[start][j]), "distance of {}", id);
            } else {
                prop_assert_eq!(hood.distance(&id), None, "{} outside the hop limit", id);
            }
        }

        let expected_links = graph
            .document()
            .links
            .iter()
            .filter(|l| expected.contains(&l.source) && expected.contains(&l.target))
            .count();
        prop_assert_eq!(hood.links.len(), expected_links);
        for link in &hood.links {
            prop_assert!(expected.contains(&link.source) && expected.contains(&link.target));
        }
    }
}

proptest! {
    #[test]
    fn hop_filter_grows_with_hops(
        (n, edges) in graph_strategy(10, 20),
        start in 0usize..10,
        hops in 0usize..4,
    ) {
        let start = page_id(start % n);
        let graph = make_graph(n, &edges);
        let inner: HashSet<String> = neighborhood(&graph, &start, hops)
            .nodes
            .into_iter()
            .map(|node| node.id)
            .collect();
        let outer: HashSet<String> = neighborhood(&graph, &start, hops + 1)
            .nodes
            .into_iter()
            .map(|node| node.id)
            .collect();
        prop_assert!(inner.is_subset(&outer));
        prop_assert!(inner.contains(&start));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Extraction invariants on random site trees
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn extracted_graph_is_canonical(site in site_strategy()) {
        let dir = TempDir::new().unwrap();
        for (rel, hrefs) in &site {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            let body: String = hrefs
                .iter()
                .map(|h| format!("<a href=\"{}\">x</a>\n", h))
                .collect();
            fs::write(path, format!("<html><body>{}</body></html>", body)).unwrap();
        }

        let options = GenerateOptions {
            config: Some(Config::default()),
            all_pages: false,
        };
        let doc = extract_site(dir.path(), options).unwrap().document;

        let ids: HashSet<&str> = doc.nodes.iter().map(|node| node.id.as_str()).collect();
        prop_assert_eq!(ids.len(), doc.nodes.len(), "duplicate node ids");

        for node in &doc.nodes {
            if node.ext {
                prop_assert!(!is_asset_id(node.id.trim_start_matches("https://example.com")));
                continue;
            }
            prop_assert!(is_canonical_path(&node.id), "non-canonical id {}", node.id);
            prop_assert!(!is_asset_id(&node.id), "asset became a node: {}", node.id);
        }

        for link in &doc.links {
            prop_assert_ne!(&link.source, &link.target, "self-loop");
            prop_assert!(ids.contains(link.source.as_str()), "unknown source {}", link.source);
            if link.kind != LinkKind::Asset {
                prop_assert!(ids.contains(link.target.as_str()), "unknown target {}", link.target);
            }
        }
    }
}
