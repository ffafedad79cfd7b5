use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use sitegraph::config::ViewerConfig;
use sitegraph::graph::{AppState, LinkGraph, router};
use sitegraph::{GraphDocument, Link, LinkKind, Node};
use std::sync::Arc;
use tower::util::ServiceExt;

fn state() -> Arc<AppState> {
    let document = GraphDocument::new(
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
    );
    Arc::new(AppState::new(
        LinkGraph::build(document),
        ViewerConfig::default(),
    ))
}

async fn get(uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state()).oneshot(req).await.expect("router oneshot failed");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_index_page() {
    let (status, text) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("Graph not available"));
    assert!(text.contains("/api/layout"));
    assert!(text.contains(r#""defaultHops":2"#));
    assert!(text.contains(r#""maxHops":6"#));
    assert!(text.contains(r#""navigablePrefix":"/""#));
}

#[tokio::test]
async fn test_full_document() {
    let (status, text) = get("/graph.json").await;
    assert_eq!(status, StatusCode::OK);
    let doc = GraphDocument::from_json(&text).unwrap();
    assert_eq!(doc.nodes.len(), 4);
    assert_eq!(doc.links.len(), 3);
}

#[tokio::test]
async fn test_neighborhood_endpoint() {
    let (status, text) = get("/api/neighborhood?current=%2Fblog%2F&hops=0").await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["start"], "/blog");
    assert_eq!(value["nodes"].as_array().unwrap().len(), 1);
    assert_eq!(value["links"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_neighborhood_unknown_location() {
    let (status, text) = get("/api/neighborhood?current=%2Fnothing-here&hops=2").await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value["start"].is_null());
    assert!(value["nodes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_layout_endpoint() {
    let (status, text) = get("/api/layout?current=%2Fblog&hops=1&width=500&height=300").await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["current"], "/blog");
    assert_eq!(value["settled"], true);
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    let blog = nodes.iter().find(|n| n["id"] == "/blog").unwrap();
    assert_eq!(blog["x"], 250.0);
    assert_eq!(blog["y"], 150.0);
}

#[tokio::test]
async fn test_bad_hops_rejected() {
    let (status, _) = get("/api/neighborhood?current=%2F&hops=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_hops_clamped() {
    let (status, text) = get("/api/neighborhood?current=%2F&hops=1000").await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["hops"], 6);
    assert_eq!(value["nodes"].as_array().unwrap().len(), 4);

    let (status, text) = get("/api/layout?current=%2F&hops=1000").await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["hops"], 6);
    assert_eq!(value["settled"], true);
}
