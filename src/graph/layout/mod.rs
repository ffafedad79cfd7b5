mod force;
mod simulation;
mod state;
mod zoom;

pub use force::{CenterMode, ForceParams, Spring};
pub use simulation::{DRAG_ALPHA_TARGET, REHEAT_ALPHA, SessionStatus, Simulation};
pub use state::{
    Body, CURRENT_RADIUS, EXTERNAL_RADIUS, LayoutState, Lcg, NODE_RADIUS, Position, Viewport,
};
pub use zoom::{MAX_SCALE, MIN_SCALE, ZoomTransform};

use super::Neighborhood;
use crate::model::Link;
use serde::Serialize;

pub const DEFAULT_SEED: u32 = 0x5eed;
pub const DEFAULT_MAX_TICKS: usize = 300;

#[derive(Debug, Clone, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub label: String,
    pub ext: bool,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub pinned: bool,
}

/// Positions of a neighborhood after running its session headlessly.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutSnapshot {
    pub current: Option<String>,
    pub hops: usize,
    pub width: f64,
    pub height: f64,
    pub ticks: usize,
    pub settled: bool,
    pub nodes: Vec<LayoutNode>,
    pub links: Vec<Link>,
}

/// Lay out `hood` with the current node held at the viewport centre and
/// run until settled or `max_ticks` elapse.
pub fn settle(hood: &Neighborhood, viewport: Viewport, max_ticks: usize) -> LayoutSnapshot {
    let current = hood.start.as_deref();
    let mut sim = Simulation::new(hood, current, viewport, ForceParams::default(), DEFAULT_SEED);
    sim.start();
    if let Some(id) = current {
        let (cx, cy) = viewport.center();
        sim.hold(id, cx, cy);
        sim.set_alpha(1.0);
    }
    let ticks = sim.run(max_ticks);

    let nodes = hood
        .nodes
        .iter()
        .filter_map(|node| {
            let body = sim.body(&node.id)?;
            Some(LayoutNode {
                id: node.id.clone(),
                label: node.label.clone(),
                ext: node.ext,
                x: body.x,
                y: body.y,
                radius: body.radius,
                pinned: body.is_pinned(),
            })
        })
        .collect();

    LayoutSnapshot {
        current: current.map(str::to_string),
        hops: hood.hops,
        width: viewport.width,
        height: viewport.height,
        ticks,
        settled: sim.is_settled(),
        nodes,
        links: hood.links.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LinkGraph, neighborhood};
    use crate::model::{GraphDocument, LinkKind, Node};

    #[test]
    fn test_settle_holds_current_at_center() {
        let graph = LinkGraph::build(GraphDocument::new(
            vec![Node::page("/"), Node::page("/blog"), Node::page("/tags")],
            vec![
                Link::new("/", "/blog", LinkKind::Normal),
                Link::new("/blog", "/tags", LinkKind::Tag),
            ],
        ));
        let hood = neighborhood(&graph, "/blog", 1);
        let snap = settle(&hood, Viewport::new(400.0, 300.0), DEFAULT_MAX_TICKS);

        assert!(snap.settled);
        assert_eq!(snap.nodes.len(), 3);
        let blog = snap.nodes.iter().find(|n| n.id == "/blog").unwrap();
        assert_eq!((blog.x, blog.y), (200.0, 150.0));
        assert!(blog.pinned);
        assert_eq!(blog.radius, CURRENT_RADIUS);
    }

    #[test]
    fn test_settle_empty() {
        let snap = settle(&Neighborhood::empty(2), Viewport::default(), 10);
        assert!(snap.nodes.is_empty());
        assert!(snap.current.is_none());
    }
}
