//! Interactive state of the graph visualizer: document loading, the active
//! layout session, pan/zoom, and pointer interaction. Rendering is left to
//! the embedding surface; everything here works in screen coordinates.

use super::layout::{
    DRAG_ALPHA_TARGET, ForceParams, Position, REHEAT_ALPHA, Simulation, Viewport, ZoomTransform,
};
use super::{LinkGraph, Neighborhood, neighborhood, resolve_start};
use crate::config::ViewerConfig;
use crate::model::{DocumentError, GraphDocument};
use tracing::{debug, warn};

/// Ticks after a session starts before the current node is held at the
/// viewport centre.
pub const HOLD_DELAY_TICKS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    Unavailable(String),
}

/// Identifies one load request. Only the newest ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub struct ViewerSettings {
    pub section_root: String,
    pub navigable_prefix: String,
    pub hops: usize,
    pub params: ForceParams,
    pub seed: u32,
}

impl From<&ViewerConfig> for ViewerSettings {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            section_root: config.section_root.clone(),
            navigable_prefix: config.navigable_prefix.clone(),
            hops: config.default_hops,
            params: ForceParams::default(),
            seed: super::layout::DEFAULT_SEED,
        }
    }
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

struct Session {
    hood: Neighborhood,
    sim: Simulation,
    hold_pending: bool,
}

struct Drag {
    id: String,
    origin: (f64, f64),
    moved: bool,
}

pub struct Viewer {
    settings: ViewerSettings,
    location: String,
    viewport: Viewport,
    transform: ZoomTransform,
    state: LoadState,
    generation: u64,
    closed: bool,
    graph: Option<LinkGraph>,
    session: Option<Session>,
    drag: Option<Drag>,
    suppress_click: bool,
    sessions_started: u32,
}

impl Viewer {
    pub fn new(location: impl Into<String>, settings: ViewerSettings, viewport: Viewport) -> Self {
        Self {
            settings,
            location: location.into(),
            viewport,
            transform: ZoomTransform::IDENTITY,
            state: LoadState::Loading,
            generation: 0,
            closed: false,
            graph: None,
            session: None,
            drag: None,
            suppress_click: false,
            sessions_started: 0,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn hops(&self) -> usize {
        self.settings.hops
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of layout sessions started so far.
    pub fn sessions_started(&self) -> u32 {
        self.sessions_started
    }

    /// Begin a load, invalidating any ticket handed out earlier.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        if !self.closed {
            self.state = LoadState::Loading;
        }
        LoadTicket(self.generation)
    }

    /// Apply the outcome of a load. Returns false when the ticket is stale
    /// or the viewer was torn down, leaving the viewer untouched.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<GraphDocument, DocumentError>,
    ) -> bool {
        if self.closed || ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "Ignoring stale graph load");
            return false;
        }
        match result {
            Ok(document) => {
                self.graph = Some(LinkGraph::build(document));
                self.state = LoadState::Ready;
                self.start_session();
            }
            Err(e) => {
                warn!(error = %e, "Graph not available");
                self.state = LoadState::Unavailable(e.to_string());
            }
        }
        true
    }

    /// Stop interaction for good. Later loads are ignored.
    pub fn teardown(&mut self) {
        self.closed = true;
        self.generation += 1;
        self.drag = None;
        if let Some(mut session) = self.session.take() {
            session.sim.dispose();
        }
    }

    pub fn set_hops(&mut self, hops: usize) {
        self.settings.hops = hops;
        if !self.closed && self.graph.is_some() {
            self.start_session();
        }
    }

    /// Rebuild the session from the cached graph. Returns false when no
    /// graph has loaded yet.
    pub fn reload(&mut self) -> bool {
        if self.closed || self.graph.is_none() {
            return false;
        }
        self.start_session();
        true
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        let (cx, cy) = self.viewport.center();
        if let Some(session) = &mut self.session {
            session.sim.set_center(cx, cy);
            session.sim.set_alpha(REHEAT_ALPHA);
            session.sim.restart();
        }
    }

    fn start_session(&mut self) {
        let Some(graph) = &self.graph else {
            return;
        };
        if let Some(mut old) = self.session.take() {
            old.sim.dispose();
        }

        let current = resolve_start(graph, &self.location, &self.settings.section_root);
        let hood = match current {
            Some(id) => neighborhood(graph, id, self.settings.hops),
            None => Neighborhood::empty(self.settings.hops),
        };
        let seed = self.settings.seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;

        let mut sim = Simulation::new(&hood, current, self.viewport, self.settings.params, seed);
        sim.start();
        debug!(
            location = %self.location,
            current = ?current,
            nodes = hood.nodes.len(),
            hops = self.settings.hops,
            "Started layout session"
        );

        self.session = Some(Session {
            hold_pending: hood.start.is_some(),
            hood,
            sim,
        });
        self.drag = None;
        self.suppress_click = false;
    }

    pub fn current(&self) -> Option<&str> {
        self.session.as_ref()?.hood.start.as_deref()
    }

    pub fn neighborhood(&self) -> Option<&Neighborhood> {
        self.session.as_ref().map(|s| &s.hood)
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.session.as_ref().map(|s| &s.sim)
    }

    pub fn positions(&self) -> Vec<Position> {
        self.simulation().map(|s| s.positions()).unwrap_or_default()
    }

    /// Advance the active session one tick.
    pub fn tick(&mut self) -> bool {
        let center = self.viewport.center();
        let Some(session) = &mut self.session else {
            return false;
        };
        let ticked = session.sim.tick();
        if session.hold_pending && session.sim.ticks() >= HOLD_DELAY_TICKS {
            session.hold_pending = false;
            if let Some(id) = &session.hood.start {
                session.sim.hold(id, center.0, center.1);
            }
        }
        ticked
    }

    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut done = 0;
        while done < max_ticks && self.tick() {
            done += 1;
        }
        done
    }

    pub fn zoom_by(&mut self, factor: f64, anchor: (f64, f64)) {
        self.transform.scale_by(factor, anchor);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.transform.translate_by(dx, dy);
    }

    pub fn screen_position(&self, id: &str) -> Option<(f64, f64)> {
        let body = self.simulation()?.body(id)?;
        Some(self.transform.apply((body.x, body.y)))
    }

    /// Topmost node under a screen point.
    pub fn node_at(&self, screen: (f64, f64)) -> Option<&str> {
        let sim = self.simulation()?;
        let (x, y) = self.transform.invert(screen);
        let state = sim.state();
        state
            .bodies()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, b)| {
                let (dx, dy) = (b.x - x, b.y - y);
                dx * dx + dy * dy <= b.radius * b.radius
            })
            .map(|(i, _)| state.id(i))
    }

    /// Grab the node under the pointer and pin it there.
    pub fn drag_start(&mut self, screen: (f64, f64)) -> Option<String> {
        if self.closed {
            return None;
        }
        let id = self.node_at(screen)?.to_string();
        let first = self.drag.is_none();
        let session = self.session.as_mut()?;
        let body = *session.sim.body(&id)?;
        if first {
            session.sim.set_alpha_target(DRAG_ALPHA_TARGET);
            session.sim.restart();
        }
        session.sim.pin(&id, body.x, body.y);
        self.drag = Some(Drag {
            id: id.clone(),
            origin: (body.x, body.y),
            moved: false,
        });
        Some(id)
    }

    pub fn drag_to(&mut self, screen: (f64, f64)) -> bool {
        let point = self.transform.invert(screen);
        let (Some(drag), Some(session)) = (&mut self.drag, &mut self.session) else {
            return false;
        };
        if point != drag.origin {
            drag.moved = true;
        }
        session.sim.pin(&drag.id, point.0, point.1)
    }

    /// Finish a drag. Returns whether the node moved; a moving drag
    /// swallows the click that ends it.
    pub fn drag_end(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        if let Some(session) = &mut self.session {
            session.sim.set_alpha_target(0.0);
            session.sim.release(&drag.id);
        }
        self.suppress_click = drag.moved;
        drag.moved
    }

    /// Resolve a click to a navigation target, if any.
    pub fn click(&mut self, screen: (f64, f64)) -> Option<String> {
        if std::mem::take(&mut self.suppress_click) || self.closed {
            return None;
        }
        let id = self.node_at(screen)?;
        let node = self.session.as_ref()?.hood.nodes.iter().find(|n| n.id == id)?;
        if node.ext || !node.id.starts_with(&self.settings.navigable_prefix) {
            return None;
        }
        Some(node.id.clone())
    }
}
