use super::force::{self, ForceParams, Spring};
use super::state::{
    Body, CURRENT_RADIUS, EXTERNAL_RADIUS, LayoutState, Lcg, NODE_RADIUS, Position, Viewport,
};
use crate::graph::Neighborhood;
use std::collections::{HashMap, HashSet};

/// Alpha used when a resize or hold nudges a settled layout.
pub const REHEAT_ALPHA: f64 = 0.3;
/// Alpha target kept while a node is being dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
    Stopped,
    Disposed,
}

/// One force-directed layout session over a neighborhood.
pub struct Simulation {
    params: ForceParams,
    state: LayoutState,
    springs: Vec<Spring>,
    alpha: f64,
    alpha_target: f64,
    center: (f64, f64),
    held: HashMap<usize, (f64, f64)>,
    status: SessionStatus,
    rng: Lcg,
    ticks: usize,
}

impl Simulation {
    /// Seed positions for every node in `hood`. The session is idle until
    /// `start` is called.
    pub fn new(
        hood: &Neighborhood,
        current: Option<&str>,
        viewport: Viewport,
        params: ForceParams,
        seed: u32,
    ) -> Self {
        let mut rng = Lcg::new(seed);
        let external: HashSet<&str> = hood
            .nodes
            .iter()
            .filter(|n| n.ext)
            .map(|n| n.id.as_str())
            .collect();
        let radius_of = |id: &str| {
            if Some(id) == current {
                CURRENT_RADIUS
            } else if external.contains(id) {
                EXTERNAL_RADIUS
            } else {
                NODE_RADIUS
            }
        };
        let state = LayoutState::seeded(
            hood.nodes.iter().map(|n| n.id.as_str()),
            radius_of,
            viewport,
            &mut rng,
        );

        let pairs: Vec<(usize, usize)> = hood
            .links
            .iter()
            .filter_map(|l| Some((state.index_of(&l.source)?, state.index_of(&l.target)?)))
            .collect();
        let springs = Spring::build(&pairs, state.len());

        Self {
            params,
            state,
            springs,
            alpha: 1.0,
            alpha_target: 0.0,
            center: viewport.center(),
            held: HashMap::new(),
            status: SessionStatus::Idle,
            rng,
            ticks: 0,
        }
    }

    pub fn start(&mut self) {
        if self.status != SessionStatus::Disposed {
            self.status = SessionStatus::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.status == SessionStatus::Running {
            self.status = SessionStatus::Stopped;
        }
    }

    /// Stop for good and release all layout state.
    pub fn dispose(&mut self) {
        self.status = SessionStatus::Disposed;
        self.state.clear();
        self.springs.clear();
        self.held.clear();
    }

    /// Resume ticking after a stop or settle.
    pub fn restart(&mut self) {
        self.start();
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.params.alpha_min
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.max(0.0);
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f64) {
        self.alpha_target = target.max(0.0);
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    pub fn set_center(&mut self, x: f64, y: f64) {
        self.center = (x, y);
    }

    /// Advance one tick. Returns false when the session isn't running.
    /// The session stops itself once alpha falls below `alpha_min`.
    pub fn tick(&mut self) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        self.step();
        self.ticks += 1;
        if self.is_settled() {
            self.status = SessionStatus::Stopped;
        }
        true
    }

    /// Tick until the session stops or `max_ticks` is reached.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut done = 0;
        while done < max_ticks && self.tick() {
            done += 1;
        }
        done
    }

    fn step(&mut self) {
        let p = self.params;
        self.alpha += (self.alpha_target - self.alpha) * p.alpha_decay;
        let alpha = self.alpha;

        let bodies = self.state.bodies_mut();
        force::apply_links(bodies, &self.springs, p.link_distance, alpha, &mut self.rng);
        force::apply_charge(bodies, p.charge, alpha, &mut self.rng);
        force::apply_collide(bodies, p.collide_padding, &mut self.rng);
        force::apply_center(bodies, p.center, self.center, alpha);

        for body in bodies.iter_mut() {
            integrate(body, p.velocity_decay);
        }
    }

    /// Fix a node at a layout position. Returns false for unknown ids.
    pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.state.get_mut(id) {
            Some(body) => {
                body.fx = Some(x);
                body.fy = Some(y);
                true
            }
            None => false,
        }
    }

    /// Let a pinned node move freely again. A held node returns to its
    /// anchor instead.
    pub fn release(&mut self, id: &str) -> bool {
        let Some(index) = self.state.index_of(id) else {
            return false;
        };
        let anchor = self.held.get(&index).copied();
        let body = &mut self.state.bodies_mut()[index];
        match anchor {
            Some((x, y)) => {
                body.fx = Some(x);
                body.fy = Some(y);
            }
            None => {
                body.fx = None;
                body.fy = None;
            }
        }
        true
    }

    /// Keep a node anchored at a position across drags, and nudge the
    /// layout so neighbors settle around it.
    pub fn hold(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(index) = self.state.index_of(id) else {
            return false;
        };
        self.held.insert(index, (x, y));
        self.pin(id, x, y);
        self.set_alpha(REHEAT_ALPHA);
        self.restart();
        true
    }

    pub fn is_held(&self, id: &str) -> bool {
        self.state
            .index_of(id)
            .is_some_and(|i| self.held.contains_key(&i))
    }

    pub fn body(&self, id: &str) -> Option<&Body> {
        self.state.get(id)
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn positions(&self) -> Vec<Position> {
        self.state.positions()
    }
}

fn integrate(body: &mut Body, velocity_decay: f64) {
    match body.fx {
        Some(fx) => {
            body.x = fx;
            body.vx = 0.0;
        }
        None => {
            body.vx *= 1.0 - velocity_decay;
            body.x += body.vx;
        }
    }
    match body.fy {
        Some(fy) => {
            body.y = fy;
            body.vy = 0.0;
        }
        None => {
            body.vy *= 1.0 - velocity_decay;
            body.y += body.vy;
        }
    }
}
