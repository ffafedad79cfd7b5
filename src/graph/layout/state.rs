use serde::Serialize;
use std::collections::HashMap;

/// Linear congruential generator with the constants d3 uses for its own
/// seeded randomness. Layouts built from the same seed are reproducible.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

const LCG_A: u32 = 1_664_525;
const LCG_C: u32 = 1_013_904_223;

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(LCG_A).wrapping_add(LCG_C);
        self.state as f64 / 4_294_967_296.0
    }

    /// Tiny random offset used to separate coincident points.
    pub fn jiggle(&mut self) -> f64 {
        (self.next_f64() - 0.5) * 1e-6
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

pub const CURRENT_RADIUS: f64 = 8.0;
pub const EXTERNAL_RADIUS: f64 = 6.0;
pub const NODE_RADIUS: f64 = 4.0;

/// Position and velocity of one node. `fx`/`fy` pin the node when set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: Option<f64>,
    pub fy: Option<f64>,
    pub radius: f64,
}

impl Body {
    pub fn at(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            fx: None,
            fy: None,
            radius,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }
}

/// Layout-only data for a session, kept apart from the graph nodes.
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    ids: Vec<String>,
    bodies: Vec<Body>,
    index: HashMap<String, usize>,
}

impl LayoutState {
    /// Seed every id uniformly inside the viewport, staying off its edges.
    pub fn seeded<I, S>(ids: I, radius_of: impl Fn(&str) -> f64, viewport: Viewport, rng: &mut Lcg) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self::default();
        for id in ids {
            let id = id.into();
            if state.index.contains_key(&id) {
                continue;
            }
            let x = viewport.width * (0.1 + 0.8 * rng.next_f64());
            let y = viewport.height * (0.1 + 0.8 * rng.next_f64());
            let radius = radius_of(&id);
            state.index.insert(id.clone(), state.ids.len());
            state.ids.push(id);
            state.bodies.push(Body::at(x, y, radius));
        }
        state
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn id(&self, index: usize) -> &str {
        &self.ids[index]
    }

    pub fn get(&self, id: &str) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Body> {
        let i = self.index_of(id)?;
        Some(&mut self.bodies[i])
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn positions(&self) -> Vec<Position> {
        self.ids
            .iter()
            .zip(&self.bodies)
            .map(|(id, b)| Position {
                id: id.clone(),
                x: b.x,
                y: b.y,
                radius: b.radius,
                pinned: b.is_pinned(),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.bodies.clear();
        self.index.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub pinned: bool,
}
