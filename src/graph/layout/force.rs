//! Force kernels following d3-force: spring links, pairwise charge,
//! collision, and centering. Each kernel adjusts velocities (or, for
//! `Center`, positions) of a body slice in place.

use super::state::{Body, Lcg};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CenterMode {
    /// Shift every body so the centroid sits on the target.
    Center,
    /// Independent X and Y pulls toward the target.
    Springs { strength: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    pub link_distance: f64,
    pub charge: f64,
    pub collide_padding: f64,
    pub center: CenterMode,
    /// Fraction of velocity removed each tick.
    pub velocity_decay: f64,
    pub alpha_decay: f64,
    pub alpha_min: f64,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            link_distance: 80.0,
            charge: -300.0,
            collide_padding: 10.0,
            center: CenterMode::Center,
            velocity_decay: 0.4,
            alpha_decay: 0.05,
            alpha_min: 0.001,
        }
    }
}

const DISTANCE_MIN2: f64 = 1.0;

/// A link resolved to body indices with its precomputed strength and bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub source: usize,
    pub target: usize,
    pub strength: f64,
    pub bias: f64,
}

impl Spring {
    /// Weight springs by endpoint degree: strength `1 / min(deg)`, and the
    /// less connected end moves more.
    pub fn build(pairs: &[(usize, usize)], body_count: usize) -> Vec<Spring> {
        let mut degree = vec![0usize; body_count];
        for &(s, t) in pairs {
            degree[s] += 1;
            degree[t] += 1;
        }
        pairs
            .iter()
            .map(|&(s, t)| {
                let (ds, dt) = (degree[s] as f64, degree[t] as f64);
                Spring {
                    source: s,
                    target: t,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect()
    }
}

pub fn apply_links(bodies: &mut [Body], springs: &[Spring], distance: f64, alpha: f64, rng: &mut Lcg) {
    for spring in springs {
        let (s, t) = (bodies[spring.source], bodies[spring.target]);
        let mut x = t.x + t.vx - s.x - s.vx;
        let mut y = t.y + t.vy - s.y - s.vy;
        if x == 0.0 {
            x = rng.jiggle();
        }
        if y == 0.0 {
            y = rng.jiggle();
        }
        let len = (x * x + y * y).sqrt();
        let l = (len - distance) / len * alpha * spring.strength;
        x *= l;
        y *= l;

        let b = spring.bias;
        let target = &mut bodies[spring.target];
        target.vx -= x * b;
        target.vy -= y * b;
        let source = &mut bodies[spring.source];
        source.vx += x * (1.0 - b);
        source.vy += y * (1.0 - b);
    }
}

/// Many-body force evaluated over every pair; negative strength repels.
pub fn apply_charge(bodies: &mut [Body], strength: f64, alpha: f64, rng: &mut Lcg) {
    let n = bodies.len();
    for i in 0..n {
        let (xi, yi) = (bodies[i].x, bodies[i].y);
        let (mut dvx, mut dvy) = (0.0, 0.0);
        for (j, other) in bodies.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut x = other.x - xi;
            let mut y = other.y - yi;
            let mut l = x * x + y * y;
            if x == 0.0 {
                x = rng.jiggle();
                l += x * x;
            }
            if y == 0.0 {
                y = rng.jiggle();
                l += y * y;
            }
            if l < DISTANCE_MIN2 {
                l = (DISTANCE_MIN2 * l).sqrt();
            }
            let w = strength * alpha / l;
            dvx += x * w;
            dvy += y * w;
        }
        bodies[i].vx += dvx;
        bodies[i].vy += dvy;
    }
}

/// Push overlapping bodies apart; each body occupies `radius + padding`.
pub fn apply_collide(bodies: &mut [Body], padding: f64, rng: &mut Lcg) {
    let n = bodies.len();
    for i in 0..n {
        let ri = bodies[i].radius + padding;
        let ri2 = ri * ri;
        for j in (i + 1)..n {
            let (a, b) = (bodies[i], bodies[j]);
            let rj = b.radius + padding;
            let r = ri + rj;
            let mut x = a.x + a.vx - b.x - b.vx;
            let mut y = a.y + a.vy - b.y - b.vy;
            let mut l = x * x + y * y;
            if l >= r * r {
                continue;
            }
            if x == 0.0 {
                x = rng.jiggle();
                l += x * x;
            }
            if y == 0.0 {
                y = rng.jiggle();
                l += y * y;
            }
            let len = l.sqrt();
            let push = (r - len) / len;
            x *= push;
            y *= push;
            let rj2 = rj * rj;
            let share = rj2 / (ri2 + rj2);
            bodies[i].vx += x * share;
            bodies[i].vy += y * share;
            bodies[j].vx -= x * (1.0 - share);
            bodies[j].vy -= y * (1.0 - share);
        }
    }
}

pub fn apply_center(bodies: &mut [Body], mode: CenterMode, target: (f64, f64), alpha: f64) {
    if bodies.is_empty() {
        return;
    }
    match mode {
        CenterMode::Center => {
            let n = bodies.len() as f64;
            let sx = bodies.iter().map(|b| b.x).sum::<f64>() / n - target.0;
            let sy = bodies.iter().map(|b| b.y).sum::<f64>() / n - target.1;
            for body in bodies.iter_mut() {
                body.x -= sx;
                body.y -= sy;
            }
        }
        CenterMode::Springs { strength } => {
            for body in bodies.iter_mut() {
                body.vx += (target.0 - body.x) * strength * alpha;
                body.vy += (target.1 - body.y) * strength * alpha;
            }
        }
    }
}
