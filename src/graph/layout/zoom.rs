pub const MIN_SCALE: f64 = 0.3;
pub const MAX_SCALE: f64 = 3.0;

/// Uniform pan/zoom mapping layout coordinates to screen coordinates:
/// `screen = layout * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        (point.0 * self.k + self.x, point.1 * self.k + self.y)
    }

    pub fn invert(&self, screen: (f64, f64)) -> (f64, f64) {
        ((screen.0 - self.x) / self.k, (screen.1 - self.y) / self.k)
    }

    /// Multiply the scale by `factor`, keeping the layout point under
    /// `anchor` fixed on screen. The scale never leaves `[0.3, 3]`.
    pub fn scale_by(&mut self, factor: f64, anchor: (f64, f64)) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let fixed = self.invert(anchor);
        self.k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.x = anchor.0 - fixed.0 * self.k;
        self.y = anchor.1 - fixed.1 * self.k;
    }

    pub fn translate_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}
