//! Playfield geometry and hit tests.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Size of the playfield, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// True when `rect` lies entirely beyond the field grown by `margin` on every side.
    pub fn outside_by(&self, rect: &Rect, margin: f32) -> bool {
        rect.x + rect.width < -margin
            || rect.x > self.width + margin
            || rect.y + rect.height < -margin
            || rect.y > self.height + margin
    }

    pub fn clamp(&self, rect: &mut Rect) {
        rect.x = rect.x.clamp(0.0, (self.width - rect.width).max(0.0));
        rect.y = rect.y.clamp(0.0, (self.height - rect.height).max(0.0));
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(600.0, 400.0)
    }
}

/// Touching edges do not count as an overlap.
pub fn boxes_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Inclusive: a point exactly `r` away is inside.
pub fn within_radius(px: f32, py: f32, cx: f32, cy: f32, r: f32) -> bool {
    let dx = px - cx;
    let dy = py - cy;
    (dx * dx + dy * dy).sqrt() <= r
}
