use serde::{Deserialize, Serialize};

/// Axis-aligned region of an image that holds text, addressed by its
/// top-left corner and size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rectangle { x, y, width, height }
    }

    /// Build from two opposite corners given in any order.
    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (left, right) = (x0.min(x1) as i64, x0.max(x1) as i64);
        let (top, bottom) = (y0.min(y1) as i64, y0.max(y1) as i64);
        Rectangle {
            x: left as i32,
            y: top as i32,
            width: span(left, right),
            height: span(top, bottom),
        }
    }

    pub fn left(&self) -> i64 {
        self.x as i64
    }

    pub fn top(&self) -> i64 {
        self.y as i64
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn top_left(&self) -> (i64, i64) {
        (self.left(), self.top())
    }

    pub fn top_right(&self) -> (i64, i64) {
        (self.right(), self.top())
    }

    pub fn bottom_left(&self) -> (i64, i64) {
        (self.left(), self.bottom())
    }

    pub fn bottom_right(&self) -> (i64, i64) {
        (self.right(), self.bottom())
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width over height, `None` for a zero-height rectangle.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }

    pub fn diagonal(&self) -> f64 {
        (self.width as f64).hypot(self.height as f64)
    }

    /// MRZ lines are long and flat; anything wider than five times its
    /// height is a candidate.
    pub fn looks_like_mrz(&self) -> bool {
        self.aspect_ratio().map_or(false, |ratio| ratio > 5.0)
    }

    /// True iff the intersection has strictly positive width and height.
    pub fn overlap(&self, other: &Rectangle) -> bool {
        let width = self.right().min(other.right()) - self.left().max(other.left());
        let height = self.bottom().min(other.bottom()) - self.top().max(other.top());
        width > 0 && height > 0
    }

    /// Area-based containment: the two overlap and their bounding union is
    /// no larger than the bigger of the two.
    ///
    /// Both arguments play the same role, so `a.contains(&b) == b.contains(&a)`.
    /// Use [`Rectangle::encloses`] for a directional test.
    pub fn contains(&self, other: &Rectangle) -> bool {
        self.overlap(other) && self.merge(other).area() == self.area().max(other.area())
    }

    /// Geometric containment: every point of `other` lies inside `self`.
    pub fn encloses(&self, other: &Rectangle) -> bool {
        self.left() <= other.left()
            && self.top() <= other.top()
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Whether two regions sit close enough to belong to the same text block.
    ///
    /// Either they share a row (top and bottom edges within `h_thresh`, gap
    /// under `h_thresh`) or a column (left and right edges within `v_thresh`,
    /// gap under `v_thresh`). Diagonal neighbours are never near.
    pub fn near(&self, other: &Rectangle, v_thresh: u32, h_thresh: u32) -> bool {
        let (v, h) = (v_thresh as i64, h_thresh as i64);

        let same_row = (self.bottom() - other.bottom()).abs() < h
            && (self.top() - other.top()).abs() < h
            && self.right().max(other.right()) - self.left().min(other.left())
                < self.width as i64 + other.width as i64 + h;

        let same_column = (self.left() - other.left()).abs() < v
            && (self.right() - other.right()).abs() < v
            && self.bottom().max(other.bottom()) - self.top().min(other.top())
                < self.height as i64 + other.height as i64 + v;

        same_row || same_column
    }

    /// Tightest rectangle covering both inputs.
    pub fn merge(&self, other: &Rectangle) -> Rectangle {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        Rectangle {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            width: span(left, self.right().max(other.right())),
            height: span(top, self.bottom().max(other.bottom())),
        }
    }

    /// Grow by `fx`/`fy` around the centre, keeping the top-left corner
    /// non-negative and the size within `max_width` x `max_height`.
    pub fn scale(&self, fx: f64, fy: f64, max_width: u32, max_height: u32) -> Rectangle {
        let width = (self.width as f64 * fx).round_ties_even();
        let height = (self.height as f64 * fy).round_ties_even();
        let x = (self.x as f64 + (self.width as f64 - width) / 2.0).round_ties_even();
        let y = (self.y as f64 + (self.height as f64 - height) / 2.0).round_ties_even();

        Rectangle {
            x: (x.max(0.0) as i64).min(i32::MAX as i64) as i32,
            y: (y.max(0.0) as i64).min(i32::MAX as i64) as i32,
            width: (width.max(0.0) as u64).min(max_width as u64) as u32,
            height: (height.max(0.0) as u64).min(max_height as u64) as u32,
        }
    }
}

fn span(from: i64, to: i64) -> u32 {
    u32::try_from(to - from).unwrap_or(u32::MAX)
}
