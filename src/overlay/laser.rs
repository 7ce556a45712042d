use std::collections::VecDeque;

use serde::Serialize;

use super::Surface;

pub const DOT_RADIUS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A beam from the nearest surface edge to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Beam {
    pub edge: Edge,
    pub origin: Point,
    pub target: Point,
    pub angle_deg: f64,
    pub length: f64,
}

/// Clamps the pointer to `surface` and aims a beam at it from the closest edge.
/// Ties resolve left, right, top, bottom.
pub fn aim(surface: Surface, x: f64, y: f64) -> Beam {
    let tx = x.max(0.0).min(surface.width);
    let ty = y.max(0.0).min(surface.height);

    let edges = [
        (Edge::Left, tx, Point { x: 0.0, y: ty }),
        (Edge::Right, surface.width - tx, Point { x: surface.width, y: ty }),
        (Edge::Top, ty, Point { x: tx, y: 0.0 }),
        (Edge::Bottom, surface.height - ty, Point { x: tx, y: surface.height }),
    ];

    let (edge, _, origin) = edges
        .into_iter()
        .fold(edges[0], |best, candidate| if candidate.1 < best.1 { candidate } else { best });

    let dx = tx - origin.x;
    let dy = ty - origin.y;

    Beam {
        edge,
        origin,
        target: Point { x: tx, y: ty },
        angle_deg: dy.atan2(dx).to_degrees(),
        length: dx.hypot(dy),
    }
}

/// Aim dots left on the canvas. Bounded; the oldest dot goes first.
#[derive(Debug, Clone)]
pub struct LaserTrail {
    dots: VecDeque<Point>,
    capacity: usize,
}

impl LaserTrail {
    pub fn new(capacity: usize) -> Self {
        Self {
            dots: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, dot: Point) {
        if self.capacity == 0 {
            return;
        }
        while self.dots.len() >= self.capacity {
            self.dots.pop_front();
        }
        self.dots.push_back(dot);
    }

    pub fn clear(&mut self) {
        self.dots.clear();
    }

    pub fn dots(&self) -> impl Iterator<Item = &Point> {
        self.dots.iter()
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}
