// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// Canvas coordinates; `y` grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
}

impl Extent {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Half-open rectangle `[left, right) x [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn at(origin: Point, extent: Extent) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            right: origin.x.saturating_add(extent.width),
            bottom: origin.y.saturating_add(extent.height),
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Grows the rectangle by `margin` towards the top and the left only.
    ///
    /// Every placement reserves its gap on those two sides, so two gapped rectangles that
    /// merely touch still leave one full gap between the diagrams themselves.
    pub fn with_leading_margin(&self, margin: i32) -> Self {
        Self {
            left: self.left.saturating_sub(margin),
            top: self.top.saturating_sub(margin),
            ..*self
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    pub fn contains(&self, point: Point) -> bool {
        self.left <= point.x && point.x < self.right && self.top <= point.y && point.y < self.bottom
    }

    pub fn union(&self, other: &Rect) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Extent, Point, Rect};

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::at(Point::new(0, 0), Extent::new(10, 10));
        let b = Rect::at(Point::new(10, 0), Extent::new(10, 10));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::at(Point::new(9, 9), Extent::new(1, 1))));
    }

    #[test]
    fn leading_margin_only_grows_top_left() {
        let rect = Rect::at(Point::new(20, 30), Extent::new(5, 5)).with_leading_margin(10);
        assert_eq!(rect, Rect { left: 10, top: 20, right: 25, bottom: 35 });
    }
}
