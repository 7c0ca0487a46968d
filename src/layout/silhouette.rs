// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Extent, Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    x: i32,
    level: i32,
}

/// Lower boundary of the occupied canvas area.
///
/// Each step covers `[x, next.x)` (the last one extends to infinity) and records the lowest
/// occupied y over that span. Steps are sorted by `x`, start at `x = 0` and neighbouring
/// steps never share a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Silhouette {
    steps: Vec<Step>,
}

impl Default for Silhouette {
    fn default() -> Self {
        Self { steps: vec![Step { x: 0, level: 0 }] }
    }
}

impl Silhouette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_obstacles(obstacles: impl IntoIterator<Item = Rect>) -> Self {
        let mut silhouette = Self::new();
        for obstacle in obstacles {
            silhouette.integrate(obstacle);
        }
        silhouette
    }

    /// `(x, level)` pairs, left to right.
    pub fn breakpoints(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.steps.iter().map(|step| (step.x, step.level))
    }

    /// Pushes the boundary down to `obstacle.bottom` wherever the obstacle spans.
    pub fn integrate(&mut self, obstacle: Rect) {
        let left = obstacle.left.max(0);
        let right = obstacle.right;
        if right <= left || obstacle.bottom <= 0 {
            return;
        }

        let first = self.split_at(left);
        let end = self.split_at(right);
        for step in &mut self.steps[first..end] {
            step.level = step.level.max(obstacle.bottom);
        }
        self.steps.dedup_by(|current, previous| current.level == previous.level);
    }

    /// Highest level found over `[x, x + width)`.
    pub fn level_over(&self, x: i32, width: i32) -> i32 {
        let end = x.saturating_add(width);
        let mut level = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.x >= end {
                break;
            }
            let next_x = self.steps.get(index + 1).map_or(i32::MAX, |next| next.x);
            if next_x > x {
                level = level.max(step.level);
            }
        }
        level
    }

    /// Top-left corner of the best free breach for a footprint of `width`.
    ///
    /// Candidates start at every breakpoint; the one with the smallest resulting top wins,
    /// ties going to the leftmost. Candidates that would cross `canvas_width` only count if
    /// no candidate fits, in which case the one overshooting least is taken.
    pub fn find_breach(&self, width: i32, canvas_width: Option<i32>) -> Point {
        let mut best: Option<(i32, i32, i32)> = None;
        for step in &self.steps {
            let x = step.x;
            let y = self.level_over(x, width);
            let overshoot = canvas_width.map_or(0, |limit| (x.saturating_add(width) - limit).max(0));
            let candidate = (overshoot, y, x);
            if best.map_or(true, |current| candidate < current) {
                best = Some(candidate);
            }
        }
        let (overshoot, y, x) = best.unwrap_or((0, 0, 0));
        tracing::trace!(x, y, overshoot, width, "silhouette breach");
        Point::new(x, y)
    }

    fn split_at(&mut self, x: i32) -> usize {
        let index = self.steps.partition_point(|step| step.x <= x).saturating_sub(1);
        if self.steps[index].x == x {
            return index;
        }
        let level = self.steps[index].level;
        self.steps.insert(index + 1, Step { x, level });
        index + 1
    }
}

/// Position for a new diagram of `extent` that keeps clear of every obstacle.
///
/// Obstacles are the gapped bounds of the placements already on the canvas; the returned
/// position already includes the new diagram's own leading gap.
pub fn allocate(
    obstacles: impl IntoIterator<Item = Rect>,
    extent: Extent,
    gap: i32,
    canvas_width: Option<i32>,
) -> Point {
    let silhouette = Silhouette::from_obstacles(obstacles);
    let footprint = extent.width.saturating_add(gap);
    silhouette.find_breach(footprint, canvas_width).offset(gap, gap)
}
