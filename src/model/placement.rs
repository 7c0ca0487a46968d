// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use super::geometry::{Extent, Point, Rect};
use super::ids::{GroupName, PlacementId};
use super::plan::Plan;

/// A plan positioned on the canvas.
///
/// Group names mirror the membership sets of the groups; only the group store touches them.
#[derive(Debug, Clone)]
pub struct Placement<P> {
    id: PlacementId,
    plan: P,
    position: Point,
    pinned: bool,
    moved: bool,
    groups: SmallVec<[GroupName; 2]>,
}

impl<P: Plan> Placement<P> {
    pub(crate) fn new(id: PlacementId, plan: P, position: Point) -> Self {
        Self { id, plan, position, pinned: false, moved: false, groups: SmallVec::new() }
    }

    pub fn id(&self) -> PlacementId {
        self.id
    }

    pub fn plan(&self) -> &P {
        &self.plan
    }

    pub(crate) fn plan_mut(&mut self) -> &mut P {
        &mut self.plan
    }

    pub(crate) fn into_plan(self) -> P {
        self.plan
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        if self.position != position {
            self.position = position;
            self.moved = true;
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub(crate) fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    /// Set whenever the position changed since the last save.
    pub fn was_moved(&self) -> bool {
        self.moved
    }

    pub(crate) fn clear_moved(&mut self) {
        self.moved = false;
    }

    pub fn group_names(&self) -> &[GroupName] {
        &self.groups
    }

    pub fn is_in_group(&self, name: &GroupName) -> bool {
        self.groups.contains(name)
    }

    pub(crate) fn link_group(&mut self, name: &GroupName) -> bool {
        if self.groups.contains(name) {
            return false;
        }
        let at = self.groups.partition_point(|existing| existing < name);
        self.groups.insert(at, name.clone());
        true
    }

    pub(crate) fn unlink_group(&mut self, name: &GroupName) -> bool {
        match self.groups.iter().position(|existing| existing == name) {
            Some(at) => {
                self.groups.remove(at);
                true
            }
            None => false,
        }
    }

    pub fn extent_or(&self, fallback: Extent) -> Extent {
        match self.plan.extent() {
            Some(extent) if !extent.is_empty() => extent,
            _ => fallback,
        }
    }

    pub fn bounds(&self, fallback: Extent) -> Rect {
        Rect::at(self.position, self.extent_or(fallback))
    }

    /// Bounds including the gap every placement reserves above and to its left.
    pub fn gapped_bounds(&self, fallback: Extent, gap: i32) -> Rect {
        self.bounds(fallback).with_leading_margin(gap)
    }
}
