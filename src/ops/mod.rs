// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations on the arrangement.
//!
//! `ArrangementCore` owns the registry, the group store and the change bus. All mutation goes
//! through it so the placement/group links cannot drift apart, and every mutating call ends
//! by pushing change flags.

use std::collections::BTreeSet;

use crate::config::ArrangerConfig;
use crate::layout::allocate;
use crate::model::{Extent, GroupName, PlacementId, Plan, Point, Rect, Resemblance};
use crate::notify::{ChangeBus, ChangeFlags, ListenerId};

pub mod conflict;
mod group_ops;
pub mod groups;
pub mod registry;

pub use conflict::{Conflict, ConflictEntry};
pub use groups::{GroupDeletion, GroupError, GroupStore, MemberRemoval};
pub use registry::PlanRegistry;

/// Logs a broken internal contract; fatal in debug builds, ignored in release builds.
pub(crate) fn invariant_violation(what: &'static str) {
    tracing::error!(what, "invariant violation");
    debug_assert!(false, "invariant violation: {what}");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A new placement was created.
    Added,
    /// The very same plan was already present; nothing moved.
    AlreadyPresent,
    /// An equal plan was already present and was moved to the requested position.
    Moved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub id: PlacementId,
    pub disposition: Disposition,
    pub conflict: Option<Conflict>,
}

#[derive(Debug)]
pub struct ArrangementCore<P: Plan> {
    config: ArrangerConfig,
    registry: PlanRegistry<P>,
    groups: GroupStore,
    bus: ChangeBus,
    selection: BTreeSet<PlacementId>,
}

impl<P: Plan> Default for ArrangementCore<P> {
    fn default() -> Self {
        Self::new(ArrangerConfig::default())
    }
}

impl<P: Plan> ArrangementCore<P> {
    pub fn new(config: ArrangerConfig) -> Self {
        Self {
            config,
            registry: PlanRegistry::new(),
            groups: GroupStore::new(),
            bus: ChangeBus::new(),
            selection: BTreeSet::new(),
        }
    }

    pub fn config(&self) -> &ArrangerConfig {
        &self.config
    }

    pub fn registry(&self) -> &PlanRegistry<P> {
        &self.registry
    }

    pub fn groups(&self) -> &GroupStore {
        &self.groups
    }

    pub fn subscribe(&mut self, listener: impl FnMut(ChangeFlags) + 'static) -> ListenerId {
        self.bus.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn set_coalescing(&mut self, enabled: bool) {
        self.bus.set_coalescing(enabled);
    }

    /// Runs `f` with notifications coalesced into a single event.
    pub fn coalesced<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.bus.set_coalescing(true);
        let result = f(self);
        self.bus.set_coalescing(false);
        result
    }

    pub(crate) fn notify(&mut self, flags: ChangeFlags) {
        self.bus.notify(flags);
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut PlanRegistry<P>, &mut GroupStore) {
        (&mut self.registry, &mut self.groups)
    }

    /// Puts `plan` on the canvas.
    ///
    /// The identical plan is never added twice. An equal plan already present is moved to
    /// `position` instead (unless pinned). Otherwise a new placement is created, at
    /// `position` or at a free spot found by the allocator, and any same-name placements
    /// that differ from it are reported in the returned conflict.
    ///
    /// Passing the default group is the same as passing no group.
    pub fn insert(
        &mut self,
        plan: P,
        position: Option<Point>,
        group: Option<&GroupName>,
    ) -> Insertion {
        let group = group.filter(|name| !name.is_default());
        if let Some(existing) = self.registry.find_by_identity(&plan.identity()) {
            tracing::debug!(placement = %existing, "plan already present");
            self.join_group(existing, group);
            return Insertion { id: existing, disposition: Disposition::AlreadyPresent, conflict: None };
        }

        let signature = plan.signature();
        let mut equal = None;
        let mut differing = Vec::new();
        for &other in self.registry.find_by_name(signature.name()) {
            let level = plan.resemblance(self.registry[other].plan());
            match level {
                Resemblance::Identical | Resemblance::Equal => {
                    equal = Some(other);
                    break;
                }
                level if level.is_conflict() => differing.push((other, level)),
                _ => {}
            }
        }

        if let Some(existing) = equal {
            let mut disposition = Disposition::AlreadyPresent;
            if let Some(position) = position {
                if !self.registry[existing].is_pinned() && self.registry.relocate(existing, position) {
                    disposition = Disposition::Moved;
                    self.notify(ChangeFlags::POSITIONS | ChangeFlags::STATUS);
                }
            }
            tracing::debug!(placement = %existing, ?disposition, "equal plan already present");
            self.join_group(existing, group);
            return Insertion { id: existing, disposition, conflict: None };
        }

        let position = position.unwrap_or_else(|| self.free_position(self.extent_of(&plan), None));
        let id = self.registry.add(plan, position);
        let home = group.cloned().unwrap_or_else(GroupName::default_group);
        self.groups.add_member(&mut self.registry, &home, id);
        tracing::debug!(placement = %id, signature = %signature, x = position.x, y = position.y, "plan inserted");

        let entries: Vec<ConflictEntry> = differing
            .into_iter()
            .filter_map(|(other, level)| ConflictEntry::describe(&self.registry, other, level))
            .collect();
        let conflict = if entries.is_empty() {
            None
        } else {
            tracing::debug!(placement = %id, conflicts = entries.len(), "insertion conflicts");
            Some(Conflict { inserted: id, signature, entries })
        };

        self.notify(ChangeFlags::POOL);
        Insertion { id, disposition: Disposition::Added, conflict }
    }

    pub fn relocate(&mut self, id: PlacementId, position: Point) -> bool {
        if !self.registry.relocate(id, position) {
            return false;
        }
        tracing::debug!(placement = %id, x = position.x, y = position.y, "placement relocated");
        self.notify(ChangeFlags::POSITIONS | ChangeFlags::STATUS);
        true
    }

    /// Destroys the placement and returns its plan.
    pub fn remove(&mut self, id: PlacementId) -> Option<P> {
        if !self.registry.contains(id) {
            return None;
        }
        self.groups.detach_all(&mut self.registry, id);
        let placement = self.registry.take(id)?;
        let mut flags = ChangeFlags::POOL;
        if self.selection.remove(&id) {
            flags |= ChangeFlags::SELECTION;
        }
        tracing::debug!(placement = %id, "placement removed");
        self.notify(flags);
        Some(placement.into_plan())
    }

    pub fn remove_all(&mut self) -> usize {
        self.coalesced(|core| {
            let ids = core.registry.ids();
            ids.into_iter().filter(|id| core.remove(*id).is_some()).count()
        })
    }

    pub fn raise_to_top(&mut self, id: PlacementId) -> bool {
        let raised = self.registry.raise_to_top(id);
        if raised {
            self.notify(ChangeFlags::POSITIONS);
        }
        raised
    }

    pub fn find_by_identity(&self, identity: &P::Identity) -> Option<PlacementId> {
        self.registry.find_by_identity(identity)
    }

    pub fn find_by_name(&self, name: &str) -> &[PlacementId] {
        self.registry.find_by_name(name)
    }

    pub fn resolve_reference(
        &self,
        discriminator: PlacementId,
        signature: &crate::model::Signature,
        filter_by_groups: bool,
    ) -> Vec<PlacementId> {
        self.registry.resolve_reference(discriminator, signature, filter_by_groups)
    }

    pub fn set_pinned(&mut self, id: PlacementId, pinned: bool) -> bool {
        let Some(placement) = self.registry.get_mut(id) else {
            return false;
        };
        if placement.is_pinned() != pinned {
            placement.set_pinned(pinned);
            self.notify(ChangeFlags::STATUS);
        }
        true
    }

    pub fn toggle_pinned(&mut self, id: PlacementId) -> Option<bool> {
        let pinned = !self.registry.get(id)?.is_pinned();
        self.set_pinned(id, pinned);
        Some(pinned)
    }

    /// Mutates a held plan in place.
    ///
    /// Name and identity indexes follow the change. If the plan grew into its neighbours,
    /// the colliding unpinned placements are moved to free spots (or the plan itself, when a
    /// pinned neighbour is in the way).
    pub fn update_plan<R>(&mut self, id: PlacementId, f: impl FnOnce(&mut P) -> R) -> Option<R> {
        let placement = self.registry.get_mut(id)?;
        let old_identity = placement.plan().identity();
        let old_signature = placement.plan().signature();
        let old_extent = placement.plan().extent();

        let result = f(placement.plan_mut());
        let new_signature = placement.plan().signature();
        let new_extent = placement.plan().extent();

        let mut flags = ChangeFlags::STATUS;
        self.registry.reindex(id, old_signature.name(), &old_identity);
        if new_signature != old_signature {
            tracing::debug!(placement = %id, from = %old_signature, to = %new_signature, "signature changed");
            flags |= ChangeFlags::NAME;
        }
        if new_extent != old_extent && self.resolve_collisions(id) {
            flags |= ChangeFlags::POSITIONS;
        }
        self.notify(flags);
        Some(result)
    }

    /// Re-places every unpinned placement in draw order; pinned ones stay where they are.
    pub fn rearrange(&mut self) {
        self.coalesced(|core| {
            let gap = core.config.gap;
            let fallback = core.config.default_extent;
            let mut obstacles: Vec<Rect> = core
                .registry
                .iter()
                .filter(|placement| placement.is_pinned())
                .map(|placement| placement.gapped_bounds(fallback, gap))
                .collect();

            let mut moves = Vec::new();
            for placement in core.registry.iter().filter(|placement| !placement.is_pinned()) {
                let extent = placement.extent_or(fallback);
                let position =
                    allocate(obstacles.iter().copied(), extent, gap, core.config.canvas_width);
                obstacles.push(Rect::at(position, extent).with_leading_margin(gap));
                moves.push((placement.id(), position));
            }

            let mut moved = false;
            for (id, position) in moves {
                if core.registry.get(id).is_some_and(|placement| placement.position() != position) {
                    core.registry.relocate(id, position);
                    moved = true;
                }
            }
            tracing::debug!(placements = core.registry.len(), moved, "arrangement rebuilt");
            if moved {
                core.notify(ChangeFlags::POSITIONS | ChangeFlags::STATUS);
            }
        });
    }

    pub fn selection(&self) -> &BTreeSet<PlacementId> {
        &self.selection
    }

    pub fn is_selected(&self, id: PlacementId) -> bool {
        self.selection.contains(&id)
    }

    /// Adds to (or with `selected == false` removes from) the selection.
    pub fn select(&mut self, id: PlacementId, selected: bool) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        let changed = if selected { self.selection.insert(id) } else { self.selection.remove(&id) };
        if changed {
            self.notify(ChangeFlags::SELECTION);
        }
        changed
    }

    pub fn select_only(&mut self, id: PlacementId) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        if self.selection.len() == 1 && self.selection.contains(&id) {
            return false;
        }
        self.selection.clear();
        self.selection.insert(id);
        self.notify(ChangeFlags::SELECTION);
        true
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.notify(ChangeFlags::SELECTION);
        }
    }

    /// Bounding box of all placements, `None` on an empty canvas.
    pub fn drawing_rect(&self) -> Option<Rect> {
        let fallback = self.config.default_extent;
        self.registry
            .iter()
            .map(|placement| placement.bounds(fallback))
            .reduce(|acc, bounds| acc.union(&bounds))
    }

    /// Topmost placement under `point`.
    pub fn placement_at(&self, point: Point) -> Option<PlacementId> {
        let fallback = self.config.default_extent;
        self.registry
            .iter()
            .rev()
            .find(|placement| placement.bounds(fallback).contains(point))
            .map(|placement| placement.id())
    }

    pub(crate) fn extent_of(&self, plan: &P) -> Extent {
        match plan.extent() {
            Some(extent) if !extent.is_empty() => extent,
            _ => self.config.default_extent,
        }
    }

    /// Free position for `extent`, ignoring `except` when given.
    fn free_position(&self, extent: Extent, except: Option<PlacementId>) -> Point {
        let gap = self.config.gap;
        let fallback = self.config.default_extent;
        let obstacles = self
            .registry
            .iter()
            .filter(|placement| Some(placement.id()) != except)
            .map(|placement| placement.gapped_bounds(fallback, gap));
        allocate(obstacles, extent, gap, self.config.canvas_width)
    }

    fn colliders(&self, id: PlacementId) -> Vec<PlacementId> {
        let gap = self.config.gap;
        let fallback = self.config.default_extent;
        let Some(bounds) = self.registry.get(id).map(|p| p.gapped_bounds(fallback, gap)) else {
            return Vec::new();
        };
        self.registry
            .iter()
            .filter(|other| other.id() != id && other.gapped_bounds(fallback, gap).intersects(&bounds))
            .map(|other| other.id())
            .collect()
    }

    fn resolve_collisions(&mut self, id: PlacementId) -> bool {
        let colliders = self.colliders(id);
        if colliders.is_empty() {
            return false;
        }
        let fallback = self.config.default_extent;
        let self_pinned = self.registry.get(id).is_some_and(|p| p.is_pinned());
        let blocked_by_pinned =
            colliders.iter().any(|other| self.registry.get(*other).is_some_and(|p| p.is_pinned()));

        let to_move: Vec<PlacementId> = if blocked_by_pinned && !self_pinned {
            vec![id]
        } else {
            colliders
                .into_iter()
                .filter(|other| self.registry.get(*other).is_some_and(|p| !p.is_pinned()))
                .collect()
        };

        for mover in &to_move {
            let Some(extent) = self.registry.get(*mover).map(|p| p.extent_or(fallback)) else {
                continue;
            };
            let position = self.free_position(extent, Some(*mover));
            self.registry.relocate(*mover, position);
            tracing::debug!(placement = %mover, x = position.x, y = position.y, "moved out of the way");
        }
        !to_move.is_empty()
    }

    fn join_group(&mut self, id: PlacementId, group: Option<&GroupName>) {
        if let Some(group) = group {
            if self.groups.add_member(&mut self.registry, group, id) {
                self.notify(ChangeFlags::POOL);
            }
        }
    }
}
