// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::ops::Index;

use indexmap::IndexMap;
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::model::{Placement, PlacementId, Plan, Point, Signature};

/// Canonical set of placements.
///
/// Iteration order is the draw order (last is on top). The identity and name indexes are
/// updated in the same calls that touch the ordered map.
#[derive(Debug)]
pub struct PlanRegistry<P: Plan> {
    placements: IndexMap<PlacementId, Placement<P>>,
    by_identity: HashMap<P::Identity, PlacementId>,
    by_name: HashMap<SmolStr, SmallVec<[PlacementId; 2]>>,
    next_id: u64,
}

impl<P: Plan> Default for PlanRegistry<P> {
    fn default() -> Self {
        Self {
            placements: IndexMap::new(),
            by_identity: HashMap::new(),
            by_name: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<P: Plan> PlanRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn contains(&self, id: PlacementId) -> bool {
        self.placements.contains_key(&id)
    }

    pub fn get(&self, id: PlacementId) -> Option<&Placement<P>> {
        self.placements.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: PlacementId) -> Option<&mut Placement<P>> {
        self.placements.get_mut(&id)
    }

    /// Placements in draw order, bottom first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Placement<P>> + '_ {
        self.placements.values()
    }

    pub fn ids(&self) -> Vec<PlacementId> {
        self.placements.keys().copied().collect()
    }

    pub fn find_by_identity(&self, identity: &P::Identity) -> Option<PlacementId> {
        self.by_identity.get(identity).copied()
    }

    pub fn find_by_name(&self, name: &str) -> &[PlacementId] {
        self.by_name.get(name).map_or(&[], |ids| ids.as_slice())
    }

    pub(crate) fn add(&mut self, plan: P, position: Point) -> PlacementId {
        let id = PlacementId::from_raw(self.next_id);
        self.next_id += 1;

        self.by_identity.insert(plan.identity(), id);
        self.by_name.entry(SmolStr::new(plan.signature().name())).or_default().push(id);
        self.placements.insert(id, Placement::new(id, plan, position));
        id
    }

    pub(crate) fn take(&mut self, id: PlacementId) -> Option<Placement<P>> {
        let placement = self.placements.shift_remove(&id)?;
        self.by_identity.remove(&placement.plan().identity());
        self.unindex_name(placement.plan().signature().name(), id);
        Some(placement)
    }

    /// Moves the placement to the end of the draw order.
    pub(crate) fn raise_to_top(&mut self, id: PlacementId) -> bool {
        let Some(index) = self.placements.get_index_of(&id) else {
            return false;
        };
        let last = self.placements.len() - 1;
        if index != last {
            self.placements.move_index(index, last);
        }
        true
    }

    pub(crate) fn relocate(&mut self, id: PlacementId, position: Point) -> bool {
        match self.placements.get_mut(&id) {
            Some(placement) => {
                placement.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Re-files a placement whose plan may have changed name or identity.
    pub(crate) fn reindex(&mut self, id: PlacementId, old_name: &str, old_identity: &P::Identity) {
        let Some(placement) = self.placements.get(&id) else {
            return;
        };
        let identity = placement.plan().identity();
        let name = placement.plan().signature().name().to_owned();

        if &identity != old_identity {
            self.by_identity.remove(old_identity);
            self.by_identity.insert(identity, id);
        }
        if name != old_name {
            self.unindex_name(old_name, id);
            self.by_name.entry(SmolStr::new(&name)).or_default().push(id);
        }
    }

    /// Placements able to serve `signature`, those sharing a group with `discriminator`
    /// first.
    ///
    /// Narrowing only reorders: when no candidate shares a group, or `filter_by_groups` is
    /// off, every candidate is still returned.
    pub fn resolve_reference(
        &self,
        discriminator: PlacementId,
        signature: &Signature,
        filter_by_groups: bool,
    ) -> Vec<PlacementId> {
        let (mut preferred, others) = self.reference_tiers(discriminator, signature, filter_by_groups);
        preferred.extend(others);
        preferred
    }

    pub(crate) fn reference_tiers(
        &self,
        discriminator: PlacementId,
        signature: &Signature,
        filter_by_groups: bool,
    ) -> (Vec<PlacementId>, Vec<PlacementId>) {
        let candidates = self.find_by_name(signature.name()).iter().copied().filter(|id| {
            self.get(*id).is_some_and(|placement| placement.plan().signature().satisfies(signature))
        });

        let home = self.get(discriminator).map(|placement| placement.group_names());
        match home {
            Some(home) if filter_by_groups => candidates.partition(|id| {
                self.get(*id).is_some_and(|candidate| {
                    candidate.group_names().iter().any(|name| home.contains(name))
                })
            }),
            _ => (candidates.collect(), Vec::new()),
        }
    }

    fn unindex_name(&mut self, name: &str, id: PlacementId) {
        if let Some(ids) = self.by_name.get_mut(name) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                self.by_name.remove(name);
            }
        }
    }
}

impl<P: Plan> Index<PlacementId> for PlanRegistry<P> {
    type Output = Placement<P>;

    fn index(&self, id: PlacementId) -> &Self::Output {
        &self.placements[&id]
    }
}
