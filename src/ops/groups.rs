// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Group, GroupName, PlacementId, Plan};

use super::invariant_violation;
use super::registry::PlanRegistry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    #[error("a group named {name:?} already exists")]
    NameCollision { name: GroupName },
    #[error("the group name {name:?} is reserved")]
    Reserved { name: GroupName },
    #[error("group {name:?} would be created without members")]
    Empty { name: GroupName },
    #[error("no group named {name:?}")]
    UnknownGroup { name: GroupName },
    #[error("no placement with id {id}")]
    UnknownPlacement { id: PlacementId },
}

/// Outcome of detaching one placement from one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberRemoval {
    pub removed: bool,
    /// The placement lost its last group and now lives in the default group.
    pub rehomed: bool,
    /// The group was emptied but kept because it is associated with a saved file.
    pub kept_empty: bool,
    /// The group was emptied and deleted.
    pub group_deleted: bool,
}

/// Outcome of deleting a whole group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDeletion {
    pub destroyed: Vec<PlacementId>,
    pub rehomed: Vec<PlacementId>,
    pub detached: Vec<PlacementId>,
}

/// Named groups plus the implicit default group.
///
/// Every method that changes membership updates the group's member set and the
/// placement's group names together.
#[derive(Debug, Default)]
pub struct GroupStore {
    groups: BTreeMap<GroupName, Group>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &GroupName) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn contains(&self, name: &GroupName) -> bool {
        self.groups.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All groups including the default one, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.values()
    }

    pub fn default_group(&self) -> Option<&Group> {
        self.groups.get(GroupName::DEFAULT)
    }

    pub(crate) fn get_mut(&mut self, name: &GroupName) -> Option<&mut Group> {
        self.groups.get_mut(name)
    }

    /// Returns the key of the (possibly new, empty) group.
    pub fn ensure_group(&mut self, name: &GroupName) -> GroupName {
        if !self.groups.contains_key(name) {
            tracing::debug!(group = %name, "group created");
            self.groups.insert(name.clone(), Group::new(name.clone()));
        }
        name.clone()
    }

    /// Creates a named group holding `members`.
    pub fn create<P: Plan>(
        &mut self,
        registry: &mut PlanRegistry<P>,
        name: &GroupName,
        members: &[PlacementId],
    ) -> Result<GroupName, GroupError> {
        if name.is_default() {
            return Err(GroupError::Reserved { name: name.clone() });
        }
        if self.groups.contains_key(name) {
            return Err(GroupError::NameCollision { name: name.clone() });
        }
        if members.is_empty() {
            return Err(GroupError::Empty { name: name.clone() });
        }
        if let Some(unknown) = members.iter().find(|id| !registry.contains(**id)) {
            return Err(GroupError::UnknownPlacement { id: *unknown });
        }

        self.ensure_group(name);
        for id in members {
            self.add_member(registry, name, *id);
        }
        Ok(name.clone())
    }

    /// Adds `id` to `group`, creating the group if needed.
    ///
    /// Joining a named group takes the placement out of the default group. The default
    /// group only takes placements that have no named group.
    pub fn add_member<P: Plan>(
        &mut self,
        registry: &mut PlanRegistry<P>,
        group: &GroupName,
        id: PlacementId,
    ) -> bool {
        let Some(placement) = registry.get_mut(id) else {
            return false;
        };
        if group.is_default() && placement.group_names().iter().any(|g| !g.is_default()) {
            return false;
        }
        let key = self.ensure_group(group);
        let Some(target) = self.groups.get_mut(&key) else {
            return false;
        };

        let added = target.insert_member(id);
        let linked = placement.link_group(&key);
        if added != linked {
            invariant_violation("group membership and placement links disagreed");
        }
        if added {
            tracing::debug!(group = %key, placement = %id, "member added");
        }

        if !key.is_default() && placement.is_in_group(&GroupName::default_group()) {
            let default_key = GroupName::default_group();
            placement.unlink_group(&default_key);
            if let Some(default_group) = self.groups.get_mut(&default_key) {
                default_group.remove_member(id);
            }
            self.prune_if_empty(&default_key);
        }
        added
    }

    /// Detaches `id` from `group`; a placement left without groups moves to the default
    /// group.
    pub fn remove_member<P: Plan>(
        &mut self,
        registry: &mut PlanRegistry<P>,
        group: &GroupName,
        id: PlacementId,
    ) -> MemberRemoval {
        let is_member = self.groups.get(group).is_some_and(|g| g.contains(id));
        if !is_member {
            invariant_violation("remove_member called for a non-member");
            return MemberRemoval::default();
        }

        let mut outcome = MemberRemoval { removed: true, ..MemberRemoval::default() };
        if let Some(g) = self.groups.get_mut(group) {
            g.remove_member(id);
        }
        if let Some(placement) = registry.get_mut(id) {
            placement.unlink_group(group);
            if placement.group_names().is_empty() {
                self.rehome(registry, id);
                outcome.rehomed = true;
            }
        }
        tracing::debug!(group = %group, placement = %id, rehomed = outcome.rehomed, "member removed");

        if self.groups.get(group).is_some_and(Group::is_empty) {
            if self.prune_if_empty(group) {
                outcome.group_deleted = true;
            } else {
                outcome.kept_empty = true;
            }
        }
        outcome
    }

    /// Removes `id` from every group without re-homing it; the caller is about to destroy
    /// the placement.
    pub(crate) fn detach_all<P: Plan>(&mut self, registry: &mut PlanRegistry<P>, id: PlacementId) {
        let Some(placement) = registry.get_mut(id) else {
            return;
        };
        let names: Vec<GroupName> = placement.group_names().to_vec();
        for name in &names {
            placement.unlink_group(name);
            if let Some(group) = self.groups.get_mut(name) {
                group.remove_member(id);
            }
        }
        for name in &names {
            self.prune_if_empty(name);
        }
    }

    /// Removes the group; members left without any group move to the default group.
    pub fn dissolve<P: Plan>(
        &mut self,
        registry: &mut PlanRegistry<P>,
        name: &GroupName,
    ) -> Result<Vec<PlacementId>, GroupError> {
        if name.is_default() {
            return Err(GroupError::Reserved { name: name.clone() });
        }
        let group = self
            .groups
            .remove(name)
            .ok_or_else(|| GroupError::UnknownGroup { name: name.clone() })?;

        let mut rehomed = Vec::new();
        for id in group.members() {
            let Some(placement) = registry.get_mut(*id) else {
                continue;
            };
            placement.unlink_group(name);
            if placement.group_names().is_empty() {
                self.rehome(registry, *id);
                rehomed.push(*id);
            }
        }
        tracing::debug!(group = %name, rehomed = rehomed.len(), "group dissolved");
        Ok(rehomed)
    }

    /// Deletes the group. With `with_members`, members not shared with another group are
    /// destroyed; shared ones only lose this membership.
    pub fn delete<P: Plan>(
        &mut self,
        registry: &mut PlanRegistry<P>,
        name: &GroupName,
        with_members: bool,
    ) -> Result<GroupDeletion, GroupError> {
        if !with_members {
            let detached: Vec<PlacementId> = self
                .groups
                .get(name)
                .map(|group| {
                    group
                        .members()
                        .iter()
                        .copied()
                        .filter(|id| {
                            registry.get(*id).is_some_and(|p| p.group_names().iter().any(|g| g != name))
                        })
                        .collect()
                })
                .unwrap_or_default();
            let rehomed = self.dissolve(registry, name)?;
            return Ok(GroupDeletion { destroyed: Vec::new(), rehomed, detached });
        }

        let group = self
            .groups
            .remove(name)
            .ok_or_else(|| GroupError::UnknownGroup { name: name.clone() })?;

        let mut deletion = GroupDeletion::default();
        for id in group.members() {
            let Some(placement) = registry.get_mut(*id) else {
                continue;
            };
            placement.unlink_group(name);
            if placement.group_names().is_empty() {
                registry.take(*id);
                deletion.destroyed.push(*id);
            } else {
                deletion.detached.push(*id);
            }
        }
        tracing::debug!(
            group = %name,
            destroyed = deletion.destroyed.len(),
            detached = deletion.detached.len(),
            "group deleted with members"
        );
        Ok(deletion)
    }

    /// Renames a named group; fails without side effects if `new_name` is taken.
    pub fn rename<P: Plan>(
        &mut self,
        registry: &mut PlanRegistry<P>,
        old_name: &GroupName,
        new_name: &GroupName,
    ) -> Result<(), GroupError> {
        if old_name.is_default() {
            return Err(GroupError::Reserved { name: old_name.clone() });
        }
        if new_name.is_default() {
            return Err(GroupError::Reserved { name: new_name.clone() });
        }
        if !self.groups.contains_key(old_name) {
            return Err(GroupError::UnknownGroup { name: old_name.clone() });
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.groups.contains_key(new_name) {
            return Err(GroupError::NameCollision { name: new_name.clone() });
        }

        let Some(mut group) = self.groups.remove(old_name) else {
            return Err(GroupError::UnknownGroup { name: old_name.clone() });
        };
        for id in group.members() {
            if let Some(placement) = registry.get_mut(*id) {
                placement.unlink_group(old_name);
                placement.link_group(new_name);
            }
        }
        group.set_name(new_name.clone());
        group.mark_membership_changed();
        self.groups.insert(new_name.clone(), group);
        tracing::debug!(from = %old_name, to = %new_name, "group renamed");
        Ok(())
    }

    /// Groups whose member set contains `id`, derived from the group side.
    pub fn groups_of(&self, id: PlacementId) -> BTreeSet<GroupName> {
        self.groups
            .values()
            .filter(|group| group.contains(id))
            .map(|group| group.name().clone())
            .collect()
    }

    /// Named groups whose member set is exactly `members`.
    pub fn congruent_groups(&self, members: &BTreeSet<PlacementId>) -> Vec<GroupName> {
        self.groups
            .values()
            .filter(|group| !group.is_default() && group.members() == members)
            .map(|group| group.name().clone())
            .collect()
    }

    /// Whether members were added/removed or moved since the group was last saved.
    pub fn has_changed<P: Plan>(&self, registry: &PlanRegistry<P>, name: &GroupName) -> bool {
        self.groups.get(name).is_some_and(|group| {
            group.membership_changed() || self.positions_changed(registry, group)
        })
    }

    pub fn positions_changed<P: Plan>(&self, registry: &PlanRegistry<P>, group: &Group) -> bool {
        group
            .members()
            .iter()
            .any(|id| registry.get(*id).is_some_and(|placement| placement.was_moved()))
    }

    fn rehome<P: Plan>(&mut self, registry: &mut PlanRegistry<P>, id: PlacementId) {
        let default_key = self.ensure_group(&GroupName::default_group());
        if let Some(placement) = registry.get_mut(id) {
            placement.link_group(&default_key);
        }
        if let Some(group) = self.groups.get_mut(&default_key) {
            group.insert_member(id);
        }
    }

    /// Drops an emptied group unless it is a named group tied to a saved file.
    fn prune_if_empty(&mut self, name: &GroupName) -> bool {
        let removable = self
            .groups
            .get(name)
            .is_some_and(|group| group.is_empty() && (group.is_default() || group.provenance().is_none()));
        if removable {
            self.groups.remove(name);
            tracing::debug!(group = %name, "empty group removed");
        }
        removable
    }

    /// Drops a group that has become empty regardless of its provenance.
    pub(crate) fn discard_if_empty(&mut self, name: &GroupName) -> bool {
        if self.groups.get(name).is_some_and(Group::is_empty) {
            self.groups.remove(name);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{GroupError, GroupStore};
    use crate::model::fixtures::TestPlan;
    use crate::model::{GroupName, PlacementId, Point};
    use crate::ops::registry::PlanRegistry;

    fn name(value: &str) -> GroupName {
        GroupName::new(value).unwrap()
    }

    fn setup(count: u64) -> (PlanRegistry<TestPlan>, GroupStore, Vec<PlacementId>) {
        let mut registry = PlanRegistry::new();
        let mut store = GroupStore::new();
        let mut ids = Vec::new();
        for n in 0..count {
            let id = registry.add(TestPlan::program(n, &format!("p{n}")), Point::new(0, 0));
            store.add_member(&mut registry, &GroupName::default_group(), id);
            ids.push(id);
        }
        (registry, store, ids)
    }

    fn assert_symmetric(registry: &PlanRegistry<TestPlan>, store: &GroupStore) {
        for placement in registry.iter() {
            let from_groups = store.groups_of(placement.id());
            let from_placement: BTreeSet<GroupName> =
                placement.group_names().iter().cloned().collect();
            assert_eq!(from_groups, from_placement, "placement {}", placement.id());
            assert!(!from_placement.is_empty(), "placement {} is orphaned", placement.id());
        }
    }

    #[test]
    fn joining_a_named_group_leaves_the_default_group() {
        let (mut registry, mut store, ids) = setup(2);
        store.create(&mut registry, &name("A"), &[ids[0]]).unwrap();

        assert_eq!(store.groups_of(ids[0]), BTreeSet::from([name("A")]));
        assert_eq!(store.groups_of(ids[1]), BTreeSet::from([GroupName::default_group()]));
        assert_symmetric(&registry, &store);
    }

    #[test]
    fn default_group_disappears_when_emptied() {
        let (mut registry, mut store, ids) = setup(1);
        assert!(store.default_group().is_some());
        store.create(&mut registry, &name("A"), &ids).unwrap();
        assert!(store.default_group().is_none());
    }

    #[test]
    fn removing_last_membership_rehomes_to_default() {
        let (mut registry, mut store, ids) = setup(1);
        store.create(&mut registry, &name("A"), &ids).unwrap();

        let outcome = store.remove_member(&mut registry, &name("A"), ids[0]);
        assert!(outcome.removed && outcome.rehomed && outcome.group_deleted);
        assert!(!store.contains(&name("A")));
        assert_eq!(store.groups_of(ids[0]), BTreeSet::from([GroupName::default_group()]));
        assert_symmetric(&registry, &store);
    }

    #[test]
    fn emptied_group_with_provenance_is_kept() {
        let (mut registry, mut store, ids) = setup(1);
        store.create(&mut registry, &name("A"), &ids).unwrap();
        store.get_mut(&name("A")).unwrap().mark_saved("a.arr".to_owned());

        let outcome = store.remove_member(&mut registry, &name("A"), ids[0]);
        assert!(outcome.kept_empty);
        assert!(store.get(&name("A")).unwrap().is_empty());
        assert!(store.discard_if_empty(&name("A")));
        assert!(!store.contains(&name("A")));
    }

    #[test]
    fn create_rejects_reserved_taken_and_empty() {
        let (mut registry, mut store, ids) = setup(1);
        assert_eq!(
            store.create(&mut registry, &GroupName::default_group(), &ids),
            Err(GroupError::Reserved { name: GroupName::default_group() })
        );
        store.create(&mut registry, &name("A"), &ids).unwrap();
        assert_eq!(
            store.create(&mut registry, &name("A"), &ids),
            Err(GroupError::NameCollision { name: name("A") })
        );
        assert_eq!(
            store.create(&mut registry, &name("B"), &[]),
            Err(GroupError::Empty { name: name("B") })
        );
    }

    #[test]
    fn dissolve_rehomes_only_unshared_members() {
        let (mut registry, mut store, ids) = setup(2);
        store.create(&mut registry, &name("A"), &ids).unwrap();
        store.create(&mut registry, &name("B"), &ids[1..]).unwrap();

        let rehomed = store.dissolve(&mut registry, &name("A")).unwrap();
        assert_eq!(rehomed, vec![ids[0]]);
        assert_eq!(store.groups_of(ids[1]), BTreeSet::from([name("B")]));
        assert_symmetric(&registry, &store);
    }

    #[test]
    fn delete_with_members_destroys_unshared_only() {
        let (mut registry, mut store, ids) = setup(2);
        let (x, y) = (ids[0], ids[1]);
        store.create(&mut registry, &name("A"), &[x, y]).unwrap();
        store.create(&mut registry, &name("B"), &[y]).unwrap();

        let deletion = store.delete(&mut registry, &name("A"), true).unwrap();
        assert_eq!(deletion.destroyed, vec![x]);
        assert_eq!(deletion.detached, vec![y]);
        assert!(!registry.contains(x));
        assert_eq!(store.groups_of(y), BTreeSet::from([name("B")]));
        assert_symmetric(&registry, &store);
    }

    #[test]
    fn delete_keeping_members_reports_shared_as_detached() {
        let (mut registry, mut store, ids) = setup(2);
        let (x, y) = (ids[0], ids[1]);
        store.create(&mut registry, &name("A"), &[x, y]).unwrap();
        store.create(&mut registry, &name("B"), &[y]).unwrap();

        let deletion = store.delete(&mut registry, &name("A"), false).unwrap();
        assert!(deletion.destroyed.is_empty());
        assert_eq!(deletion.rehomed, vec![x]);
        assert_eq!(deletion.detached, vec![y]);
        assert_eq!(store.groups_of(x), BTreeSet::from([GroupName::default_group()]));
        assert_eq!(store.groups_of(y), BTreeSet::from([name("B")]));
        assert_symmetric(&registry, &store);
    }

    #[test]
    fn default_group_refuses_grouped_placements() {
        let (mut registry, mut store, ids) = setup(1);
        store.create(&mut registry, &name("A"), &ids).unwrap();

        assert!(!store.add_member(&mut registry, &GroupName::default_group(), ids[0]));
        assert_eq!(store.groups_of(ids[0]), BTreeSet::from([name("A")]));
        assert!(store.default_group().is_none());
        assert_symmetric(&registry, &store);
    }

    #[test]
    fn rename_swaps_keys_and_member_links() {
        let (mut registry, mut store, ids) = setup(2);
        store.create(&mut registry, &name("A"), &ids).unwrap();
        store.create(&mut registry, &name("B"), &ids[..1]).unwrap();

        assert_eq!(
            store.rename(&mut registry, &name("A"), &name("B")),
            Err(GroupError::NameCollision { name: name("B") })
        );
        assert!(store.contains(&name("A")));

        store.rename(&mut registry, &name("A"), &name("C")).unwrap();
        assert!(!store.contains(&name("A")));
        assert_eq!(store.get(&name("C")).unwrap().name(), &name("C"));
        assert_eq!(store.groups_of(ids[0]), BTreeSet::from([name("B"), name("C")]));
        assert_symmetric(&registry, &store);
    }

    #[test]
    fn congruent_groups_match_exact_member_sets() {
        let (mut registry, mut store, ids) = setup(3);
        store.create(&mut registry, &name("A"), &ids[..2]).unwrap();
        store.create(&mut registry, &name("B"), &ids[..2]).unwrap();
        store.create(&mut registry, &name("C"), &ids[..1]).unwrap();

        let wanted: BTreeSet<PlacementId> = ids[..2].iter().copied().collect();
        assert_eq!(store.congruent_groups(&wanted), vec![name("A"), name("B")]);
    }

    #[test]
    fn has_changed_tracks_members_and_moves() {
        let (mut registry, mut store, ids) = setup(1);
        store.create(&mut registry, &name("A"), &ids).unwrap();
        assert!(store.has_changed(&registry, &name("A")));

        store.get_mut(&name("A")).unwrap().mark_saved("a.arr".to_owned());
        assert!(!store.has_changed(&registry, &name("A")));

        registry.relocate(ids[0], Point::new(50, 50));
        assert!(store.has_changed(&registry, &name("A")));
    }
}
