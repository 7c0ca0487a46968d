// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use crate::model::{GroupName, PlacementId, Plan, Rgb};
use crate::notify::ChangeFlags;
use crate::query::{expand_closure, ClosureReport};

use super::groups::{GroupDeletion, GroupError, MemberRemoval};
use super::ArrangementCore;

impl<P: Plan> ArrangementCore<P> {
    pub fn create_group(
        &mut self,
        name: &GroupName,
        members: &[PlacementId],
    ) -> Result<GroupName, GroupError> {
        let created = self.groups.create(&mut self.registry, name, members)?;
        self.notify(ChangeFlags::POOL);
        Ok(created)
    }

    pub fn add_to_group(&mut self, group: &GroupName, id: PlacementId) -> Result<bool, GroupError> {
        if group.is_default() {
            return Err(GroupError::Reserved { name: group.clone() });
        }
        if !self.registry.contains(id) {
            return Err(GroupError::UnknownPlacement { id });
        }
        let added = self.groups.add_member(&mut self.registry, group, id);
        if added {
            self.notify(ChangeFlags::POOL);
        }
        Ok(added)
    }

    pub fn remove_from_group(
        &mut self,
        group: &GroupName,
        id: PlacementId,
    ) -> Result<MemberRemoval, GroupError> {
        let Some(existing) = self.groups.get(group) else {
            return Err(GroupError::UnknownGroup { name: group.clone() });
        };
        if !existing.contains(id) {
            return Err(GroupError::UnknownPlacement { id });
        }
        let removal = self.groups.remove_member(&mut self.registry, group, id);
        self.notify(ChangeFlags::POOL);
        Ok(removal)
    }

    pub fn dissolve_group(&mut self, name: &GroupName) -> Result<Vec<PlacementId>, GroupError> {
        let rehomed = self.groups.dissolve(&mut self.registry, name)?;
        self.notify(ChangeFlags::POOL);
        Ok(rehomed)
    }

    pub fn delete_group(
        &mut self,
        name: &GroupName,
        with_members: bool,
    ) -> Result<GroupDeletion, GroupError> {
        let deletion = self.groups.delete(&mut self.registry, name, with_members)?;
        let mut flags = ChangeFlags::POOL;
        for id in &deletion.destroyed {
            if self.selection.remove(id) {
                flags |= ChangeFlags::SELECTION;
            }
        }
        self.notify(flags);
        Ok(deletion)
    }

    /// Drops an emptied group that was kept for its file association, once the caller
    /// confirmed.
    pub fn discard_empty_group(&mut self, name: &GroupName) -> bool {
        let discarded = self.groups.discard_if_empty(name);
        if discarded {
            tracing::debug!(group = %name, "empty group discarded");
            self.notify(ChangeFlags::POOL);
        }
        discarded
    }

    pub fn rename_group(&mut self, old_name: &GroupName, new_name: &GroupName) -> Result<(), GroupError> {
        self.groups.rename(&mut self.registry, old_name, new_name)?;
        self.notify(ChangeFlags::POOL | ChangeFlags::NAME);
        Ok(())
    }

    pub fn groups_of(&self, id: PlacementId) -> BTreeSet<GroupName> {
        self.groups.groups_of(id)
    }

    pub fn congruent_groups(&self, members: &BTreeSet<PlacementId>) -> Vec<GroupName> {
        self.groups.congruent_groups(members)
    }

    pub fn set_group_visible(&mut self, name: &GroupName, visible: bool) -> Result<(), GroupError> {
        let group = self
            .groups
            .get_mut(name)
            .ok_or_else(|| GroupError::UnknownGroup { name: name.clone() })?;
        if group.is_visible() != visible {
            group.set_visible(visible);
            self.notify(ChangeFlags::STATUS);
        }
        Ok(())
    }

    pub fn set_group_color(&mut self, name: &GroupName, color: Option<Rgb>) -> Result<(), GroupError> {
        let group = self
            .groups
            .get_mut(name)
            .ok_or_else(|| GroupError::UnknownGroup { name: name.clone() })?;
        if group.color() != color {
            group.set_color(color);
            self.notify(ChangeFlags::STATUS);
        }
        Ok(())
    }

    /// Whether the group differs from what was last saved (members or their positions).
    pub fn group_has_changed(&self, name: &GroupName) -> bool {
        self.groups.has_changed(&self.registry, name)
    }

    /// Placements reachable from `seeds` along call/include references.
    pub fn expand_closure(&self, seeds: &[PlacementId]) -> ClosureReport {
        expand_closure(&self.registry, seeds, self.config.filter_references_by_group)
    }
}
