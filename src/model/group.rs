// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ids::{GroupName, PlacementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A named collection of placements.
///
/// Membership is only changed through the group store, which keeps the placements' group
/// names in step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: GroupName,
    provenance: Option<String>,
    color: Option<Rgb>,
    visible: bool,
    members: BTreeSet<PlacementId>,
    membership_changed: bool,
}

impl Group {
    pub(crate) fn new(name: GroupName) -> Self {
        Self {
            name,
            provenance: None,
            color: None,
            visible: true,
            members: BTreeSet::new(),
            membership_changed: false,
        }
    }

    pub fn name(&self) -> &GroupName {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: GroupName) {
        self.name = name;
    }

    pub fn is_default(&self) -> bool {
        self.name.is_default()
    }

    /// Where the group was last saved to or loaded from.
    pub fn provenance(&self) -> Option<&str> {
        self.provenance.as_deref()
    }

    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: Option<Rgb>) {
        self.color = color;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn members(&self) -> &BTreeSet<PlacementId> {
        &self.members
    }

    pub fn contains(&self, id: PlacementId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn membership_changed(&self) -> bool {
        self.membership_changed
    }

    pub(crate) fn insert_member(&mut self, id: PlacementId) -> bool {
        let added = self.members.insert(id);
        self.membership_changed |= added;
        added
    }

    pub(crate) fn remove_member(&mut self, id: PlacementId) -> bool {
        let removed = self.members.remove(&id);
        self.membership_changed |= removed;
        removed
    }

    pub(crate) fn mark_saved(&mut self, provenance: String) {
        self.provenance = Some(provenance);
        self.membership_changed = false;
    }

    pub(crate) fn mark_membership_changed(&mut self) {
        self.membership_changed = true;
    }
}
