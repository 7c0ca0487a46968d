// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{GroupName, PlacementId, Plan, Resemblance, Signature};

use super::registry::PlanRegistry;

/// Same-name placements that differ from a newly inserted plan.
///
/// Purely informational: the insertion that produced it has already happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub inserted: PlacementId,
    pub signature: Signature,
    pub entries: Vec<ConflictEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictEntry {
    pub placement: PlacementId,
    pub resemblance: Resemblance,
    pub content_symbol: char,
    pub location_symbol: char,
    pub signature: Signature,
    pub location: Option<String>,
    pub dirty: bool,
    pub groups: Vec<GroupName>,
}

impl ConflictEntry {
    pub(crate) fn describe<P: Plan>(
        registry: &PlanRegistry<P>,
        placement: PlacementId,
        resemblance: Resemblance,
    ) -> Option<Self> {
        let existing = registry.get(placement)?;
        let plan = existing.plan();
        Some(Self {
            placement,
            resemblance,
            content_symbol: resemblance.content_symbol(),
            location_symbol: resemblance.location_symbol(),
            signature: plan.signature(),
            location: plan.location().map(ToOwned::to_owned),
            dirty: plan.is_dirty(),
            groups: existing.group_names().to_vec(),
        })
    }

    /// One-line summary in the form `≠ = *sort(1): a.nsd [algos, DEFAULT]`.
    pub fn summary(&self) -> String {
        let mut line = format!("{} {} ", self.content_symbol, self.location_symbol);
        if self.dirty {
            line.push('*');
        }
        line.push_str(&self.signature.to_string());
        line.push_str(": ");
        line.push_str(self.location.as_deref().unwrap_or("-"));
        let groups: Vec<&str> = self.groups.iter().map(GroupName::as_str).collect();
        line.push_str(&format!(" [{}]", groups.join(", ")));
        line
    }
}
