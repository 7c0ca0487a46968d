// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeSet, VecDeque};

use crate::model::{PlacementId, Plan, Signature};
use crate::ops::PlanRegistry;

/// A reference no placement on the canvas can serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
    pub from: PlacementId,
    pub signature: Signature,
}

/// A reference several placements could serve; the first candidate was followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousReference {
    pub from: PlacementId,
    pub signature: Signature,
    pub candidates: Vec<PlacementId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosureReport {
    /// Placements reached from the seeds, in discovery order, seeds excluded.
    pub added: Vec<PlacementId>,
    pub missing: Vec<MissingReference>,
    pub ambiguous: Vec<AmbiguousReference>,
}

impl ClosureReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.ambiguous.is_empty()
    }
}

/// Breadth-first walk along the call/include references of the seed placements.
pub fn expand_closure<P: Plan>(
    registry: &PlanRegistry<P>,
    seeds: &[PlacementId],
    filter_by_groups: bool,
) -> ClosureReport {
    let mut report = ClosureReport::default();
    let mut visited: BTreeSet<PlacementId> = BTreeSet::new();
    let mut queue: VecDeque<PlacementId> = VecDeque::new();

    for seed in seeds {
        if registry.contains(*seed) && visited.insert(*seed) {
            queue.push_back(*seed);
        }
    }

    while let Some(current) = queue.pop_front() {
        let Some(placement) = registry.get(current) else {
            continue;
        };
        for signature in placement.plan().references() {
            let (preferred, others) = registry.reference_tiers(current, &signature, filter_by_groups);
            let candidates = if preferred.is_empty() { others } else { preferred };

            let Some(&chosen) = candidates.first() else {
                tracing::trace!(from = %current, signature = %signature, "reference unresolved");
                report.missing.push(MissingReference { from: current, signature });
                continue;
            };
            if candidates.len() > 1 {
                report.ambiguous.push(AmbiguousReference {
                    from: current,
                    signature,
                    candidates: candidates.clone(),
                });
            }
            if visited.insert(chosen) {
                report.added.push(chosen);
                queue.push_back(chosen);
            }
        }
    }

    tracing::debug!(
        seeds = seeds.len(),
        added = report.added.len(),
        missing = report.missing.len(),
        ambiguous = report.ambiguous.len(),
        "closure expanded"
    );
    report
}
