// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over an arrangement.
//!
//! Derived views for index panels: sorted listings of placements and groups, and the
//! reference closure behind "expand selection".

use std::cmp::Ordering;

use crate::model::{Group, Placement, PlacementId, Plan};
use crate::ops::{GroupStore, PlanRegistry};

pub mod closure;

pub use closure::{expand_closure, AmbiguousReference, ClosureReport, MissingReference};

fn by_signature<P: Plan>(a: &Placement<P>, b: &Placement<P>) -> Ordering {
    a.plan()
        .signature()
        .cmp(&b.plan().signature())
        .then_with(|| a.plan().location().cmp(&b.plan().location()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// All placements ordered by signature, then location.
pub fn placements_by_signature<P: Plan>(registry: &PlanRegistry<P>) -> Vec<PlacementId> {
    let mut placements: Vec<&Placement<P>> = registry.iter().collect();
    placements.sort_by(|a, b| by_signature(a, b));
    placements.into_iter().map(Placement::id).collect()
}

/// Members of `group` ordered by signature, then location.
pub fn members_by_signature<P: Plan>(registry: &PlanRegistry<P>, group: &Group) -> Vec<PlacementId> {
    let mut members: Vec<&Placement<P>> =
        group.members().iter().filter_map(|id| registry.get(*id)).collect();
    members.sort_by(|a, b| by_signature(a, b));
    members.into_iter().map(Placement::id).collect()
}

/// Named groups ordered case-insensitively by name; the default group is not listed.
pub fn named_groups(groups: &GroupStore) -> Vec<&Group> {
    let mut named: Vec<&Group> = groups.iter().filter(|group| !group.is_default()).collect();
    named.sort_by(|a, b| {
        let (a, b) = (a.name().as_str(), b.name().as_str());
        a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
    });
    named
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{members_by_signature, named_groups, placements_by_signature};
    use crate::model::fixtures::TestPlan;
    use crate::model::GroupName;
    use crate::ops::ArrangementCore;

    #[rstest]
    fn placements_list_programs_first_then_by_name() {
        let mut core: ArrangementCore<TestPlan> = ArrangementCore::default();
        let zeta = core.insert(TestPlan::subroutine(1, "zeta", 0), None, None).id;
        let alpha = core.insert(TestPlan::subroutine(2, "Alpha", 1), None, None).id;
        let main = core.insert(TestPlan::program(3, "main"), None, None).id;
        let consts = core.insert(TestPlan::includable(4, "consts"), None, None).id;
        let at_b = core
            .insert(TestPlan::subroutine(5, "beta", 0).at_location(Some("b.nsd")), None, None)
            .id;
        let at_a = core
            .insert(
                TestPlan::subroutine(6, "beta", 0).with_content("x").at_location(Some("a.nsd")),
                None,
                None,
            )
            .id;

        assert_eq!(
            placements_by_signature(core.registry()),
            vec![main, alpha, at_a, at_b, zeta, consts]
        );
    }

    #[rstest]
    fn group_listing_skips_default_and_ignores_case() {
        let mut core: ArrangementCore<TestPlan> = ArrangementCore::default();
        let x = core.insert(TestPlan::program(1, "x"), None, None).id;
        let y = core.insert(TestPlan::program(2, "y"), None, None).id;
        core.insert(TestPlan::program(3, "loose"), None, None);
        for name in ["beta", "Alpha", "gamma"] {
            core.create_group(&GroupName::new(name).expect("name"), &[x, y]).expect("create");
        }

        let names: Vec<&str> =
            named_groups(core.groups()).iter().map(|group| group.name().as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);

        let alpha = core.groups().get(&GroupName::new("Alpha").expect("name")).expect("group");
        assert_eq!(members_by_signature(core.registry(), alpha), vec![x, y]);
    }
}
