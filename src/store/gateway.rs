// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use crate::model::{GroupName, GroupNameError, PlacementId, Plan, Point};
use crate::notify::ChangeFlags;
use crate::ops::{ArrangementCore, Conflict};

use super::archive::{ArchiveError, Archivar, PersistRecord};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("archive operation failed")]
    Archive {
        #[source]
        source: ArchiveError,
    },
    #[error("nothing to save")]
    NothingToSave,
    #[error("no group named {name:?}")]
    UnknownGroup { name: GroupName },
    #[error("archive name {name:?} is not a valid group name")]
    InvalidGroupName {
        name: String,
        #[source]
        source: GroupNameError,
    },
}

impl GatewayError {
    fn archive(source: ArchiveError) -> Self {
        Self::Archive { source }
    }
}

/// Which placements a save covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveScope {
    Group(GroupName),
    Selection,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub scope: SaveScope,
    pub destination: String,
    /// Where plans without storage are written before the listing is saved.
    pub temp_dir: String,
    /// Store coordinates relative to the top-left of the saved placements.
    pub relative: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub destination: String,
    pub origin: Option<Point>,
    pub records: Vec<PersistRecord>,
    /// Plans written before the listing, with the destination each was written to.
    pub written: Vec<(PlacementId, String)>,
}

#[derive(Debug)]
pub struct LoadFailure {
    pub plan_reference: String,
    pub source: ArchiveError,
}

#[derive(Debug)]
pub struct LoadReport {
    pub group: GroupName,
    pub loaded: Vec<PlacementId>,
    pub conflicts: Vec<Conflict>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.failures.is_empty()
    }
}

/// Moves arrangements between the core and an archivar.
#[derive(Debug)]
pub struct ArrangementGateway<A> {
    archivar: A,
}

impl<A> ArrangementGateway<A> {
    pub fn new(archivar: A) -> Self {
        Self { archivar }
    }

    pub fn archivar(&self) -> &A {
        &self.archivar
    }

    pub fn into_inner(self) -> A {
        self.archivar
    }

    /// Saves the placements selected by `request.scope`.
    ///
    /// Plans that were never stored get a fresh destination under `request.temp_dir`; dirty
    /// plans are rewritten in place. Saving a group records the destination as its provenance
    /// and resets its change tracking.
    pub fn save<P>(
        &mut self,
        core: &mut ArrangementCore<P>,
        request: &SaveRequest,
    ) -> Result<SaveReport, GatewayError>
    where
        P: Plan,
        A: Archivar<P>,
    {
        let members = select_members(core, &request.scope)?;
        if members.is_empty() {
            return Err(GatewayError::NothingToSave);
        }

        let written = self.write_pending_plans(core, &members, &request.temp_dir)?;

        let origin = if request.relative { relative_origin(core, &members) } else { None };
        let shift = origin.unwrap_or_default();
        let records: Vec<PersistRecord> = members
            .iter()
            .filter_map(|id| core.registry().get(*id))
            .map(|placement| PersistRecord {
                x: placement.position().x - shift.x,
                y: placement.position().y - shift.y,
                plan_reference: placement.plan().location().unwrap_or_default().to_owned(),
            })
            .collect();

        self.archivar
            .save(&records, &request.destination, origin)
            .map_err(GatewayError::archive)?;

        let (registry, groups) = core.parts_mut();
        if let SaveScope::Group(name) = &request.scope {
            if let Some(group) = groups.get_mut(name) {
                group.mark_saved(request.destination.clone());
            }
            for id in &members {
                if let Some(placement) = registry.get_mut(*id) {
                    placement.clear_moved();
                }
            }
        }
        tracing::debug!(
            destination = %request.destination,
            records = records.len(),
            written = written.len(),
            "arrangement saved"
        );
        core.notify(ChangeFlags::STATUS);

        Ok(SaveReport { destination: request.destination.clone(), origin, records, written })
    }

    /// Loads an archive into a group named after it.
    ///
    /// Records are inserted one by one in a single coalescing scope; unreadable plans and
    /// insertion conflicts are collected instead of aborting the load.
    pub fn load<P>(
        &mut self,
        core: &mut ArrangementCore<P>,
        source: &str,
    ) -> Result<LoadReport, GatewayError>
    where
        P: Plan,
        A: Archivar<P>,
    {
        let contents = self.archivar.load(source).map_err(GatewayError::archive)?;
        let group = GroupName::new(&contents.name)
            .and_then(|name| if name.is_default() { Err(GroupNameError::Reserved) } else { Ok(name) })
            .map_err(|err| GatewayError::InvalidGroupName { name: contents.name.clone(), source: err })?;
        let shift = contents.origin.unwrap_or_default();

        let mut report =
            LoadReport { group, loaded: Vec::new(), conflicts: Vec::new(), failures: Vec::new() };

        core.coalesced(|core| {
            for record in contents.records {
                let plan = match record.plan {
                    Ok(plan) => plan,
                    Err(err) => {
                        tracing::warn!(plan = %record.plan_reference, error = %err, "plan not loaded");
                        report.failures.push(LoadFailure {
                            plan_reference: record.plan_reference,
                            source: err,
                        });
                        continue;
                    }
                };
                let position = record.position.offset(shift.x, shift.y);
                let insertion = core.insert(plan, Some(position), Some(&report.group));
                report.loaded.push(insertion.id);
                report.conflicts.extend(insertion.conflict);
            }

            let (registry, groups) = core.parts_mut();
            if let Some(group) = groups.get_mut(&report.group) {
                group.mark_saved(source.to_owned());
            }
            for id in &report.loaded {
                if let Some(placement) = registry.get_mut(*id) {
                    placement.clear_moved();
                }
            }
            core.notify(ChangeFlags::STATUS);
        });

        tracing::debug!(
            source,
            group = %report.group,
            loaded = report.loaded.len(),
            conflicts = report.conflicts.len(),
            failures = report.failures.len(),
            "arrangement loaded"
        );
        Ok(report)
    }

    fn write_pending_plans<P>(
        &mut self,
        core: &mut ArrangementCore<P>,
        members: &[PlacementId],
        temp_dir: &str,
    ) -> Result<Vec<(PlacementId, String)>, GatewayError>
    where
        P: Plan,
        A: Archivar<P>,
    {
        let mut taken: HashSet<String> = core
            .registry()
            .iter()
            .filter_map(|placement| placement.plan().location().map(ToOwned::to_owned))
            .collect();

        let mut written = Vec::new();
        for id in members {
            let Some(placement) = core.registry().get(*id) else {
                continue;
            };
            let plan = placement.plan();
            let destination = match plan.location() {
                Some(location) if plan.is_dirty() => location.to_owned(),
                Some(_) => continue,
                None => {
                    let stem = plan.signature().propose_file_name();
                    let destination =
                        unique_destination::<P, A>(&self.archivar, temp_dir, &stem, &taken);
                    taken.insert(destination.clone());
                    destination
                }
            };
            self.archivar.write_plan(plan, &destination).map_err(GatewayError::archive)?;

            let (registry, _) = core.parts_mut();
            if let Some(placement) = registry.get_mut(*id) {
                placement.plan_mut().set_location(&destination);
            }
            tracing::debug!(placement = %id, destination = %destination, "plan written");
            written.push((*id, destination));
        }
        Ok(written)
    }
}

fn select_members<P: Plan>(
    core: &ArrangementCore<P>,
    scope: &SaveScope,
) -> Result<Vec<PlacementId>, GatewayError> {
    let registry = core.registry();
    let members = match scope {
        SaveScope::Group(name) => {
            let group = core
                .groups()
                .get(name)
                .ok_or_else(|| GatewayError::UnknownGroup { name: name.clone() })?;
            registry.iter().map(|p| p.id()).filter(|id| group.contains(*id)).collect()
        }
        SaveScope::Selection => {
            registry.iter().map(|p| p.id()).filter(|id| core.is_selected(*id)).collect()
        }
        SaveScope::All => registry.ids(),
    };
    Ok(members)
}

/// Top-left of the members' bounding box, less one gap.
fn relative_origin<P: Plan>(core: &ArrangementCore<P>, members: &[PlacementId]) -> Option<Point> {
    let gap = core.config().gap;
    let fallback = core.config().default_extent;
    members
        .iter()
        .filter_map(|id| core.registry().get(*id))
        .map(|placement| placement.bounds(fallback))
        .reduce(|acc, bounds| acc.union(&bounds))
        .map(|bounds| bounds.top_left().offset(-gap, -gap))
}

fn unique_destination<P: Plan, A: Archivar<P>>(
    archivar: &A,
    temp_dir: &str,
    stem: &str,
    taken: &HashSet<String>,
) -> String {
    let mut candidate = archivar.temp_destination(temp_dir, stem);
    let mut counter = 1u32;
    while taken.contains(&candidate) {
        candidate = archivar.temp_destination(temp_dir, &format!("{stem}_{counter}"));
        counter += 1;
    }
    candidate
}
