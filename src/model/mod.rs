// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Placements wrap opaque plans with a canvas position; groups collect placements by id.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod geometry;
pub mod group;
pub mod ids;
pub mod placement;
pub mod plan;

pub use geometry::{Extent, Point, Rect};
pub use group::{Group, Rgb};
pub use ids::{GroupName, GroupNameError, PlacementId};
pub use placement::Placement;
pub use plan::{Plan, PlanKind, Resemblance, Signature};
