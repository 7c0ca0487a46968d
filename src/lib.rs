// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Arranger: a canvas of diagrams.
//!
//! `ArrangementCore` keeps the placed plans, their groups and the selection, packs new
//! diagrams without overlap, and reports naming conflicts as data. `ArrangementGateway`
//! saves and loads groups through an `Archivar`.

pub mod config;
pub mod layout;
pub mod model;
pub mod notify;
pub mod ops;
pub mod query;
pub mod store;

pub use config::{ArrangerConfig, ConfigError};
pub use model::{
    Extent, Group, GroupName, Placement, PlacementId, Plan, PlanKind, Point, Rect, Resemblance,
    Signature,
};
pub use notify::{ChangeBus, ChangeFlags, ListenerId};
pub use ops::{ArrangementCore, Conflict, ConflictEntry, Disposition, GroupError, Insertion};
pub use store::{ArrangementGateway, Archivar, GatewayError, PersistRecord};
