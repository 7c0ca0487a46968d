// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence of arrangements.
//!
//! The gateway decides what goes into an archive and translates coordinates; reading and
//! writing bytes is left to an `Archivar` implementation.

pub mod archive;
pub mod gateway;

pub use archive::{
    ArchiveContents, ArchiveError, Archivar, ArrangementManifest, LoadedRecord, PersistRecord,
};
pub use gateway::{
    ArrangementGateway, GatewayError, LoadFailure, LoadReport, SaveReport, SaveRequest, SaveScope,
};
