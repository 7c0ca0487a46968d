// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use crate::model::{Plan, Point};

/// Opaque failure reported by an archivar; passed through uninterpreted.
pub type ArchiveError = Box<dyn std::error::Error + Send + Sync>;

/// One placement as stored in an arrangement archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistRecord {
    pub x: i32,
    pub y: i32,
    /// Storage token of the plan, as returned by `Plan::location`.
    pub plan_reference: String,
}

/// Serializable arrangement listing: the archive's logical name, the optional origin the
/// coordinates are relative to, and the records in draw order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArrangementManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Point>,
    pub records: Vec<PersistRecord>,
}

impl ArrangementManifest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A record read back from an archive, with its plan decoded (or the reason it could not be).
#[derive(Debug)]
pub struct LoadedRecord<P> {
    pub position: Point,
    pub plan_reference: String,
    pub plan: Result<P, ArchiveError>,
}

#[derive(Debug)]
pub struct ArchiveContents<P> {
    pub name: String,
    pub origin: Option<Point>,
    pub records: Vec<LoadedRecord<P>>,
}

/// Byte-level persistence the gateway delegates to.
pub trait Archivar<P: Plan> {
    /// Reads an arrangement archive. Individual plans that fail to decode are reported per
    /// record; only an unreadable archive fails the call.
    fn load(&mut self, source: &str) -> Result<ArchiveContents<P>, ArchiveError>;

    /// Stores one plan at `destination`.
    fn write_plan(&mut self, plan: &P, destination: &str) -> Result<(), ArchiveError>;

    /// Writes the arrangement listing.
    fn save(
        &mut self,
        records: &[PersistRecord],
        destination: &str,
        relative_origin: Option<Point>,
    ) -> Result<(), ArchiveError>;

    /// Destination for a plan that has never been stored.
    fn temp_destination(&self, temp_dir: &str, stem: &str) -> String {
        format!("{}/{stem}", temp_dir.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::{ArrangementManifest, PersistRecord};
    use crate::model::Point;

    #[test]
    fn manifest_roundtrips_and_omits_missing_origin() {
        let manifest = ArrangementManifest {
            name: "algos".to_owned(),
            origin: None,
            records: vec![PersistRecord { x: 10, y: 10, plan_reference: "sort.nsd".to_owned() }],
        };
        let json = manifest.to_json().expect("serialize");
        assert!(!json.contains("origin"));
        assert_eq!(ArrangementManifest::from_json(&json).expect("parse"), manifest);

        let with_origin = ArrangementManifest { origin: Some(Point::new(-5, 40)), ..manifest };
        let json = with_origin.to_json().expect("serialize");
        assert_eq!(ArrangementManifest::from_json(&json).expect("parse"), with_origin);
    }

    #[test]
    fn manifest_rejects_unknown_fields() {
        let json = r#"{"name":"a","records":[],"zoom":2}"#;
        assert!(ArrangementManifest::from_json(json).is_err());
    }
}
