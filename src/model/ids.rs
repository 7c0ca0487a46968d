// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Arena key of a placement held by the registry.
///
/// Ids are handed out monotonically and never reused, so a stale id simply stops resolving
/// once its placement has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlacementId(u64);

impl PlacementId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Unique key of a group.
///
/// The literal `DEFAULT` is reserved for the implicit group holding otherwise ungrouped
/// placements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupName(SmolStr);

impl GroupName {
    pub const DEFAULT: &'static str = "DEFAULT";

    pub fn new(value: impl AsRef<str>) -> Result<Self, GroupNameError> {
        let value = value.as_ref();
        if value.trim().is_empty() {
            return Err(GroupNameError::Empty);
        }
        if value.contains(['\n', '\r']) {
            return Err(GroupNameError::LineBreak);
        }
        Ok(Self(SmolStr::new(value)))
    }

    pub fn default_group() -> Self {
        Self(SmolStr::new_static(Self::DEFAULT))
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A file-system friendly variant of the name: everything that is neither alphanumeric
    /// nor a dot becomes `_`.
    pub fn propose_file_name(&self) -> String {
        self.0
            .chars()
            .map(|ch| if ch.is_alphanumeric() || ch == '.' { ch } else { '_' })
            .collect()
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GroupName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for GroupName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for GroupName {
    type Err = GroupNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for GroupName {
    type Error = GroupNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupName> for String {
    fn from(value: GroupName) -> Self {
        value.0.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupNameError {
    #[error("group name must not be blank")]
    Empty,
    #[error("group name must not contain line breaks")]
    LineBreak,
    #[error("group name {} is reserved", GroupName::DEFAULT)]
    Reserved,
}

#[cfg(test)]
mod tests {
    use super::{GroupName, GroupNameError};

    #[test]
    fn group_name_rejects_blank() {
        assert_eq!(GroupName::new("  "), Err(GroupNameError::Empty));
    }

    #[test]
    fn group_name_rejects_line_breaks() {
        assert_eq!(GroupName::new("a\nb"), Err(GroupNameError::LineBreak));
    }

    #[test]
    fn default_group_is_recognised_by_literal() {
        assert!(GroupName::new("DEFAULT").unwrap().is_default());
        assert!(!GroupName::new("default").unwrap().is_default());
    }

    #[test]
    fn proposed_file_name_replaces_separators() {
        let name = GroupName::new("sort algos/v1.2 (draft)").unwrap();
        assert_eq!(name.propose_file_name(), "sort_algos_v1.2__draft_");
    }

    #[test]
    fn group_name_roundtrips_through_json_as_string() {
        let name = GroupName::new("Sorting").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Sorting\"");
        let back: GroupName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
        assert!(serde_json::from_str::<GroupName>("\"\"").is_err());
    }
}
