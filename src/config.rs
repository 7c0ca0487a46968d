// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Engine configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::Extent;

pub const DEFAULT_GAP: i32 = 10;
pub const DEFAULT_EXTENT: Extent = Extent::new(120, 150);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrangerConfig {
    /// Distance kept between automatically placed diagrams.
    pub gap: i32,
    /// Canvas width the allocator tries to stay within; `None` means unbounded.
    pub canvas_width: Option<i32>,
    /// Extent assumed for plans that have not been laid out yet.
    pub default_extent: Extent,
    /// Prefer reference targets sharing a group with the referencing placement.
    pub filter_references_by_group: bool,
}

impl Default for ArrangerConfig {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            canvas_width: None,
            default_extent: DEFAULT_EXTENT,
            filter_references_by_group: true,
        }
    }
}

impl ArrangerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gap < 0 {
            return Err(ConfigError::Invalid { field: "gap", reason: "must not be negative" });
        }
        if self.default_extent.is_empty() {
            return Err(ConfigError::Invalid {
                field: "default_extent",
                reason: "width and height must be positive",
            });
        }
        if self.canvas_width.is_some_and(|width| width <= 0) {
            return Err(ConfigError::Invalid { field: "canvas_width", reason: "must be positive" });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("cannot parse config: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}
