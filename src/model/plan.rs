// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::geometry::Extent;

/// The role a diagram plays: a main program, a callable subroutine or an includable
/// definitions diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Program,
    Subroutine,
    Includable,
}

/// Name, kind and parameter count of a plan; the equality class used for name lookup and
/// conflict detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    name: SmolStr,
    kind: PlanKind,
    arity: Option<usize>,
}

impl Signature {
    pub fn program(name: impl AsRef<str>) -> Self {
        Self { name: SmolStr::new(name), kind: PlanKind::Program, arity: None }
    }

    pub fn subroutine(name: impl AsRef<str>, arity: usize) -> Self {
        Self { name: SmolStr::new(name), kind: PlanKind::Subroutine, arity: Some(arity) }
    }

    pub fn includable(name: impl AsRef<str>) -> Self {
        Self { name: SmolStr::new(name), kind: PlanKind::Includable, arity: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PlanKind {
        self.kind
    }

    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Whether a plan with signature `self` can serve a reference written as `wanted`.
    ///
    /// Calls resolve to subroutines of the same name and arity, includes resolve to
    /// includables of the same name; programs are never the target of a reference.
    pub fn satisfies(&self, wanted: &Signature) -> bool {
        if self.name != wanted.name {
            return false;
        }
        match (self.kind, wanted.kind) {
            (PlanKind::Subroutine, PlanKind::Subroutine) => self.arity == wanted.arity,
            (PlanKind::Includable, PlanKind::Includable) => true,
            _ => false,
        }
    }

    pub fn propose_file_name(&self) -> String {
        match self.arity {
            Some(arity) => format!("{}-{arity}", self.name),
            None => self.name.to_string(),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self.kind {
            PlanKind::Program => 0,
            PlanKind::Subroutine => 1,
            PlanKind::Includable => 2,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Some(arity) => write!(f, "{}({arity})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl Ord for Signature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind_rank()
            .cmp(&other.kind_rank())
            .then_with(|| self.name.to_lowercase().cmp(&other.name.to_lowercase()))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.arity.cmp(&other.arity))
    }
}

impl PartialOrd for Signature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// How closely two plans resemble each other.
///
/// Levels 3 to 5 between plans sharing a name are reported as conflicts on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Resemblance {
    Unrelated = 0,
    /// The very same object.
    Identical = 1,
    /// Equal content and equal location, nothing unsaved.
    Equal = 2,
    /// Same location but the content differs (or is unsaved on one side).
    ContentDiffers = 3,
    /// Equal content stored at different locations.
    LocationDiffers = 4,
    /// Same signature, different content and location.
    BothDiffer = 5,
}

impl Resemblance {
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn is_conflict(self) -> bool {
        matches!(self, Self::ContentDiffers | Self::LocationDiffers | Self::BothDiffer)
    }

    pub fn content_symbol(self) -> char {
        match self {
            Self::Identical | Self::Equal | Self::LocationDiffers => '=',
            Self::ContentDiffers | Self::BothDiffer | Self::Unrelated => '≠',
        }
    }

    pub fn location_symbol(self) -> char {
        match self {
            Self::Identical | Self::Equal | Self::ContentDiffers => '=',
            Self::LocationDiffers | Self::BothDiffer | Self::Unrelated => '≠',
        }
    }
}

/// A diagram payload as far as the arrangement engine is concerned.
///
/// Rendering, parsing and execution of the diagram live elsewhere; the engine only needs
/// identity, a signature, an extent and enough equality information to detect conflicts.
pub trait Plan {
    type Identity: Clone + Eq + Hash + fmt::Debug;

    fn identity(&self) -> Self::Identity;

    fn signature(&self) -> Signature;

    /// `None` while the diagram has never been laid out.
    fn extent(&self) -> Option<Extent>;

    /// Persisted location token (a file path in practice), `None` if never saved.
    fn location(&self) -> Option<&str>;

    /// Records that the plan now lives at `location`.
    ///
    /// The gateway calls this right after the archivar wrote the plan there, so afterwards
    /// the plan must report `is_dirty() == false`. A plan that stays dirty is written again
    /// on every save and never resembles its stored copy as equal.
    fn set_location(&mut self, location: &str);

    /// Whether the plan carries unsaved modifications.
    fn is_dirty(&self) -> bool;

    /// Structural equality of the diagram content, ignoring location and dirtiness.
    fn content_eq(&self, other: &Self) -> bool;

    /// Signatures this plan calls or includes.
    fn references(&self) -> Vec<Signature> {
        Vec::new()
    }

    fn resemblance(&self, other: &Self) -> Resemblance {
        if self.identity() == other.identity() {
            return Resemblance::Identical;
        }
        let same_location = self.location() == other.location();
        if self.content_eq(other) {
            return match (same_location, self.is_dirty() || other.is_dirty()) {
                (true, false) => Resemblance::Equal,
                (true, true) => Resemblance::ContentDiffers,
                (false, _) => Resemblance::LocationDiffers,
            };
        }
        if self.signature() != other.signature() {
            return Resemblance::Unrelated;
        }
        if same_location {
            Resemblance::ContentDiffers
        } else {
            Resemblance::BothDiffer
        }
    }
}
