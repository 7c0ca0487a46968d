// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::geometry::Extent;
use super::plan::{Plan, Signature};

/// Minimal plan used across the unit tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TestPlan {
    pub id: u64,
    pub signature: Signature,
    pub content: String,
    pub location: Option<String>,
    pub dirty: bool,
    pub extent: Option<Extent>,
    pub references: Vec<Signature>,
}

impl TestPlan {
    fn new(id: u64, signature: Signature) -> Self {
        Self {
            id,
            signature,
            content: String::new(),
            location: None,
            dirty: false,
            extent: Some(Extent::new(100, 50)),
            references: Vec::new(),
        }
    }

    pub fn program(id: u64, name: &str) -> Self {
        Self::new(id, Signature::program(name))
    }

    pub fn subroutine(id: u64, name: &str, arity: usize) -> Self {
        Self::new(id, Signature::subroutine(name, arity))
    }

    pub fn includable(id: u64, name: &str) -> Self {
        Self::new(id, Signature::includable(name))
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_owned();
        self
    }

    pub fn at_location(mut self, location: Option<&str>) -> Self {
        self.location = location.map(ToOwned::to_owned);
        self
    }

    pub fn sized(mut self, width: i32, height: i32) -> Self {
        self.extent = Some(Extent::new(width, height));
        self
    }

    pub fn without_extent(mut self) -> Self {
        self.extent = None;
        self
    }

    pub fn calling(mut self, signature: Signature) -> Self {
        self.references.push(signature);
        self
    }
}

impl Plan for TestPlan {
    type Identity = u64;

    fn identity(&self) -> u64 {
        self.id
    }

    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    fn extent(&self) -> Option<Extent> {
        self.extent
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn set_location(&mut self, location: &str) {
        self.location = Some(location.to_owned());
        self.dirty = false;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn content_eq(&self, other: &Self) -> bool {
        self.signature == other.signature && self.content == other.content
    }

    fn references(&self) -> Vec<Signature> {
        self.references.clone()
    }
}
