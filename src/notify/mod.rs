// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Arranger-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Arranger and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Change notification.
//!
//! Listeners run synchronously on the owning thread. While coalescing is enabled, flags are
//! OR-ed into a pending value and delivered once when the outermost scope ends.

use std::fmt;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChangeFlags: u8 {
        /// Placements were added or removed, or group membership changed.
        const POOL = 1 << 0;
        const SELECTION = 1 << 1;
        /// Dirty/saved status of placements or groups changed.
        const STATUS = 1 << 2;
        /// A plan signature or a group name changed.
        const NAME = 1 << 3;
        const POSITIONS = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(ChangeFlags)>;

#[derive(Default)]
pub struct ChangeBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    coalescing_depth: u32,
    pending: ChangeFlags,
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBus")
            .field("listeners", &self.listeners.len())
            .field("coalescing_depth", &self.coalescing_depth)
            .field("pending", &self.pending)
            .finish()
    }
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(ChangeFlags) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn notify(&mut self, flags: ChangeFlags) {
        if flags.is_empty() {
            return;
        }
        if self.is_coalescing() {
            self.pending |= flags;
            return;
        }
        self.fire(flags);
    }

    /// Enabling nests; each `false` closes one level and the outermost close flushes the
    /// accumulated flags once.
    pub fn set_coalescing(&mut self, enabled: bool) {
        if enabled {
            self.coalescing_depth += 1;
            return;
        }
        if self.coalescing_depth == 0 {
            return;
        }
        self.coalescing_depth -= 1;
        if self.coalescing_depth == 0 {
            let pending = std::mem::take(&mut self.pending);
            if !pending.is_empty() {
                self.fire(pending);
            }
        }
    }

    pub fn is_coalescing(&self) -> bool {
        self.coalescing_depth > 0
    }

    pub fn pending(&self) -> ChangeFlags {
        self.pending
    }

    fn fire(&mut self, flags: ChangeFlags) {
        tracing::trace!(?flags, listeners = self.listeners.len(), "change notification");
        for (_, listener) in &mut self.listeners {
            listener(flags);
        }
    }
}
