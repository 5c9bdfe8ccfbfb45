// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serialized access to font resource tables.

use std::sync::{Mutex, MutexGuard, PoisonError};

static TABLE_LOCK: Mutex<()> = Mutex::new(());

/// Proof that the holder has exclusive access to font resource tables.
///
/// Font resources are not assumed to tolerate concurrent table extraction,
/// so every table read in this crate happens while one of these is alive.
/// Functions that read tables take a `&TableAccess` parameter instead of
/// locking internally.
///
/// The lock is not reentrant: do not construct a
/// [`FontFamily`](crate::FontFamily) or [`Font`](crate::Font) while holding
/// one.
#[derive(Debug)]
pub struct TableAccess<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl TableAccess<'static> {
    /// Blocks until table access is available.
    pub fn lock() -> Self {
        // The guarded value is `()`, so a poisoned lock holds no broken state.
        let guard = TABLE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        Self { _guard: guard }
    }
}
