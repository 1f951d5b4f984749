//! Bump arena that owns every node of a JSON tree for one conversion pass.
//!
//! The arena is a thin layer over [`bumpalo::Bump`]: storage is a list of
//! chunks that grows geometrically and never relocates, so a region handed out
//! early in a pass stays valid while later requests open new chunks. Nothing
//! is freed individually. [`Arena::flush`] drops every chunk at once, and
//! because it takes `&mut self` the borrow checker rejects any tree node that
//! would outlive the flush.
//!
//! Allocation failure is reported as [`AllocError`] instead of aborting. An
//! optional byte limit ([`ArenaConfig::limit`]) caps how much the arena may
//! reserve from the host allocator.
//!
//! An arena is single-owner: it is `Send` but not `Sync`.

use std::cell::Cell;

use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use tracing::trace;

use crate::error::AllocError;

/// Arena tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaConfig {
    /// Maximum number of bytes the arena may reserve. `None` means unbounded.
    pub limit: Option<usize>,
}

#[derive(Debug)]
pub struct Arena {
    bump: Bump,
    config: ArenaConfig,
    used: Cell<usize>,
}

impl Arena {
    /// Create an empty, unbounded arena. No memory is reserved until the
    /// first allocation.
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    pub fn with_config(config: ArenaConfig) -> Self {
        Self {
            bump: fresh_bump(&config),
            config,
            used: Cell::new(0),
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Hand out `size` zero-filled bytes.
    ///
    /// The region lives until the next [`flush`](Self::flush).
    #[allow(clippy::mut_from_ref)]
    pub fn allocate(&self, size: usize) -> Result<&mut [u8], AllocError> {
        let region = self
            .bump
            .try_alloc_slice_fill_copy(size, 0u8)
            .map_err(|_| AllocError::new(size))?;
        self.used.set(self.used.get() + size);
        Ok(region)
    }

    /// Copy `text` into the arena.
    pub fn alloc_str(&self, text: &str) -> Result<&str, AllocError> {
        let copy = self
            .bump
            .try_alloc_str(text)
            .map_err(|_| AllocError::new(text.len()))?;
        self.used.set(self.used.get() + text.len());
        Ok(copy)
    }

    /// Start an arena-backed vector. Grow it with [`push`] so that growth
    /// failures surface as [`AllocError`].
    pub(crate) fn vec<T>(&self) -> BumpVec<'_, T> {
        BumpVec::new_in(&self.bump)
    }

    /// Bytes handed out through [`allocate`](Self::allocate) and
    /// [`alloc_str`](Self::alloc_str) since the last flush.
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Bytes currently reserved from the host allocator.
    pub fn capacity(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Release every chunk and reset bookkeeping. Idempotent.
    pub fn flush(&mut self) {
        trace!(
            used = self.used.get(),
            capacity = self.capacity(),
            "flushing arena"
        );
        self.bump = fresh_bump(&self.config);
        self.used.set(0);
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

fn fresh_bump(config: &ArenaConfig) -> Bump {
    let bump = Bump::new();
    bump.set_allocation_limit(config.limit);
    bump
}

/// Append to an arena-backed vector, reporting growth failure instead of
/// aborting.
pub(crate) fn push<T>(vec: &mut BumpVec<'_, T>, item: T) -> Result<(), AllocError> {
    vec.try_reserve(1)
        .map_err(|_| AllocError::new(std::mem::size_of::<T>()))?;
    vec.push(item);
    Ok(())
}
