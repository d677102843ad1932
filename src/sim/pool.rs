//! Fixed-capacity object pool with active/inactive tracking
//!
//! Every spawned archetype (enemies, projectiles, orbs, chests, slash arcs)
//! lives in a `Pool`. Slots are allocated once up front; `acquire` pops a free
//! slot index in O(1) and `release` pushes it back. Nothing is allocated or
//! freed in the steady state.
//!
//! Each acquire bumps the slot's generation so a [`Handle`] can tell one life
//! of a slot from the next.
//!
//! Slots are blanked through [`Recycle::recycle`] rather than by assigning a
//! fresh `T::default()`, so buffers owned by an archetype keep their capacity
//! from one life to the next.

use serde::{Deserialize, Serialize};

/// One life of one pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle {
    pub slot: usize,
    pub generation: u32,
}

/// Types that can live in a [`Pool`] slot.
///
/// `T::default()` is the blank state. The default `recycle` overwrites the
/// slot with it; types owning heap buffers override it to clear them in place.
pub trait Recycle: Default {
    fn recycle(&mut self) {
        *self = Self::default();
    }
}

/// Pool of `T` slots. Every slot is recycled to the blank state on both
/// release and acquire.
#[derive(Debug, Clone)]
pub struct Pool<T: Recycle> {
    slots: Vec<T>,
    active: Vec<bool>,
    generations: Vec<u32>,
    /// Free slot indices, popped from the end (lowest index on top)
    free: Vec<usize>,
    count: usize,
}

impl<T: Recycle> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            count: 0,
        };
        pool.grow_to(capacity);
        pool
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn count_active(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count >= self.capacity()
    }

    /// Raise capacity to `capacity`. Pools never shrink; a smaller request is
    /// ignored. Returns the capacity in effect afterwards.
    pub fn grow_to(&mut self, capacity: usize) -> usize {
        let old = self.slots.len();
        if capacity <= old {
            return old;
        }
        self.slots.resize_with(capacity, T::default);
        self.active.resize(capacity, false);
        self.generations.resize(capacity, 0);
        // Keep the lowest free index on top of the stack
        let mut fresh: Vec<usize> = (old..capacity).rev().collect();
        fresh.append(&mut self.free);
        self.free = fresh;
        capacity
    }

    /// Take a free slot and mark it active with a blank state.
    ///
    /// Returns `None` when the pool is exhausted; callers skip the spawn.
    pub fn acquire(&mut self) -> Option<usize> {
        let slot = self.free.pop()?;
        self.slots[slot].recycle();
        self.active[slot] = true;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.count += 1;
        Some(slot)
    }

    /// Acquire a slot and configure it in one step
    pub fn spawn_with(&mut self, configure: impl FnOnce(&mut T)) -> Option<usize> {
        let slot = self.acquire()?;
        configure(&mut self.slots[slot]);
        Some(slot)
    }

    /// Return a slot to the pool. Releasing an inactive or out-of-range slot
    /// is a no-op and returns `false`.
    pub fn release(&mut self, slot: usize) -> bool {
        if !self.is_active(slot) {
            return false;
        }
        self.active[slot] = false;
        self.slots[slot].recycle();
        self.free.push(slot);
        self.count -= 1;
        true
    }

    #[inline]
    pub fn is_active(&self, slot: usize) -> bool {
        self.active.get(slot).copied().unwrap_or(false)
    }

    /// Borrow an active slot; inactive slots read as absent
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&T> {
        if self.is_active(slot) {
            Some(&self.slots[slot])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        if self.is_active(slot) {
            Some(&mut self.slots[slot])
        } else {
            None
        }
    }

    /// Handle for the current life of an active slot
    pub fn handle(&self, slot: usize) -> Option<Handle> {
        self.is_active(slot).then(|| Handle {
            slot,
            generation: self.generations[slot],
        })
    }

    /// Whether `handle` still refers to a live entity
    pub fn is_live(&self, handle: Handle) -> bool {
        self.is_active(handle.slot) && self.generations[handle.slot] == handle.generation
    }

    /// Iterate active slots in index order
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, _)| self.active[*i])
    }

    /// Snapshot the active slot indices into `buf` (cleared first).
    ///
    /// Systems that release entities while walking the pool iterate the
    /// snapshot and re-check `is_active` per slot.
    pub fn active_slots_into(&self, buf: &mut Vec<usize>) {
        buf.clear();
        buf.extend((0..self.slots.len()).filter(|&i| self.active[i]));
    }

    pub fn active_slots(&self) -> Vec<usize> {
        let mut buf = Vec::with_capacity(self.count);
        self.active_slots_into(&mut buf);
        buf
    }
}
