//! Slot Pool - Growable record storage with stable addresses and LIFO slot reuse.
//!
//! Freed addresses are handed out again before any virgin slot. The pool never
//! shrinks: `clear` keeps both the backing length and the high-water mark.

use std::collections::TryReserveError;

use thiserror::Error;
use tracing::{error, warn};

use crate::constants::{POOL_ADDRESS_CEILING, POOL_GROWTH_FACTOR};

// ============================================================================
// ADDRESS
// ============================================================================

/// Stable handle to a pool slot. Valid from `create` until `destroy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub u16);

impl Address {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("pool is full ({ceiling} slots issued)")]
    Full { ceiling: usize },
    #[error("pool storage could not grow: {0}")]
    Grow(#[from] TryReserveError),
}

// ============================================================================
// SLOT POOL
// ============================================================================

pub struct SlotPool<T> {
    values: Vec<T>,
    active: Vec<bool>,
    free: Vec<Address>,
    count: usize,
    /// Next virgin slot. Also the capacity high-water mark.
    next: usize,
    ceiling: usize,
}

impl<T: Default + Clone> Default for SlotPool<T> {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_POOL_CAPACITY)
    }
}

impl<T: Default + Clone> SlotPool<T> {
    /// Pool with `capacity` preallocated slots and the default address ceiling.
    pub fn new(capacity: usize) -> Self {
        Self::with_ceiling(capacity, POOL_ADDRESS_CEILING)
    }

    /// Pool that refuses to issue more than `ceiling` distinct virgin slots.
    /// Ceilings above `POOL_ADDRESS_CEILING` are clamped to it.
    pub fn with_ceiling(capacity: usize, ceiling: usize) -> Self {
        let ceiling = ceiling.min(POOL_ADDRESS_CEILING);
        let capacity = capacity.min(ceiling);
        Self {
            values: vec![T::default(); capacity],
            active: vec![false; capacity],
            free: Vec::new(),
            count: 0,
            next: 0,
            ceiling,
        }
    }

    /// Store `value` and return its address. Fails without mutation when the
    /// ceiling is reached or the backing arrays cannot grow.
    pub fn create(&mut self, value: T) -> Result<Address, PoolError> {
        let address = match self.free.pop() {
            Some(address) => address,
            None => {
                if self.next >= self.ceiling {
                    warn!("slot pool full: {} of {} slots issued", self.next, self.ceiling);
                    return Err(PoolError::Full { ceiling: self.ceiling });
                }
                if self.next >= self.values.len() {
                    self.grow()?;
                }
                let address = Address(self.next as u16);
                self.next += 1;
                address
            }
        };

        let i = address.index();
        self.values[i] = value;
        self.active[i] = true;
        self.count += 1;
        Ok(address)
    }

    /// Grow both backing arrays by the growth factor (at least one slot),
    /// never past the ceiling.
    fn grow(&mut self) -> Result<(), PoolError> {
        let len = self.values.len();
        let target = ((len as f64 * POOL_GROWTH_FACTOR) as usize)
            .min(self.ceiling)
            .max(len + 1);
        let extra = target - len;
        self.values.try_reserve_exact(extra)?;
        self.active.try_reserve_exact(extra)?;
        self.values.resize(target, T::default());
        self.active.resize(target, false);
        Ok(())
    }

    /// Release `address` for reuse. Releasing an inactive address is a bug.
    pub fn destroy(&mut self, address: Address) {
        let i = address.index();
        let live = self.active.get(i).copied().unwrap_or(false);
        debug_assert!(live, "destroy of inactive pool address {}", i);
        if !live {
            error!("ignored destroy of inactive pool address {}", i);
            return;
        }
        self.active[i] = false;
        self.free.push(address);
        self.count -= 1;
    }

    #[inline]
    pub fn read(&self, address: Address) -> &T {
        debug_assert!(self.is_active(address), "read of inactive pool address {}", address.0);
        &self.values[address.index()]
    }

    #[inline]
    pub fn read_mut(&mut self, address: Address) -> &mut T {
        debug_assert!(self.is_active(address), "write of inactive pool address {}", address.0);
        &mut self.values[address.index()]
    }

    pub fn get(&self, address: Address) -> Option<&T> {
        self.is_active(address).then(|| &self.values[address.index()])
    }

    pub fn get_mut(&mut self, address: Address) -> Option<&mut T> {
        if self.is_active(address) {
            Some(&mut self.values[address.index()])
        } else {
            None
        }
    }

    #[inline]
    pub fn is_active(&self, address: Address) -> bool {
        self.active.get(address.index()).copied().unwrap_or(false)
    }

    /// Live records.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Virgin slots issued so far (high-water mark), not the backing length.
    pub fn capacity(&self) -> usize {
        self.next
    }

    pub fn physical_len(&self) -> usize {
        self.values.len()
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Deactivate every slot. Lowest addresses are reissued first afterwards.
    pub fn clear(&mut self) {
        self.active.iter_mut().for_each(|a| *a = false);
        self.free.clear();
        self.free.extend((0..self.next).rev().map(|i| Address(i as u16)));
        self.count = 0;
    }

    /// Live `(address, value)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Address, &T)> + '_ {
        self.values[..self.next]
            .iter()
            .zip(&self.active)
            .enumerate()
            .filter(|(_, (_, live))| **live)
            .map(|(i, (value, _))| (Address(i as u16), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Address, &mut T)> + '_ {
        self.values[..self.next]
            .iter_mut()
            .zip(&self.active)
            .enumerate()
            .filter(|(_, (_, live))| **live)
            .map(|(i, (value, _))| (Address(i as u16), value))
    }
}
