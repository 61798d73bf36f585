//! Design - Pending build/destroy orders and the shadow grid they claim.
//!
//! Every cell of an order's footprint names that order's anchor in `claims`;
//! no two orders ever claim the same cell.

use bevy::prelude::*;
use hashbrown::HashMap;

use crate::world::{BlockKind, GridShape, Rotation};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderKind {
    Build,
    Destroy,
}

/// Pending intent, keyed by its anchor cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DesignOrder {
    pub anchor: usize,
    pub order: OrderKind,
    pub kind: BlockKind,
    pub rotation: Rotation,
    /// Base size at rotation `Up`.
    pub size: UVec2,
}

pub struct DesignState {
    shape: GridShape,
    orders: HashMap<usize, DesignOrder>,
    claims: Vec<Option<usize>>,
    scratch: Vec<usize>,
}

impl DesignState {
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            orders: HashMap::new(),
            claims: vec![None; shape.len()],
            scratch: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, anchor: usize) -> Option<&DesignOrder> {
        self.orders.get(&anchor)
    }

    pub fn orders(&self) -> impl Iterator<Item = &DesignOrder> + '_ {
        self.orders.values()
    }

    /// Anchor of the order claiming `index`, if any.
    pub fn claim(&self, index: usize) -> Option<usize> {
        self.claims.get(index).copied().flatten()
    }

    pub fn order_at(&self, index: usize) -> Option<&DesignOrder> {
        self.claim(index).and_then(|anchor| self.orders.get(&anchor))
    }

    /// Insert `order`, first evicting every order whose footprint overlaps it.
    pub fn insert(&mut self, order: DesignOrder) {
        let mut cells = std::mem::take(&mut self.scratch);
        self.shape
            .footprint(self.shape.coords(order.anchor), order.size, order.rotation, &mut cells);

        for &i in &cells {
            if let Some(other) = self.claims[i] {
                self.remove(other);
            }
        }
        for &i in &cells {
            self.claims[i] = Some(order.anchor);
        }
        self.orders.insert(order.anchor, order);
        self.scratch = cells;
    }

    /// Drop the order at `anchor` and every claim it holds.
    pub fn remove(&mut self, anchor: usize) -> Option<DesignOrder> {
        let order = self.orders.remove(&anchor)?;
        let mut cells = std::mem::take(&mut self.scratch);
        self.shape
            .footprint(self.shape.coords(anchor), order.size, order.rotation, &mut cells);
        for &i in &cells {
            if self.claims[i] == Some(anchor) {
                self.claims[i] = None;
            }
        }
        self.scratch = cells;
        Some(order)
    }

    pub fn clear(&mut self) {
        self.orders.clear();
        self.claims.iter_mut().for_each(|c| *c = None);
    }
}
