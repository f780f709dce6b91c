//! Resource consumption boundary.
//!
//! Item and liquid accounting belongs to the surrounding block framework.
//! The projector reads and spends through the [`Consumers`] trait;
//! [`BlockStorage`] is a plain in-memory implementation used by the
//! simulation host and tools.

use serde::{Deserialize, Serialize};

/// A liquid that may be pumped into the projector as coolant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coolant {
    /// Temperature on a 0..1 scale (0.5 is ambient).
    pub temperature: f32,
    /// Flammability on a 0..1+ scale.
    pub flammability: f32,
    /// Heat capacity; 0.4 is water, the baseline.
    pub heat_capacity: f32,
}

impl Coolant {
    /// Water: ambient temperature, baseline heat capacity.
    pub const WATER: Self = Self {
        temperature: 0.5,
        flammability: 0.0,
        heat_capacity: 0.4,
    };

    /// Cryofluid: cold and high capacity.
    pub const CRYOFLUID: Self = Self {
        temperature: 0.25,
        flammability: 0.0,
        heat_capacity: 0.9,
    };

    /// Oil: flammable, never accepted as coolant.
    pub const OIL: Self = Self {
        temperature: 0.5,
        flammability: 1.2,
        heat_capacity: 0.7,
    };
}

/// Count and capacity of the tracked charge item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemCount {
    /// Items currently held.
    pub total: u32,
    /// Maximum items the block can hold.
    pub capacity: u32,
}

impl ItemCount {
    /// Fill ratio in `[0, 1]`; an empty-capacity buffer reads as 0.
    #[must_use]
    pub fn fill_ratio(self) -> f32 {
        if self.capacity == 0 {
            0.0
        } else {
            (self.total as f32 / self.capacity as f32).min(1.0)
        }
    }
}

/// Consumption accounting exposed by the owning block.
pub trait Consumers {
    /// Whether the block's non-power consumers are satisfied this tick.
    fn consumes_valid(&self) -> bool;

    /// Liquid in the tank and the amount held, if any.
    fn liquid(&self) -> Option<(Coolant, f32)>;

    /// Remove `amount` of the current liquid.
    fn remove_liquid(&mut self, amount: f32);

    /// Charge item count and capacity.
    fn items(&self) -> ItemCount;

    /// Remove one charge item.
    fn remove_item(&mut self);
}

/// In-memory item buffer and liquid tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStorage {
    /// Charge items held.
    pub items: u32,
    /// Charge item capacity.
    pub item_capacity: u32,
    /// Liquid in the tank, if any.
    pub liquid: Option<Coolant>,
    /// Amount of liquid held.
    pub liquid_amount: f32,
    /// Tank capacity.
    pub liquid_capacity: f32,
    /// Whether the rest of the block's consumers are satisfied.
    pub enabled: bool,
}

impl BlockStorage {
    /// Create an empty storage with the given capacities.
    #[must_use]
    pub const fn new(item_capacity: u32, liquid_capacity: f32) -> Self {
        Self {
            items: 0,
            item_capacity,
            liquid: None,
            liquid_amount: 0.0,
            liquid_capacity,
            enabled: true,
        }
    }

    /// Add charge items, respecting capacity.
    ///
    /// Returns the number actually accepted.
    pub fn add_items(&mut self, amount: u32) -> u32 {
        let accepted = amount.min(self.item_capacity.saturating_sub(self.items));
        self.items += accepted;
        accepted
    }

    /// Pump liquid into the tank.
    ///
    /// A tank holding a different liquid refuses until it is drained.
    /// Returns the amount actually accepted.
    pub fn add_liquid(&mut self, coolant: Coolant, amount: f32) -> f32 {
        match self.liquid {
            Some(current) if current != coolant && self.liquid_amount > 0.0 => return 0.0,
            _ => {}
        }
        let accepted = amount.max(0.0).min(self.liquid_capacity - self.liquid_amount);
        if accepted > 0.0 {
            self.liquid = Some(coolant);
            self.liquid_amount += accepted;
        }
        accepted
    }
}

impl Consumers for BlockStorage {
    fn consumes_valid(&self) -> bool {
        self.enabled
    }

    fn liquid(&self) -> Option<(Coolant, f32)> {
        self.liquid.map(|coolant| (coolant, self.liquid_amount))
    }

    fn remove_liquid(&mut self, amount: f32) {
        self.liquid_amount = (self.liquid_amount - amount).max(0.0);
    }

    fn items(&self) -> ItemCount {
        ItemCount {
            total: self.items,
            capacity: self.item_capacity,
        }
    }

    fn remove_item(&mut self) {
        self.items = self.items.saturating_sub(1);
    }
}
