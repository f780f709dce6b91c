//! Persisted shield state.
//!
//! Fixed 17-byte layout, fields in this order:
//!
//! | Field          | Width | Encoding                 |
//! |----------------|-------|--------------------------|
//! | `broken`       | 1     | `0x00` / `0x01`          |
//! | `buildup`      | 4     | IEEE-754 f32, big-endian |
//! | `radius_scale` | 4     | IEEE-754 f32, big-endian |
//! | `warmup`       | 4     | IEEE-754 f32, big-endian |
//! | `heat_level`   | 4     | IEEE-754 f32, big-endian |
//!
//! Reading replaces only these five fields. Short input or a bool byte
//! other than 0/1 is a [`ShieldError::Persistence`].

use std::io::{Read, Write};

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::capability::Persistable;
use crate::error::{Result, ShieldError};
use crate::state::ShieldState;

/// Encoded size of one shield state.
pub const PERSISTED_LEN: usize = 17;

#[derive(Serialize, Deserialize)]
struct PersistedShield {
    broken: bool,
    buildup: f32,
    radius_scale: f32,
    warmup: f32,
    heat_level: f32,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_big_endian()
}

impl Persistable for ShieldState {
    fn write_state<W: Write>(&self, writer: W) -> Result<()> {
        let record = PersistedShield {
            broken: self.broken,
            buildup: self.buildup,
            radius_scale: self.radius_scale,
            warmup: self.warmup,
            heat_level: self.heat_level,
        };
        codec()
            .serialize_into(writer, &record)
            .map_err(|e| ShieldError::Persistence(format!("Failed to write shield state: {e}")))
    }

    fn read_state<R: Read>(&mut self, reader: R) -> Result<()> {
        let record: PersistedShield = codec()
            .deserialize_from(reader)
            .map_err(|e| ShieldError::Persistence(format!("Failed to read shield state: {e}")))?;
        self.broken = record.broken;
        self.buildup = record.buildup;
        self.radius_scale = record.radius_scale;
        self.warmup = record.warmup;
        self.heat_level = record.heat_level;
        Ok(())
    }
}

impl ShieldState {
    /// Encode the persisted fields.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(PERSISTED_LEN);
        self.write_state(&mut bytes)?;
        Ok(bytes)
    }

    /// Decode a state from exactly [`PERSISTED_LEN`] bytes.
    ///
    /// Transient fields start fresh. The `broken` byte must be 0 or 1;
    /// writers never produce anything else, so other values are rejected
    /// as corrupt rather than read as `true`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PERSISTED_LEN {
            return Err(ShieldError::Persistence(format!(
                "Expected {PERSISTED_LEN} bytes of shield state, got {}",
                bytes.len()
            )));
        }
        let mut state = Self::new();
        state.read_state(bytes)?;
        Ok(state)
    }
}
