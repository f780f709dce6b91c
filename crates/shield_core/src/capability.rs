//! Capability traits for block instances.
//!
//! A block is a plain data record plus whichever of these it implements:
//! it ticks, it draws, it persists.

use std::io::{Read, Write};

use crate::error::Result;
use crate::proxy::ShieldDraw;

/// Advanced once per simulation tick with an explicit context.
pub trait Tickable<Ctx> {
    /// What one tick reports back.
    type Output;

    /// Advance by one tick.
    fn update(&mut self, ctx: &mut Ctx) -> Self::Output;
}

/// Produces draw parameters for the render layer.
pub trait Drawable {
    /// Parameters for this frame.
    fn draw(&self) -> ShieldDraw;
}

/// Saved and restored across save/load.
pub trait Persistable {
    /// Write persisted fields.
    fn write_state<W: Write>(&self, writer: W) -> Result<()>;

    /// Overwrite persisted fields from `reader`.
    fn read_state<R: Read>(&mut self, reader: R) -> Result<()>;
}
