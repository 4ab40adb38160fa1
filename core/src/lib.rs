//! Rules engine for a row of puzzle cells: blocks slide right and annihilate
//! in opposite-parity pairs, then the player follows as far as the row allows.
#![no_std]

extern crate alloc;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use sequence::*;

mod cell;
mod engine;
mod error;
mod sequence;
