#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod complexity;
mod crap;

pub use complexity::{cyclomatic_complexity, Complexity};
pub use crap::{clamp_coverage, crap_index};
