//! Generalized birthday search: find distinct 64-bit seeds whose
//! SHA-256 digests sum (mod 2^256) to a chosen target prefix.
//!
//! The engine builds an additive collision tree. Each stage matches a
//! sorted pool against the negated arrivals of the stage below it,
//! pinning 32 more bits of the target per level; the driver peels the
//! target one 32-bit window at a time and re-targets the residual.
//! Stage pools spill to memory-mapped files sized well beyond RAM.

mod config;
mod driver;
mod elem;
mod error;
mod fvec;
mod generator;
pub mod io_utils;
mod stage;
mod stats;

pub use config::{parse_target, Params};
pub use driver::{first_unsolved_window, residual_target, solve, window_target, Solution};
pub use elem::{Element, FoundRecord};
pub use error::SeedsumError;
pub use fvec::FVec;
pub use generator::Generator;
pub use stage::Stage;
pub use stats::RunStats;
