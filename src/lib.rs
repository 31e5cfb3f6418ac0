//! Unsafe Memory Tour
//!
//! A guided walk through the things the borrow checker normally keeps you
//! from doing, each one done on purpose inside `unsafe`.
//!
//! ## Demonstrations
//!
//! 1. **Basic Conversions** - read an integer's bits as a float and back
//! 2. **Private Field Access** - write a private field through `base + offset`
//! 3. **Pointer Arithmetic** - walk an array by byte offsets, inspect padding
//! 4. **uintptr GC Danger** - read through a `usize` after its allocation is freed
//!
//! Offsets, sizes and alignments always come from `offset_of!`, `size_of` and
//! `align_of`; see [`layout`].
//!
//! ## Running
//!
//! ```bash
//! cargo run --bin unsafe_tour
//! UNSAFE_TOUR_LOG=debug cargo run --bin unsafe_tour
//! ```

pub mod config;
pub mod dangling;
pub mod error;
pub mod field_access;
pub mod layout;
pub mod pointer_arith;
pub mod records;
pub mod reinterpret;
pub mod tour;

pub use config::TourConfig;
pub use error::TourError;
pub use tour::{run_tour, Section};
