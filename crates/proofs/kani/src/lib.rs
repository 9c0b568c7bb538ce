//! Kani proofs for the stakied_core pricing and accrual math
//!
//! Run with `cargo kani -p proofs-kani`. Outside Kani only the sanitizer
//! (and its unit tests) is compiled.

#![cfg_attr(kani, feature(register_tool), register_tool(kanitool))]

pub mod sanitizer;
pub mod generators;

#[cfg(kani)]
pub mod safety;

#[cfg(kani)]
mod minimal;
