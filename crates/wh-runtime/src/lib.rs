//! `wh-runtime` - Tensor-slot model runtime abstraction for wordhint.
//!
//! This crate provides:
//! - `SlotId` handles and `SlotRole` tags for the runtime's tensor buffers
//! - The `ModelRuntime` trait for pluggable forward-pass back ends
//! - `CacheRotationMap` describing which outputs refill which inputs
//! - `SlotRegistry` bundling the control slots with the rotation map
//! - A `ScriptedRuntime` reference implementation for tests and harnesses

pub mod error;
pub mod rotation;
pub mod runtime;
pub mod scripted;
pub mod slot;

// Re-export primary types at the crate root for convenience.
pub use error::{Result, RuntimeError};
pub use rotation::CacheRotationMap;
pub use runtime::ModelRuntime;
pub use scripted::ScriptedRuntime;
pub use slot::{SlotId, SlotRegistry, SlotRole};
