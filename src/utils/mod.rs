//! Utility helpers: generational allocation and step-timing logs.

pub mod allocator;
pub mod logging;

pub use allocator::{Arena, BodyHandle, GenerationalId, ShapeHandle};
pub use logging::{warn_if_frame_budget_exceeded, ScopedTimer};
