//! [Systems](System) provide the logic for modifying the state of [Entities](crate::entities::Entity)
//! and their associated [Components](crate::components::Component).
//!
//! A [System] must be manually added to a [SystemStore]
//! for it to become active during the execution of the program.

mod system;
mod system_store;

pub use system::*;
pub use system_store::*;
