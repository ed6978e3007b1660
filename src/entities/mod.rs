//! [Entities](Entity) represent the individual "things" in your game or application.
//!
//! An [Entity] has no behaviour of its own;
//! it identifies which pieces of data ([Components](crate::components::Component)) belong together.
//! [Queries](Query) track which entities carry a given combination of components.

mod entity_query;
mod entity_registry;
mod entity_instance;

pub use entity_query::*;
pub use entity_registry::*;
pub use entity_instance::*;
