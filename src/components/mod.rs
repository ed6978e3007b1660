//! [Components](Component) hold the data of [Entities](crate::entities::Entity).
//!
//! Every component type is registered in a [ComponentRegistry], which assigns it a dense
//! [ComponentId]. An entity's set of components is mirrored in a bit mask indexed by those ids.

mod component_id;
mod component_set;
mod component_type;
mod component_instance;
mod component_registry;

pub use component_id::*;
pub use component_set::*;
pub use component_type::*;
pub use component_instance::*;
pub use component_registry::*;
pub use prefab_ecs_derive::Component;
