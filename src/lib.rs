extern crate self as prefab_ecs;

pub mod data_structures;
pub mod components;
pub mod entities;
pub mod systems;
pub mod prefabs;
pub mod events;
pub mod domain;
pub mod engine;
pub mod snapshot;
pub mod config;
pub mod error;

pub use error::{EcsError, EcsResult};

pub mod prelude {
	pub use crate::systems::*;
	pub use crate::components::*;
	pub use crate::domain::Domain;
	pub use crate::engine::Engine;
	pub use crate::config::EcsConfig;
	pub use crate::error::{EcsError, EcsResult};
	pub use crate::events::{Event, EventData};
	pub use crate::snapshot::DomainSnapshot;
	pub use crate::prefabs::{ComponentTemplate, EntityTemplate, PrefabBuilder};
	pub use crate::entities::{Entity, EntityId, EntityRef, Query, QueryBuilder, QueryHandle};
}

#[cfg(test)]
mod tests;
