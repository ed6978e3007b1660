//! A serializable listing of a [Domain]'s entities, for external persistence.
//!
//! Restoring goes through attach-by-name, so the target domain assigns its own bits
//! and back-references exactly as it would for freshly attached components.

use crate::error::{EcsError, EcsResult};
use serde::{Deserialize, Serialize};
use crate::components::Attach;
use crate::entities::EntityId;
use serde_json::{Map, Value};
use crate::domain::Domain;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
	#[serde(rename = "type")]
	pub component_type: String,
	/// The bit the component had in the source domain. Informational only.
	pub cbit: u32,
	pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
	pub id: EntityId,
	#[serde(default)]
	pub alias: Option<String>,
	#[serde(default)]
	pub components: Vec<ComponentSnapshot>,
}

/// Every entity of a domain, in creation order, with its components in attachment order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainSnapshot {
	pub entities: Vec<EntitySnapshot>,
}

impl DomainSnapshot {
	pub fn to_json(&self) -> EcsResult<String> {
		serde_json::to_string(self).map_err(EcsError::Snapshot)
	}

	pub fn from_json(json: &str) -> EcsResult<Self> {
		serde_json::from_str(json).map_err(EcsError::Snapshot)
	}
}

impl Domain {
	/// List every entity with its alias and the property bags of its components.
	pub fn snapshot(&self) -> EcsResult<DomainSnapshot> {
		let mut entities = Vec::with_capacity(self.entities().len());

		for entity in self.entities().iter() {
			let mut components = Vec::new();
			for (id, cells) in &entity.components {
				for cell in cells {
					let instance = cell.try_borrow().map_err(|_| EcsError::ComponentBusy {
						entity: entity.id().clone(),
						component: id.to_string(),
					})?;

					components.push(ComponentSnapshot {
						component_type: instance.type_name().to_owned(),
						cbit: id.value(),
						properties: self.components().properties(&instance)?,
					});
				}
			}

			entities.push(EntitySnapshot {
				id: entity.id().clone(),
				alias: self.alias_of(entity.id()).map(str::to_owned),
				components,
			});
		}

		Ok(DomainSnapshot { entities })
	}

	/// Recreate the entities of a snapshot, keeping their ids and aliases.
	///
	/// Queries see each entity once, after all of its components are attached.
	pub fn restore(&mut self, snapshot: &DomainSnapshot) -> EcsResult<Vec<EntityId>> {
		let mut restored = Vec::with_capacity(snapshot.entities.len());

		for entity in &snapshot.entities {
			let id = self.create_entity_with_id(entity.id.clone(), entity.alias.as_deref())?;
			self.set_query_eligible(&id, false);

			if let Err(err) = self.restore_components(&id, entity) {
				if let Err(cleanup) = self.destroy_entity(&id) {
					log::error!("failed to clean up entity {}: {}", id, cleanup);
				}
				return Err(err);
			}

			self.set_query_eligible(&id, true);
			self.candidate(&id);
			restored.push(id);
		}

		log::debug!("restored {} entities into domain {}", restored.len(), self.name());
		Ok(restored)
	}

	fn restore_components(&mut self, id: &EntityId, entity: &EntitySnapshot) -> EcsResult<()> {
		for component in &entity.components {
			let properties = Some(Value::Object(component.properties.clone()));
			self.attach(id, Attach::named(component.component_type.as_str()), properties)?;
		}
		Ok(())
	}
}
