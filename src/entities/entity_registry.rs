use crate::entities::{Entity, EntityId, EntityRef};
use crate::error::{EcsError, EcsResult};
use std::time::{SystemTime, UNIX_EPOCH};
use std::collections::HashMap;
use indexmap::IndexMap;

/// A container for [Entities](Entity), in creation order, and their aliases.
#[derive(Default)]
pub struct EntityRegistry {
	prefix: String,
	counter: u64,
	entities: IndexMap<EntityId, Entity>,
	alias_to_id: HashMap<String, EntityId>,
	id_to_alias: HashMap<EntityId, String>,
}

impl EntityRegistry {
	pub(crate) fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			..Self::default()
		}
	}

	/// Creates a single [entity](Entity) with a fresh id and no components attached.
	pub fn create(&mut self, alias: Option<&str>) -> EcsResult<EntityId> {
		self.check_alias(alias)?;

		let id = loop {
			let id = self.next_id();
			if !self.entities.contains_key(&id) {
				break id;
			}
		};

		self.insert(id.clone(), alias);
		Ok(id)
	}

	/// Creates a single [entity](Entity) with an explicit id.
	pub fn create_with_id(&mut self, id: EntityId, alias: Option<&str>) -> EcsResult<EntityId> {
		if self.entities.contains_key(&id) {
			return Err(EcsError::DuplicateEntity(id));
		}

		self.check_alias(alias)?;
		self.insert(id.clone(), alias);
		Ok(id)
	}

	/// Resolve a reference to the id of a live entity.
	pub fn resolve(&self, entity: EntityRef) -> Option<EntityId> {
		match entity {
			EntityRef::Id(id) => self.entities.contains_key(id).then(|| id.clone()),
			EntityRef::Name(name) => match self.alias_to_id.get(name) {
				Some(id) => Some(id.clone()),
				None => self.entities.get_key_value(name).map(|(id, _)| id.clone()),
			},
		}
	}

	pub fn get(&self, id: &EntityId) -> Option<&Entity> {
		self.entities.get(id)
	}

	pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
		self.entities.get_mut(id)
	}

	/// The id bound to `alias`, if any.
	pub fn id_of(&self, alias: &str) -> Option<&EntityId> {
		self.alias_to_id.get(alias)
	}

	/// The alias bound to `id`, if any.
	pub fn alias_of(&self, id: &EntityId) -> Option<&str> {
		self.id_to_alias.get(id).map(String::as_str)
	}

	/// Remove an entity and unbind its alias.
	pub(crate) fn remove(&mut self, id: &EntityId) -> Option<Entity> {
		if let Some(alias) = self.id_to_alias.remove(id) {
			self.alias_to_id.remove(&alias);
		}

		self.entities.shift_remove(id)
	}

	/// Iterate over all entities in creation order.
	pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
		self.entities.values()
	}

	pub fn ids(&self) -> impl Iterator<Item = &EntityId> + '_ {
		self.entities.keys()
	}

	pub fn len(&self) -> usize {
		self.entities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	fn check_alias(&self, alias: Option<&str>) -> EcsResult<()> {
		match alias {
			Some(alias) if self.alias_to_id.contains_key(alias) => Err(EcsError::DuplicateAlias(alias.to_owned())),
			_ => Ok(()),
		}
	}

	fn insert(&mut self, id: EntityId, alias: Option<&str>) {
		if let Some(alias) = alias {
			self.alias_to_id.insert(alias.to_owned(), id.clone());
			self.id_to_alias.insert(id.clone(), alias.to_owned());
		}

		log::debug!("created entity {} (alias: {:?})", id, alias);
		self.entities.insert(id.clone(), Entity::new(id));
	}

	fn next_id(&mut self) -> EntityId {
		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|d| d.as_nanos())
			.unwrap_or_default();

		self.counter += 1;
		EntityId::new(format!("{}{:x}-{:x}", self.prefix, nanos, self.counter))
	}
}
