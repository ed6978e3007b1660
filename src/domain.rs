use crate::components::{Attach, Component, ComponentCell, ComponentId, ComponentKey, ComponentRegistry, ComponentType};
use crate::entities::{Entity, EntityId, EntityRef, EntityRegistry, Query, QueryHandle};
use crate::error::{EcsError, EcsResult};
use crate::events::{Event, EventData};
use std::cell::{Ref, RefMut};
use crate::config::EcsConfig;
use crate::data_structures::BitField;
use serde_json::Value;
use std::rc::Rc;
use std::fmt;

/// A self-contained world: one [ComponentRegistry], its [Entities](Entity) and the live [Queries](Query).
///
/// Every structural change to an entity goes through the domain, which forwards the entity
/// to each query in registration order.
pub struct Domain {
	name: String,
	config: EcsConfig,
	components: ComponentRegistry,
	entities: EntityRegistry,
	queries: Vec<Query>,
	detached: Vec<Detached>,
}

/// A component detached while a running handler still borrowed it.
struct Detached {
	cell: ComponentCell,
	destroyed: Option<Rc<ComponentType>>,
}

impl Domain {
	pub fn new(name: impl Into<String>) -> Self {
		Self::with_config(name, EcsConfig::default())
	}

	pub fn with_config(name: impl Into<String>, config: EcsConfig) -> Self {
		let name = name.into();
		log::debug!("created domain {}", name);
		Self {
			entities: EntityRegistry::new(config.entity_id_prefix.clone()),
			components: ComponentRegistry::new(),
			queries: Vec::new(),
			detached: Vec::new(),
			config,
			name,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn config(&self) -> &EcsConfig {
		&self.config
	}

	pub fn components(&self) -> &ComponentRegistry {
		&self.components
	}

	pub fn entities(&self) -> &EntityRegistry {
		&self.entities
	}

	/// Register the component type `T`.
	pub fn register<T: Component>(&mut self) -> EcsResult<ComponentId> {
		self.components.register_type::<T>()
	}

	pub fn register_type(&mut self, component_type: ComponentType) -> EcsResult<ComponentId> {
		self.components.register(component_type)
	}

	/// Creates a single [entity](Entity) with no components attached.
	pub fn create_entity(&mut self, alias: Option<&str>) -> EcsResult<EntityId> {
		let id = self.entities.create(alias)?;
		self.candidate(&id);
		Ok(id)
	}

	/// Creates a single [entity](Entity) with an explicit id.
	pub fn create_entity_with_id(&mut self, id: impl Into<EntityId>, alias: Option<&str>) -> EcsResult<EntityId> {
		let id = self.entities.create_with_id(id.into(), alias)?;
		self.candidate(&id);
		Ok(id)
	}

	/// Look up an entity by alias, creating a new aliased entity if none is bound yet.
	pub fn get_by_alias(&mut self, alias: &str) -> EcsResult<&Entity> {
		let id = match self.entities.id_of(alias) {
			Some(id) => id.clone(),
			None => {
				log::warn!("alias {} is not bound, creating a new entity for it", alias);
				self.create_entity(Some(alias))?
			},
		};

		self.get_by_id(&id)
	}

	pub fn get_by_id(&self, id: &EntityId) -> EcsResult<&Entity> {
		self.entities.get(id).ok_or_else(|| EcsError::UnknownEntity(id.to_string()))
	}

	/// Look up an entity by id, or by alias then id when given a string.
	pub fn entity<'e>(&self, entity: impl Into<EntityRef<'e>>) -> EcsResult<&Entity> {
		let id = self.resolve(entity)?;
		self.get_by_id(&id)
	}

	/// Normalize an entity reference to the id of a live entity.
	pub fn resolve<'e>(&self, entity: impl Into<EntityRef<'e>>) -> EcsResult<EntityId> {
		let entity = entity.into();
		self.entities.resolve(entity).ok_or_else(|| EcsError::UnknownEntity(entity.to_string()))
	}

	/// The alias bound to an entity, if any.
	pub fn alias_of(&self, id: &EntityId) -> Option<&str> {
		self.entities.alias_of(id)
	}

	/// Attach a component, then re-evaluate the entity against every query.
	pub fn attach<'e>(
		&mut self, entity: impl Into<EntityRef<'e>>, attach: impl Into<Attach>, properties: Option<Value>,
	) -> EcsResult<ComponentId> {
		let id = self.resolve(entity)?;
		let entity = self.entities.get_mut(&id).ok_or_else(|| EcsError::UnknownEntity(id.to_string()))?;

		let component = self.components.attach(entity, attach.into(), properties)?;
		if entity.query_eligible {
			self.candidate(&id);
		}

		Ok(component)
	}

	/// Attach an already built component value.
	pub fn add<'e, T: Component>(&mut self, entity: impl Into<EntityRef<'e>>, component: T) -> EcsResult<ComponentId> {
		self.attach(entity, Attach::instance(component), None)
	}

	/// Detach every instance of a component type, then re-evaluate the entity against every query.
	pub fn remove<'e>(&mut self, entity: impl Into<EntityRef<'e>>, key: impl Into<ComponentKey>) -> EcsResult<()> {
		let id = self.resolve(entity)?;
		let entity = self.entities.get_mut(&id).ok_or_else(|| EcsError::UnknownEntity(id.to_string()))?;

		let cells = self.components.remove(entity, key)?;
		if entity.query_eligible {
			self.candidate(&id);
		}

		for cell in cells {
			self.release(cell, None);
		}

		Ok(())
	}

	/// Whether the entity carries the component. Unknown entities and types yield `false`.
	pub fn has<'e>(&self, entity: impl Into<EntityRef<'e>>, key: impl Into<ComponentKey>) -> bool {
		let entity = self.entities.resolve(entity.into()).and_then(|id| self.entities.get(&id));
		self.components.has(entity, key)
	}

	/// Borrow the first attached instance of `T`.
	pub fn get<'e, T: Component>(&self, entity: impl Into<EntityRef<'e>>) -> EcsResult<Ref<'_, T>> {
		let entity = self.entity(entity)?;
		let cell = self.first_cell(entity, &ComponentKey::of::<T>())?;
		let instance = cell.try_borrow().map_err(|_| busy::<T>(entity))?;
		Ref::filter_map(instance, |i| i.downcast_ref::<T>()).map_err(|_| not_attached(entity, T::NAME))
	}

	/// Mutably borrow the first attached instance of `T`.
	pub fn get_mut<'e, T: Component>(&self, entity: impl Into<EntityRef<'e>>) -> EcsResult<RefMut<'_, T>> {
		let entity = self.entity(entity)?;
		let cell = self.first_cell(entity, &ComponentKey::of::<T>())?;
		let instance = cell.try_borrow_mut().map_err(|_| busy::<T>(entity))?;
		RefMut::filter_map(instance, |i| i.downcast_mut::<T>()).map_err(|_| not_attached(entity, T::NAME))
	}

	/// Borrow every attached instance of `T`, in attachment order.
	pub fn get_all<'e, T: Component>(&self, entity: impl Into<EntityRef<'e>>) -> EcsResult<Vec<Ref<'_, T>>> {
		let entity = self.entity(entity)?;
		let id = self.components.resolve(&ComponentKey::of::<T>())?;

		entity
			.cells(id)
			.iter()
			.map(|cell| {
				let instance = cell.try_borrow().map_err(|_| busy::<T>(entity))?;
				Ref::filter_map(instance, |i| i.downcast_ref::<T>()).map_err(|_| not_attached(entity, T::NAME))
			})
			.collect()
	}

	/// The first attached instance of a component type, looked up by key.
	pub fn component<'e>(&self, entity: impl Into<EntityRef<'e>>, key: impl Into<ComponentKey>) -> EcsResult<ComponentCell> {
		let entity = self.entity(entity)?;
		self.first_cell(entity, &key.into()).cloned()
	}

	/// Register a query and evaluate it against every existing entity.
	pub fn create_query(
		&mut self, all_of: &[ComponentKey], any_of: &[ComponentKey], none_of: &[ComponentKey],
	) -> EcsResult<QueryHandle> {
		let mut query = Query::new(self.mask(all_of)?, self.mask(any_of)?, self.mask(none_of)?);
		query.refresh(self.entities.iter());

		let handle = QueryHandle::new(self.queries.len());
		log::debug!("created query {:?} with {} matches", handle, query.len());
		self.queries.push(query);
		Ok(handle)
	}

	/// # Panics
	/// If the handle was not created by this domain.
	pub fn query(&self, handle: QueryHandle) -> &Query {
		&self.queries[handle.index()]
	}

	pub fn get_query(&self, handle: QueryHandle) -> Option<&Query> {
		self.queries.get(handle.index())
	}

	/// Rebuild a query from scratch.
	///
	/// # Panics
	/// If the handle was not created by this domain.
	pub fn refresh(&mut self, handle: QueryHandle) {
		self.queries[handle.index()].refresh(self.entities.iter());
	}

	/// Forward an entity to every query, in registration order.
	pub fn candidate(&mut self, id: &EntityId) {
		if let Some(entity) = self.entities.get(id) {
			log::trace!("candidacy for entity {}", id);
			for query in self.queries.iter_mut() {
				query.candidate(entity);
			}
		}
	}

	/// Destroy an entity: every component is notified and detached, then the entity
	/// leaves every query and the registry.
	pub fn destroy_entity<'e>(&mut self, entity: impl Into<EntityRef<'e>>) -> EcsResult<()> {
		let id = self.resolve(entity)?;
		let entity = self.entities.get_mut(&id).ok_or_else(|| EcsError::UnknownEntity(id.to_string()))?;

		let components = std::mem::take(&mut entity.components);
		entity.cbits.clear();

		for (component, cells) in components {
			let component_type = self.components.type_of(component).cloned();
			for cell in cells {
				self.release(cell, component_type.clone());
			}
		}

		for query in self.queries.iter_mut() {
			query.forget(&id);
		}

		self.entities.remove(&id);
		log::debug!("destroyed entity {}", id);
		Ok(())
	}

	/// Dispatch an event through the entity's components in attachment order.
	///
	/// Each component sees its generic hook first, then its handler for the event's name.
	/// Dispatch stops after the first component that prevents the event.
	/// Components detached by an earlier handler are skipped, and so are components without
	/// a handler for the event, which lets a handler fire events at its own entity.
	pub fn fire_event<'e>(
		&mut self, entity: impl Into<EntityRef<'e>>, name: &str, data: impl Into<EventData>,
	) -> EcsResult<Event> {
		let id = self.resolve(entity)?;
		let mut event = Event::new(name, data.into());

		let mut targets = Vec::new();
		for (component, cells) in &self.get_by_id(&id)?.components {
			if let Some(component_type) = self.components.type_of(*component) {
				targets.extend(cells.iter().map(|cell| (component_type.clone(), cell.clone())));
			}
		}

		log::trace!("firing {} on entity {} ({} components)", name, id, targets.len());
		for (component_type, cell) in targets {
			if !component_type.handles(name) {
				continue;
			}

			let mut instance = cell.try_borrow_mut().map_err(|_| EcsError::ComponentBusy {
				entity: id.clone(),
				component: component_type.name().to_owned(),
			})?;

			if instance.entity.as_ref() != Some(&id) {
				continue;
			}

			let result = component_type.behavior().handle_event(instance.value.as_mut(), &mut event, self);
			drop(instance);
			self.settle();

			if let Err(source) = result {
				log::error!("{} handler for {} on entity {} failed: {}", component_type.name(), name, id, source);
				return Err(EcsError::Handler {
					entity: id,
					component: component_type.name().to_owned(),
					event: name.to_owned(),
					source,
				});
			}

			if event.prevented() {
				break;
			}
		}

		Ok(event)
	}

	pub(crate) fn set_query_eligible(&mut self, id: &EntityId, eligible: bool) {
		if let Some(entity) = self.entities.get_mut(id) {
			entity.query_eligible = eligible;
		}
	}

	/// Clear the back-reference of a detached component, running its destroy hook first if given.
	/// Cells borrowed by a running handler are finished by [Self::settle] once the handler returns.
	fn release(&mut self, cell: ComponentCell, destroyed: Option<Rc<ComponentType>>) {
		match cell.try_borrow_mut() {
			Ok(mut instance) => {
				if let Some(component_type) = &destroyed {
					component_type.behavior().destroyed(instance.value.as_mut());
				}
				instance.entity = None;
			},
			Err(_) => self.detached.push(Detached { cell: cell.clone(), destroyed }),
		}
	}

	fn settle(&mut self) {
		self.detached.retain(|pending| match pending.cell.try_borrow_mut() {
			Ok(mut instance) => {
				if let Some(component_type) = &pending.destroyed {
					component_type.behavior().destroyed(instance.value.as_mut());
				}
				instance.entity = None;
				false
			},
			Err(_) => true,
		});
	}

	fn mask(&self, keys: &[ComponentKey]) -> EcsResult<BitField> {
		let ids = keys.iter().map(|key| self.components.resolve(key)).collect::<EcsResult<Vec<_>>>()?;
		Ok(BitField::from(ids.as_slice()))
	}

	fn first_cell<'a>(&self, entity: &'a Entity, key: &ComponentKey) -> EcsResult<&'a ComponentCell> {
		let id = self.components.resolve(key)?;
		match entity.cells(id).first() {
			Some(cell) => Ok(cell),
			None => Err(not_attached(entity, &self.component_name(id))),
		}
	}

	fn component_name(&self, id: ComponentId) -> String {
		self.components.type_of(id).map(|t| t.name().to_owned()).unwrap_or_else(|| id.to_string())
	}
}

impl fmt::Debug for Domain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Domain")
			.field("name", &self.name)
			.field("components", &self.components.len())
			.field("entities", &self.entities.len())
			.field("queries", &self.queries.len())
			.finish()
	}
}

impl Default for Domain {
	fn default() -> Self {
		Self::new("default")
	}
}

fn not_attached(entity: &Entity, component: &str) -> EcsError {
	EcsError::ComponentNotAttached {
		entity: entity.id().clone(),
		component: component.to_owned(),
	}
}

fn busy<T: Component>(entity: &Entity) -> EcsError {
	EcsError::ComponentBusy {
		entity: entity.id().clone(),
		component: T::NAME.to_owned(),
	}
}
