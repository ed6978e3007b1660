use crate::components::{normalize, Attach, Component, ComponentCell, ComponentId, ComponentInstance, ComponentKey, ComponentType};
use crate::error::{EcsError, EcsResult};
use serde_json::{Map, Value};
use std::hash::BuildHasherDefault;
use nohash_hasher::NoHashHasher;
use crate::entities::Entity;
use std::collections::HashMap;
use std::any::TypeId;
use std::rc::Rc;

type Hasher = BuildHasherDefault<NoHashHasher<u64>>;

/// A [ComponentType] together with the bit its registry assigned to it.
#[derive(Clone, Debug)]
pub struct RegisteredComponent {
	id: ComponentId,
	component_type: Rc<ComponentType>,
}

impl RegisteredComponent {
	pub fn id(&self) -> ComponentId {
		self.id
	}

	pub fn name(&self) -> &'static str {
		self.component_type.name()
	}

	pub fn allow_multiple(&self) -> bool {
		self.component_type.allow_multiple()
	}

	pub fn component_type(&self) -> &ComponentType {
		&self.component_type
	}
}

/// Assigns dense bits to component types and attaches or detaches their instances.
///
/// The position of a type in the table is its [ComponentId]. Bits are never reused.
#[derive(Default)]
pub struct ComponentRegistry {
	types: Vec<Rc<ComponentType>>,
	by_name: HashMap<String, ComponentId>,
	by_type: HashMap<TypeId, ComponentId, Hasher>,
}

impl ComponentRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a component type, returning its bit.
	///
	/// Registering the same Rust type again returns the bit it already has.
	pub fn register(&mut self, component_type: ComponentType) -> EcsResult<ComponentId> {
		if let Some(id) = self.by_type.get(&component_type.type_id()) {
			return Ok(*id);
		}

		if self.by_name.contains_key(component_type.key()) {
			return Err(EcsError::DuplicateComponentName {
				name: component_type.key().to_owned(),
			});
		}

		let id = ComponentId::new(self.types.len() as u32);
		log::debug!("registered component {} as {}", component_type.name(), id);

		self.by_name.insert(component_type.key().to_owned(), id);
		self.by_type.insert(component_type.type_id(), id);
		self.types.push(Rc::new(component_type));
		Ok(id)
	}

	pub fn register_type<T: Component>(&mut self) -> EcsResult<ComponentId> {
		self.register(ComponentType::of::<T>())
	}

	/// Number of registered types.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Iterate over every registered type in bit order.
	pub fn iter(&self) -> impl Iterator<Item = RegisteredComponent> + '_ {
		self.types.iter().enumerate().map(|(i, component_type)| RegisteredComponent {
			id: ComponentId::new(i as u32),
			component_type: component_type.clone(),
		})
	}

	/// Resolve a key to a registered type.
	pub fn get_type(&self, key: impl Into<ComponentKey>) -> EcsResult<RegisteredComponent> {
		let id = self.resolve(&key.into())?;
		Ok(RegisteredComponent {
			id,
			component_type: self.types[id.index()].clone(),
		})
	}

	pub(crate) fn resolve(&self, key: &ComponentKey) -> EcsResult<ComponentId> {
		let id = match key {
			ComponentKey::Id(id) => (id.index() < self.types.len()).then_some(*id),
			ComponentKey::Type { type_id, .. } => self.by_type.get(type_id).copied(),
			ComponentKey::Name(name) => self.by_name.get(&normalize(name)).copied(),
		};

		id.ok_or_else(|| EcsError::UnknownComponent(key.to_string()))
	}

	pub(crate) fn type_of(&self, id: ComponentId) -> Option<&Rc<ComponentType>> {
		self.types.get(id.index())
	}

	/// Attach a component to `entity` and set its bit.
	///
	/// Types that don't allow multiple instances are replaced in place when already present.
	/// Candidacy is left to the caller.
	pub fn attach(&self, entity: &mut Entity, attach: Attach, properties: Option<Value>) -> EcsResult<ComponentId> {
		let (id, mut instance) = match attach {
			Attach::Instance(instance) => {
				let id = self.by_type.get(&instance.type_id()).copied().ok_or_else(|| {
					EcsError::UnknownComponent(instance.type_name().to_owned())
				})?;
				(id, instance)
			},
			Attach::Type { type_id, name } => {
				let id = self.resolve(&ComponentKey::Type { type_id, name })?;
				(id, self.instantiate(id, properties)?)
			},
			Attach::Name(name) => {
				let id = self.resolve(&ComponentKey::Name(name))?;
				(id, self.instantiate(id, properties)?)
			},
		};

		let component_type = &self.types[id.index()];
		instance.entity = Some(entity.id().clone());
		component_type.behavior().attached(instance.value.as_mut(), entity.id());

		let cell = instance.into_cell();
		if component_type.allow_multiple() {
			entity.components.entry(id).or_default().push(cell);
		} else if let Some(replaced) = entity.components.insert(id, vec![cell]) {
			for cell in replaced {
				if let Ok(mut instance) = cell.try_borrow_mut() {
					instance.entity = None;
				}
			}
		}

		entity.cbits.set(id.index(), true);
		log::trace!("attached {} to entity {}", component_type.name(), entity.id());
		Ok(id)
	}

	/// Detach every instance of a type from `entity` and clear its bit.
	///
	/// The detached cells are returned with their back-references still set.
	pub fn remove(&self, entity: &mut Entity, key: impl Into<ComponentKey>) -> EcsResult<Vec<ComponentCell>> {
		let id = self.resolve(&key.into())?;
		if !entity.cbits.get(id.index()) {
			return Err(EcsError::ComponentNotAttached {
				entity: entity.id().clone(),
				component: self.types[id.index()].name().to_owned(),
			});
		}

		entity.cbits.set(id.index(), false);
		let cells = entity.components.shift_remove(&id).unwrap_or_default();
		log::trace!("removed {} from entity {}", self.types[id.index()].name(), entity.id());
		Ok(cells)
	}

	/// Test the bit of a type on `entity`. Unknown types and missing entities yield `false`.
	pub fn has(&self, entity: Option<&Entity>, key: impl Into<ComponentKey>) -> bool {
		match (entity, self.resolve(&key.into())) {
			(Some(entity), Ok(id)) => entity.cbits.get(id.index()),
			_ => false,
		}
	}

	/// Serialize a live component back into its property bag.
	pub(crate) fn properties(&self, instance: &ComponentInstance) -> EcsResult<Map<String, Value>> {
		let id = self.by_type.get(&instance.type_id()).copied().ok_or_else(|| {
			EcsError::UnknownComponent(instance.type_name().to_owned())
		})?;

		let value = self.types[id.index()]
			.behavior()
			.properties(instance.value.as_ref())
			.map_err(|source| EcsError::InvalidProperties {
				component: instance.type_name().to_owned(),
				source,
			})?;

		Ok(match value {
			Value::Object(map) => map,
			Value::Null => Map::new(),
			other => Map::from_iter([("value".to_owned(), other)]),
		})
	}

	fn instantiate(&self, id: ComponentId, properties: Option<Value>) -> EcsResult<ComponentInstance> {
		let component_type = &self.types[id.index()];
		let properties = properties.unwrap_or_else(|| Value::Object(Map::new()));
		let value = component_type.behavior().build(properties).map_err(|source| EcsError::InvalidProperties {
			component: component_type.name().to_owned(),
			source,
		})?;

		Ok(ComponentInstance::from_boxed(component_type.type_id(), component_type.name(), value))
	}
}
