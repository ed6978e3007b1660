use crate::components::{Component, ComponentId};
use crate::entities::EntityId;
use std::cell::RefCell;
use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

/// A live component value together with a back-reference to the entity it is attached to.
pub struct ComponentInstance {
	type_id: TypeId,
	type_name: &'static str,
	pub(crate) entity: Option<EntityId>,
	pub(crate) value: Box<dyn Any>,
}

/// Shared handle to an attached [ComponentInstance].
pub type ComponentCell = Rc<RefCell<ComponentInstance>>;

impl ComponentInstance {
	/// Wrap `value` without attaching it anywhere.
	pub fn new<T: Component>(value: T) -> Self {
		Self {
			type_id: TypeId::of::<T>(),
			type_name: T::NAME,
			entity: None,
			value: Box::new(value),
		}
	}

	pub(crate) fn from_boxed(type_id: TypeId, type_name: &'static str, value: Box<dyn Any>) -> Self {
		Self { type_id, type_name, entity: None, value }
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// The owning entity, or `None` once the component has been detached.
	pub fn entity(&self) -> Option<&EntityId> {
		self.entity.as_ref()
	}

	pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
		self.value.downcast_ref()
	}

	pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
		self.value.downcast_mut()
	}

	pub(crate) fn into_cell(self) -> ComponentCell {
		Rc::new(RefCell::new(self))
	}
}

impl fmt::Debug for ComponentInstance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentInstance")
			.field("type_name", &self.type_name)
			.field("entity", &self.entity)
			.finish()
	}
}

/// What to attach to an entity.
pub enum Attach {
	/// A registered Rust type, instantiated from the given properties.
	Type { type_id: TypeId, name: &'static str },
	/// An already built component.
	Instance(ComponentInstance),
	/// A registered name, resolved case-insensitively and instantiated from the given properties.
	Name(String),
}

impl Attach {
	pub fn of<T: Component>() -> Self {
		Self::Type { type_id: TypeId::of::<T>(), name: T::NAME }
	}

	pub fn instance<T: Component>(value: T) -> Self {
		Self::Instance(ComponentInstance::new(value))
	}

	pub fn named(name: impl Into<String>) -> Self {
		Self::Name(name.into())
	}
}

impl From<&str> for Attach {
	fn from(name: &str) -> Self {
		Self::Name(name.to_owned())
	}
}

impl From<ComponentInstance> for Attach {
	fn from(instance: ComponentInstance) -> Self {
		Self::Instance(instance)
	}
}

/// A reference to a registered component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentKey {
	Id(ComponentId),
	Type { type_id: TypeId, name: &'static str },
	Name(String),
}

impl ComponentKey {
	pub fn of<T: Component>() -> Self {
		Self::Type { type_id: TypeId::of::<T>(), name: T::NAME }
	}
}

impl fmt::Display for ComponentKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ComponentKey::Id(id) => write!(f, "{}", id),
			ComponentKey::Type { name, .. } => f.write_str(name),
			ComponentKey::Name(name) => f.write_str(name),
		}
	}
}

impl From<&str> for ComponentKey {
	fn from(name: &str) -> Self {
		Self::Name(name.to_owned())
	}
}

impl From<String> for ComponentKey {
	fn from(name: String) -> Self {
		Self::Name(name)
	}
}

impl From<&String> for ComponentKey {
	fn from(name: &String) -> Self {
		Self::Name(name.clone())
	}
}

impl From<ComponentId> for ComponentKey {
	fn from(id: ComponentId) -> Self {
		Self::Id(id)
	}
}
