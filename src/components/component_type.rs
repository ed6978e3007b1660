use serde::de::DeserializeOwned;
use crate::entities::EntityId;
use std::collections::HashMap;
use crate::domain::Domain;
use crate::events::Event;
use serde::Serialize;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

/// What an event handler returns. Any error type converts with `?`, [EcsError](crate::EcsError) included.
pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

/// A component's reaction to a named event.
pub type EventHandler<T> = fn(&mut T, &mut Event, &mut Domain) -> HandlerResult;

/// Runs right after a component has been bound to its entity.
pub type AttachedHandler<T> = fn(&mut T, &EntityId);

/// Runs while the owning entity is being destroyed.
pub type DestroyedHandler<T> = fn(&mut T);

/// A piece of data that can be attached to an [Entity](crate::entities::Entity).
///
/// The serde representation of a component is its property bag: prefabs, attach-by-name
/// and snapshots all go through it. Usually implemented through `#[derive(Component)]`.
pub trait Component: 'static + Serialize + DeserializeOwned {
	/// The registry name. Lookups by name are case-insensitive.
	const NAME: &'static str;

	/// Whether an entity may carry several instances of this component.
	const ALLOW_MULTIPLE: bool = false;

	/// The explicit handler table of this component.
	fn handlers() -> Handlers<Self> {
		Handlers::new()
	}
}

/// The handler table of a [Component] type.
///
/// Events are routed by exact name; an event with no entry is silently ignored.
pub struct Handlers<T> {
	events: HashMap<String, EventHandler<T>>,
	any_event: Option<EventHandler<T>>,
	attached: Option<AttachedHandler<T>>,
	destroyed: Option<DestroyedHandler<T>>,
}

impl<T> Default for Handlers<T> {
	fn default() -> Self {
		Self {
			events: HashMap::default(),
			any_event: None,
			attached: None,
			destroyed: None,
		}
	}
}

impl<T> Handlers<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Route the event `name` to `handler`.
	pub fn on(mut self, name: &str, handler: EventHandler<T>) -> Self {
		self.events.insert(name.to_owned(), handler);
		self
	}

	/// Run `handler` for every event, before the named handler.
	pub fn any_event(mut self, handler: EventHandler<T>) -> Self {
		self.any_event = Some(handler);
		self
	}

	pub fn attached(mut self, handler: AttachedHandler<T>) -> Self {
		self.attached = Some(handler);
		self
	}

	pub fn destroyed(mut self, handler: DestroyedHandler<T>) -> Self {
		self.destroyed = Some(handler);
		self
	}

	pub fn handles(&self, name: &str) -> bool {
		self.events.contains_key(name)
	}
}

/// Type-erased operations on the values of one component type.
pub(crate) trait ComponentBehavior {
	fn build(&self, properties: Value) -> Result<Box<dyn Any>, serde_json::Error>;
	fn properties(&self, value: &dyn Any) -> Result<Value, serde_json::Error>;
	fn handle_event(&self, value: &mut dyn Any, event: &mut Event, domain: &mut Domain) -> HandlerResult;
	fn attached(&self, value: &mut dyn Any, entity: &EntityId);
	fn destroyed(&self, value: &mut dyn Any);
	fn handles(&self, event: &str) -> bool;
}

struct TypedBehavior<T: Component> {
	handlers: Handlers<T>,
}

fn mismatch<T: Component>() -> String {
	format!("value is not a {} component", T::NAME)
}

impl<T: Component> ComponentBehavior for TypedBehavior<T> {
	fn build(&self, properties: Value) -> Result<Box<dyn Any>, serde_json::Error> {
		let value: T = serde_json::from_value(properties)?;
		Ok(Box::new(value))
	}

	fn properties(&self, value: &dyn Any) -> Result<Value, serde_json::Error> {
		match value.downcast_ref::<T>() {
			Some(value) => serde_json::to_value(value),
			None => Err(serde::ser::Error::custom(mismatch::<T>())),
		}
	}

	fn handle_event(&self, value: &mut dyn Any, event: &mut Event, domain: &mut Domain) -> HandlerResult {
		let component = value.downcast_mut::<T>().ok_or_else(mismatch::<T>)?;

		if let Some(handler) = self.handlers.any_event {
			handler(component, event, domain)?;
		}

		if let Some(handler) = self.handlers.events.get(event.name()) {
			handler(component, event, domain)?;
		}

		Ok(())
	}

	fn attached(&self, value: &mut dyn Any, entity: &EntityId) {
		if let (Some(handler), Some(component)) = (self.handlers.attached, value.downcast_mut::<T>()) {
			handler(component, entity);
		}
	}

	fn destroyed(&self, value: &mut dyn Any) {
		if let (Some(handler), Some(component)) = (self.handlers.destroyed, value.downcast_mut::<T>()) {
			handler(component);
		}
	}

	fn handles(&self, event: &str) -> bool {
		self.handlers.any_event.is_some() || self.handlers.handles(event)
	}
}

/// A runtime representation of a type implementing the [`Component`] trait.
///
/// The descriptor carries no bit; each [ComponentRegistry](crate::components::ComponentRegistry)
/// assigns its own.
#[derive(Clone)]
pub struct ComponentType {
	name: &'static str,
	key: String,
	allow_multiple: bool,
	type_id: TypeId,
	behavior: Rc<dyn ComponentBehavior>,
}

impl ComponentType {
	/// Returns the [`ComponentType`] of T.
	pub fn of<T: Component>() -> Self {
		Self {
			name: T::NAME,
			key: normalize(T::NAME),
			allow_multiple: T::ALLOW_MULTIPLE,
			type_id: TypeId::of::<T>(),
			behavior: Rc::new(TypedBehavior { handlers: T::handlers() }),
		}
	}

	/// The display name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// The normalized, upper-cased name used for lookups.
	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn allow_multiple(&self) -> bool {
		self.allow_multiple
	}

	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Whether dispatching `event` would reach any handler of this type.
	pub fn handles(&self, event: &str) -> bool {
		self.behavior.handles(event)
	}

	pub(crate) fn behavior(&self) -> &dyn ComponentBehavior {
		self.behavior.as_ref()
	}
}

impl Eq for ComponentType {}

impl PartialEq<Self> for ComponentType {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl fmt::Debug for ComponentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentType")
			.field("name", &self.name)
			.field("allow_multiple", &self.allow_multiple)
			.finish()
	}
}

/// Normalize a component name for lookups.
pub(crate) fn normalize(name: &str) -> String {
	name.to_uppercase()
}
