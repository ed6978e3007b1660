//! Errors raised by registries, domains, queries, prefabs and event dispatch.

use crate::entities::EntityId;
use thiserror::Error;

/// Errors that can occur while manipulating a [`Domain`](crate::domain::Domain) or its collaborators.
#[derive(Error, Debug)]
pub enum EcsError {
	/// Lookup of a component type that was never registered.
	#[error("unknown component type: {0}")]
	UnknownComponent(String),

	/// A different type tried to register under a name that is already taken.
	#[error("component name {name} is already registered by another type")]
	DuplicateComponentName {
		/// The normalized name.
		name: String,
	},

	/// Access to or removal of a component the entity does not carry.
	#[error("entity {entity} has no {component} component attached")]
	ComponentNotAttached {
		/// The entity that was searched.
		entity: EntityId,
		/// The missing component type.
		component: String,
	},

	/// The component is already borrowed, usually by a handler that is still running.
	#[error("component {component} on entity {entity} is already borrowed")]
	ComponentBusy {
		/// The owning entity.
		entity: EntityId,
		/// The borrowed component type.
		component: String,
	},

	/// The component's properties could not be converted into or out of its Rust type.
	#[error("invalid properties for component {component}: {source}")]
	InvalidProperties {
		/// The component type.
		component: String,
		/// The underlying serde error.
		#[source]
		source: serde_json::Error,
	},

	/// An alias was already bound to another entity.
	#[error("alias {0} is already bound to an entity")]
	DuplicateAlias(String),

	/// An explicit entity id is already in use.
	#[error("entity id {0} is already in use")]
	DuplicateEntity(EntityId),

	/// No entity is bound to the given id or alias.
	#[error("unknown entity: {0}")]
	UnknownEntity(String),

	/// A prefab or one of its parents was never registered.
	#[error("unknown entity template: {0}")]
	UnknownTemplate(String),

	/// The `inherit` graph of a template loops back onto itself.
	#[error("cyclic template inheritance: {}", chain.join(" -> "))]
	CyclicTemplate {
		/// The templates visited, ending with the repeated one.
		chain: Vec<String>,
	},

	/// The `inherit` chain of a template is deeper than the configured limit.
	#[error("template {name} exceeds the maximum inheritance depth of {limit}")]
	TemplateTooDeep {
		/// The template being resolved.
		name: String,
		/// The configured limit.
		limit: usize,
	},

	/// A template definition could not be parsed.
	#[error("invalid template definition: {0}")]
	Template(#[source] serde_json::Error),

	/// An event handler failed. The handler's own error is kept as the source.
	#[error("handler for event {event} on component {component} of entity {entity} failed: {source}")]
	Handler {
		/// The entity the event was fired on.
		entity: EntityId,
		/// The component whose handler failed.
		component: String,
		/// The event name.
		event: String,
		/// The handler's error.
		#[source]
		source: Box<dyn std::error::Error>,
	},

	/// A handler asked for an event field that was never set.
	#[error("event {event} has no field {field}")]
	MissingEventField {
		/// The event name.
		event: String,
		/// The missing field.
		field: String,
	},

	/// An event field holds a value of the wrong shape.
	#[error("event field {field} has an unexpected value: {source}")]
	InvalidEventField {
		/// The offending field.
		field: String,
		/// The underlying serde error.
		#[source]
		source: serde_json::Error,
	},

	/// A configuration document could not be parsed.
	#[error("invalid configuration: {0}")]
	Config(#[source] serde_json::Error),

	/// A snapshot could not be converted to or from JSON.
	#[error("invalid snapshot: {0}")]
	Snapshot(#[source] serde_json::Error),

	/// No domain with the given name exists in the engine.
	#[error("unknown domain: {0}")]
	UnknownDomain(String),

	/// The engine has not created any domain yet.
	#[error("no domain has been created")]
	NoActiveDomain,

	/// Systems were added, set up or run out of order.
	#[error("{0}")]
	SystemState(&'static str),
}

/// Result type for all fallible ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
