use crate::tests::components::{Effect, Health, IsFrozen, Journal, Position, Velocity};
use crate::components::{Attach, ComponentKey, ComponentRegistry, ComponentType};
use crate::domain::Domain;
use crate::EcsError;
use serde_json::json;
use std::collections::HashSet;

#[test]
pub fn bits_are_dense_and_unique() {
	let mut registry = ComponentRegistry::new();
	let ids = [
		registry.register_type::<Position>().unwrap(),
		registry.register_type::<Velocity>().unwrap(),
		registry.register_type::<Health>().unwrap(),
		registry.register_type::<IsFrozen>().unwrap(),
	];

	let unique: HashSet<_> = ids.iter().collect();
	assert_eq!(ids.len(), unique.len(), "Component ids must be unique");
	assert_eq!(
		vec![0, 1, 2, 3],
		ids.iter().map(|id| id.value()).collect::<Vec<_>>(),
		"Component ids must be assigned densely"
	);

	let again = registry.register_type::<Velocity>().unwrap();
	assert_eq!(ids[1], again, "Registering a type twice must return its existing id");
	assert_eq!(4, registry.len());
}

#[test]
pub fn lookup_is_case_insensitive() {
	let mut registry = ComponentRegistry::new();
	let id = registry.register(ComponentType::of::<Position>()).unwrap();

	for key in ["Position", "position", "POSITION"] {
		assert_eq!(id, registry.get_type(key).unwrap().id(), "Lookup by {} failed", key);
	}

	assert_eq!(id, registry.get_type(ComponentKey::of::<Position>()).unwrap().id());
	assert_eq!("Position", registry.get_type(id).unwrap().name());
	assert!(matches!(registry.get_type("Velocity"), Err(EcsError::UnknownComponent(_))));
}

#[test]
pub fn registries_are_independent() {
	let mut first = ComponentRegistry::new();
	first.register_type::<Position>().unwrap();
	first.register_type::<Velocity>().unwrap();

	let mut second = ComponentRegistry::new();
	second.register_type::<Velocity>().unwrap();

	assert_eq!(1, first.get_type("velocity").unwrap().id().value());
	assert_eq!(0, second.get_type("velocity").unwrap().id().value());
}

#[test]
pub fn custom_names_and_multiplicity() {
	let mut registry = ComponentRegistry::new();
	registry.register_type::<Effect>().unwrap();

	let effect = registry.get_type("statuseffect").unwrap();
	assert_eq!("StatusEffect", effect.name());
	assert!(effect.allow_multiple(), "StatusEffect should allow multiple instances");
	assert!(registry.get_type("Effect").is_err(), "The Rust type name is not registered");
}

#[test]
pub fn attach_and_remove_toggle_bits() {
	let mut domain = Domain::new("test");
	domain.register::<Position>().unwrap();
	domain.register::<Velocity>().unwrap();
	let entity = domain.create_entity(None).unwrap();

	let id = domain.attach(&entity, Attach::of::<Position>(), Some(json!({"x": 1, "y": 2}))).unwrap();
	assert!(domain.has(&entity, "position"), "Entity should have a position");
	assert!(domain.get_by_id(&entity).unwrap().cbits().get(id.value() as usize));
	assert!(!domain.has(&entity, "velocity"), "Entity should not have a velocity");
	assert_eq!(Position { x: 1, y: 2 }, *domain.get::<Position>(&entity).unwrap());

	domain.remove(&entity, "Position").unwrap();
	assert!(!domain.has(&entity, "position"), "Position should have been removed");
	assert!(domain.get_by_id(&entity).unwrap().cbits().is_empty());

	let err = domain.remove(&entity, "Position").unwrap_err();
	assert!(matches!(err, EcsError::ComponentNotAttached { .. }), "Unexpected error {:?}", err);
}

#[test]
pub fn attach_by_name_instance_and_type() {
	let mut domain = Domain::new("test");
	domain.register::<Position>().unwrap();
	domain.register::<Velocity>().unwrap();
	domain.register::<Health>().unwrap();
	let entity = domain.create_entity(Some("hero")).unwrap();

	domain.attach("hero", "position", Some(json!({"x": 10, "y": 10}))).unwrap();
	domain.attach("hero", Attach::instance(Velocity { x: 1, y: 1 }), None).unwrap();
	domain.attach("hero", Attach::of::<Health>(), None).unwrap();

	assert_eq!(Position { x: 10, y: 10 }, *domain.get::<Position>(&entity).unwrap());
	assert_eq!(Velocity { x: 1, y: 1 }, *domain.get::<Velocity>("hero").unwrap());
	assert_eq!(Health::new(100.0), *domain.get::<Health>(&entity).unwrap(), "Health should use its defaults");

	let unknown = domain.attach(&entity, "Renderable", None).unwrap_err();
	assert!(matches!(unknown, EcsError::UnknownComponent(_)), "Unexpected error {:?}", unknown);

	let invalid = domain.attach(&entity, "Position", Some(json!({"x": "left"}))).unwrap_err();
	assert!(matches!(invalid, EcsError::InvalidProperties { .. }), "Unexpected error {:?}", invalid);
}

#[test]
pub fn reattaching_replaces_in_place() {
	let mut domain = Domain::new("test");
	domain.register::<Position>().unwrap();
	domain.register::<Velocity>().unwrap();
	let entity = domain.create_entity(None).unwrap();

	domain.add(&entity, Position { x: 1, y: 1 }).unwrap();
	domain.add(&entity, Velocity { x: 0, y: 0 }).unwrap();
	let old = domain.component(&entity, "position").unwrap();
	domain.add(&entity, Position { x: 5, y: 5 }).unwrap();

	let order: Vec<_> = domain.get_by_id(&entity).unwrap().component_ids().collect();
	assert_eq!(
		vec![domain.components().get_type("position").unwrap().id(), domain.components().get_type("velocity").unwrap().id()],
		order,
		"Replacing a component must keep its position"
	);
	assert_eq!(Position { x: 5, y: 5 }, *domain.get::<Position>(&entity).unwrap());
	assert!(old.borrow().entity().is_none(), "The replaced component must lose its back-reference");
}

#[test]
pub fn multiple_instances() {
	let mut domain = Domain::new("test");
	domain.register::<Effect>().unwrap();
	let entity = domain.create_entity(None).unwrap();

	domain.attach(&entity, "StatusEffect", Some(json!({"name": "poison", "turns": 3}))).unwrap();
	domain.attach(&entity, "StatusEffect", Some(json!({"name": "haste"}))).unwrap();

	let effects = domain.get_all::<Effect>(&entity).unwrap();
	let names: Vec<_> = effects.iter().map(|e| e.name.clone()).collect();
	assert_eq!(vec!["poison", "haste"], names, "Instances must be kept in attachment order");
	drop(effects);

	domain.remove(&entity, "StatusEffect").unwrap();
	assert!(domain.get_all::<Effect>(&entity).unwrap().is_empty(), "Removal drops every instance");
}

#[test]
pub fn back_references() {
	let mut domain = Domain::new("test");
	domain.register::<Journal>().unwrap();
	let entity = domain.create_entity(None).unwrap();

	domain.add(&entity, Journal::default()).unwrap();
	let cell = domain.component(&entity, "journal").unwrap();
	assert_eq!(Some(&entity), cell.borrow().entity(), "Back-reference should point to the owner");
	assert_eq!(Some(entity.clone()), domain.get::<Journal>(&entity).unwrap().owner, "on_attached should run");

	domain.remove(&entity, "journal").unwrap();
	assert!(cell.borrow().entity().is_none(), "Back-reference should be cleared on removal");
}

#[test]
pub fn has_is_lenient() {
	let mut domain = Domain::new("test");
	domain.register::<Position>().unwrap();
	let entity = domain.create_entity(None).unwrap();

	assert!(!domain.has(&entity, "Velocity"), "Unknown types are never attached");
	assert!(!domain.has("nobody", "Position"), "Unknown entities have no components");
	assert!(!domain.components().has(None, "Position"));
}

#[test]
pub fn duplicate_names_are_rejected() {
	mod other {
		use crate::components::Component;
		use serde::{Deserialize, Serialize};

		#[derive(Component, Serialize, Deserialize)]
		pub struct Position {
			pub lat: f64,
		}
	}

	let mut registry = ComponentRegistry::new();
	registry.register_type::<Position>().unwrap();
	let err = registry.register_type::<other::Position>().unwrap_err();
	assert!(matches!(err, EcsError::DuplicateComponentName { .. }), "Unexpected error {:?}", err);
}
