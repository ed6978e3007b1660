use crate::tests::components::{Health, Noun, Position, Velocity};
use crate::prefabs::{ComponentTemplate, EntityTemplate};
use crate::config::EcsConfig;
use crate::engine::Engine;
use crate::EcsError;
use serde_json::json;

fn properties(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
	match value {
		serde_json::Value::Object(map) => map,
		_ => unreachable!(),
	}
}

#[test]
pub fn domains_are_switched_by_name() {
	let mut engine = Engine::new();
	assert!(matches!(engine.domain(), Err(EcsError::NoActiveDomain)));
	assert_eq!(None, engine.current());

	engine.register::<Position>().unwrap();
	engine.create_domain("overworld").unwrap().create_entity(Some("hero")).unwrap();
	engine.create_domain("dungeon").unwrap();
	assert_eq!(Some("dungeon"), engine.current(), "A created domain becomes current");
	assert!(engine.domain().unwrap().entities().is_empty());

	engine.change_domain("overworld").unwrap();
	assert_eq!("overworld", engine.domain().unwrap().name());
	assert!(engine.domain().unwrap().entity("hero").is_ok(), "Domains keep their own entities");

	let err = engine.change_domain("nowhere").unwrap_err();
	assert!(matches!(err, EcsError::UnknownDomain(_)), "Unexpected error {:?}", err);
	assert_eq!(Some("overworld"), engine.current(), "A failed switch keeps the current domain");
	assert_eq!(vec!["overworld", "dungeon"], engine.domain_names().collect::<Vec<_>>());
}

#[test]
pub fn registration_reaches_every_domain() {
	let mut engine = Engine::new();
	engine.register::<Position>().unwrap();
	engine.create_domain("first").unwrap();
	engine.register::<Velocity>().unwrap();
	engine.register::<Velocity>().unwrap();
	engine.create_domain("second").unwrap();

	for name in ["first", "second"] {
		let domain = engine.get_domain(name).unwrap();
		assert_eq!(2, domain.components().len(), "Domain {} is missing a type", name);
		assert_eq!(1, domain.components().get_type("velocity").unwrap().id().value());
	}
}

#[test]
pub fn prefabs_build_into_the_current_domain() {
	let mut engine = Engine::new();
	engine.register::<Health>().unwrap();
	engine.register::<Noun>().unwrap();
	engine.prefabs_mut().register(
		EntityTemplate::new("Villager")
			.component(ComponentTemplate::new("Health", properties(json!({"maximum": 20}))))
			.component(ComponentTemplate::new("Noun", properties(json!({"text": "villager"})))),
	);

	assert!(matches!(engine.build_prefab("Villager", None, None), Err(EcsError::NoActiveDomain)));

	engine.create_domain("town").unwrap();
	let overrides = properties(json!({"noun": {"text": "mayor"}}));
	let id = engine.build_prefab("villager", Some(&overrides), Some("mayor")).unwrap();

	let domain = engine.domain().unwrap();
	assert_eq!(20.0, domain.get::<Health>(&id).unwrap().current);
	assert_eq!("mayor", domain.get::<Noun>("mayor").unwrap().text);
}

#[test]
pub fn config_from_json() {
	let config = EcsConfig::from_json("{}").unwrap();
	assert_eq!(EcsConfig::default(), config, "Missing fields take their defaults");

	let config = EcsConfig::from_json(r#"{ "entity_id_prefix": "e-" }"#).unwrap();
	assert_eq!("e-", config.entity_id_prefix);
	assert_eq!(32, config.max_inheritance_depth);

	let err = EcsConfig::from_json(r#"{ "max_inheritance_depth": "deep" }"#).unwrap_err();
	assert!(matches!(err, EcsError::Config(_)), "Unexpected error {:?}", err);

	let mut engine = Engine::with_config(EcsConfig { max_inheritance_depth: 0, ..config });
	engine.prefabs_mut().register(EntityTemplate::new("Base"));
	engine.prefabs_mut().register(EntityTemplate::new("Child").inherit("Base"));
	engine.create_domain("limited").unwrap();
	let err = engine.build_prefab("Child", None, None).unwrap_err();
	assert!(matches!(err, EcsError::TemplateTooDeep { .. }), "The engine config must reach its prefabs: {:?}", err);
}

#[test]
pub fn recreating_a_domain_replaces_it() {
	let mut engine = Engine::new();
	engine.register::<Position>().unwrap();
	engine.create_domain("arena").unwrap().create_entity(Some("fighter")).unwrap();
	engine.create_domain("lobby").unwrap();

	let arena = engine.create_domain("arena").unwrap();
	assert!(arena.entities().is_empty(), "A recreated domain starts empty");
	assert_eq!(1, arena.components().len(), "A recreated domain keeps the registered types");
	assert_eq!(Some("arena"), engine.current());
	assert_eq!(vec!["arena", "lobby"], engine.domain_names().collect::<Vec<_>>(), "The domain keeps its position");
}
