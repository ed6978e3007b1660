use crate::tests::components::{Health, IsFrozen, Position, Velocity};
use crate::entities::{EntityId, QueryBuilder, QueryHandle};
use crate::components::ComponentKey;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use crate::domain::Domain;
use rand::rngs::StdRng;

fn setup() -> Domain {
	let mut domain = Domain::new("queries");
	domain.register::<Position>().unwrap();
	domain.register::<Velocity>().unwrap();
	domain.register::<Health>().unwrap();
	domain.register::<IsFrozen>().unwrap();
	domain
}

const NAMES: [&str; 4] = ["Position", "Velocity", "Health", "IsFrozen"];

fn assert_consistent(domain: &Domain, handle: QueryHandle) {
	let query = domain.query(handle);
	let expected: HashSet<&EntityId> = domain
		.entities()
		.iter()
		.filter(|entity| query.matches(entity.cbits()))
		.map(|entity| entity.id())
		.collect();

	let actual: HashSet<&EntityId> = query.result().iter().collect();
	assert_eq!(expected, actual, "Query cache diverged from a linear scan");
	assert_eq!(query.result().len(), actual.len(), "Query cache contains duplicates");
}

#[test]
pub fn movement_scenario() {
	let mut domain = setup();
	let entity = domain.create_entity(None).unwrap();
	domain.add(&entity, Position { x: 10, y: 10 }).unwrap();
	domain.add(&entity, Velocity { x: 1, y: 1 }).unwrap();

	let query = QueryBuilder::default().all_of::<(Position, Velocity)>().build(&mut domain).unwrap();
	assert_eq!([entity.clone()].as_slice(), domain.query(query).result(), "Entity should match the query");

	for _ in 0..20 {
		for id in domain.query(query).result().to_vec() {
			let velocity = *domain.get::<Velocity>(&id).unwrap();
			let mut position = domain.get_mut::<Position>(&id).unwrap();
			position.x += velocity.x;
			position.y += velocity.y;
		}
	}

	assert_eq!(Position { x: 30, y: 30 }, *domain.get::<Position>(&entity).unwrap());
}

#[test]
pub fn all_any_none() {
	let mut domain = setup();
	let moving = domain.create_entity(Some("moving")).unwrap();
	let frozen = domain.create_entity(Some("frozen")).unwrap();
	let wounded = domain.create_entity(Some("wounded")).unwrap();

	domain.add(&moving, Position::default()).unwrap();
	domain.add(&moving, Velocity::default()).unwrap();
	domain.add(&frozen, Position::default()).unwrap();
	domain.add(&frozen, Velocity::default()).unwrap();
	domain.add(&frozen, IsFrozen {}).unwrap();
	domain.add(&wounded, Health::new(10.0)).unwrap();

	let movers = QueryHandle::build()
		.all_of::<(Position, Velocity)>()
		.none_of::<(IsFrozen,)>()
		.build(&mut domain)
		.unwrap();
	let any = QueryHandle::build().any_of_names(["velocity", "health"]).build(&mut domain).unwrap();

	assert_eq!([moving.clone()].as_slice(), domain.query(movers).result());
	assert_eq!([moving.clone(), frozen.clone(), wounded.clone()].as_slice(), domain.query(any).result());

	domain.remove(&frozen, "IsFrozen").unwrap();
	assert_eq!(
		[moving.clone(), frozen.clone()].as_slice(),
		domain.query(movers).result(),
		"Unfrozen entity should be appended to the result"
	);

	domain.remove(&moving, "velocity").unwrap();
	domain.add(&moving, Velocity::default()).unwrap();
	assert_eq!(
		[frozen.clone(), moving.clone()].as_slice(),
		domain.query(movers).result(),
		"Re-matching moves an entity to the end"
	);

	domain.destroy_entity("wounded").unwrap();
	assert_eq!([frozen, moving].as_slice(), domain.query(any).result());
}

#[test]
pub fn creation_refreshes_existing_entities() {
	let mut domain = setup();
	for _ in 0..5 {
		let entity = domain.create_entity(None).unwrap();
		domain.add(&entity, Position::default()).unwrap();
	}

	let query = domain.create_query(&[ComponentKey::of::<Position>()], &[], &[]).unwrap();
	assert_eq!(5, domain.query(query).len(), "A new query must see existing entities");

	let empty = domain.create_query(&[], &[], &[ComponentKey::of::<Position>()]).unwrap();
	let bare = domain.create_entity(None).unwrap();
	assert_eq!([bare].as_slice(), domain.query(empty).result(), "Entities without components match none_of queries");

	let unknown = domain.create_query(&["Renderable".into()], &[], &[]);
	assert!(unknown.is_err(), "Queries over unregistered types must fail");
}

#[test]
pub fn randomized_consistency() {
	let mut domain = setup();
	let mut rng = StdRng::seed_from_u64(0x5eed);

	let queries = [
		QueryHandle::build().all_of::<(Position, Velocity)>().build(&mut domain).unwrap(),
		QueryHandle::build().any_of::<(Health, IsFrozen)>().build(&mut domain).unwrap(),
		QueryHandle::build().all_of::<(Position,)>().none_of::<(IsFrozen, Health)>().build(&mut domain).unwrap(),
		QueryHandle::build().none_of::<(Velocity,)>().build(&mut domain).unwrap(),
	];

	let mut live: Vec<EntityId> = Vec::new();
	for _ in 0..2000 {
		match rng.gen_range(0..10) {
			0..=1 => live.push(domain.create_entity(None).unwrap()),
			2 if !live.is_empty() => {
				let id = live.swap_remove(rng.gen_range(0..live.len()));
				domain.destroy_entity(&id).unwrap();
			},
			_ if !live.is_empty() => {
				let id = &live[rng.gen_range(0..live.len())];
				let name = NAMES[rng.gen_range(0..NAMES.len())];
				match domain.has(id, name) {
					true => domain.remove(id, name).unwrap(),
					false => {
						domain.attach(id, name, None).unwrap_or_else(|_| {
							// Position and Velocity have required fields.
							domain.attach(id, name, Some(serde_json::json!({"x": 0, "y": 0}))).unwrap()
						});
					},
				}
			},
			_ => {},
		}

		for query in queries {
			assert_consistent(&domain, query);
		}
	}

	let fresh = QueryHandle::build().all_of::<(Position, Velocity)>().build(&mut domain).unwrap();
	let mut expected = domain.query(queries[0]).result().to_vec();
	let mut actual = domain.query(fresh).result().to_vec();
	expected.sort();
	actual.sort();
	assert_eq!(expected, actual, "Incremental and refreshed results differ");
}

#[test]
pub fn foreign_handles_are_not_found() {
	let mut domain = setup();
	let handle = QueryHandle::build().all_of::<(Position,)>().build(&mut domain).unwrap();
	assert!(domain.get_query(handle).is_some());

	let empty = Domain::new("empty");
	assert!(empty.get_query(handle).is_none(), "A handle from another domain must not resolve");
	assert!(domain.get_query(QueryHandle::new(7)).is_none());
}
