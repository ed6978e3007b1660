use crate::components::{ComponentKey, ComponentSet};
use crate::entities::{Entity, EntityId};
use crate::data_structures::BitField;
use crate::error::EcsResult;
use std::collections::HashMap;
use crate::domain::Domain;

/// A handle to a [Query] registered in a [Domain].
#[derive(Debug, Hash, Copy, Clone, Eq, PartialEq)]
pub struct QueryHandle {
	index: usize,
}

impl QueryHandle {
	pub(crate) fn new(index: usize) -> Self {
		Self { index }
	}

	pub(crate) fn index(&self) -> usize {
		self.index
	}

	pub fn build() -> QueryBuilder {
		QueryBuilder::default()
	}
}

/// A standing structural filter with an incrementally maintained result.
///
/// Results are kept in first-match order; an entity that stops matching and later
/// matches again moves to the end.
#[derive(Debug)]
pub struct Query {
	all_of: BitField,
	any_of: BitField,
	none_of: BitField,
	cache: Vec<EntityId>,
	index: HashMap<EntityId, usize>,
}

impl Query {
	pub(crate) fn new(all_of: BitField, any_of: BitField, none_of: BitField) -> Self {
		Self {
			all_of,
			any_of,
			none_of,
			cache: Vec::new(),
			index: HashMap::new(),
		}
	}

	/// Whether a component mask satisfies this query.
	pub fn matches(&self, cbits: &BitField) -> bool {
		let match_all = cbits.contains_all(&self.all_of);
		let match_any = self.any_of.is_empty() || cbits.intersects(&self.any_of);
		let match_none = !cbits.intersects(&self.none_of);
		match_all && match_any && match_none
	}

	/// Re-evaluate a single entity.
	pub(crate) fn candidate(&mut self, entity: &Entity) {
		let tracked = self.index.contains_key(entity.id());
		match (self.matches(entity.cbits()), tracked) {
			(true, false) => {
				self.index.insert(entity.id().clone(), self.cache.len());
				self.cache.push(entity.id().clone());
			},
			(false, true) => self.forget(entity.id()),
			_ => {},
		}
	}

	/// Rebuild the whole result from `entities`, in their iteration order.
	pub(crate) fn refresh<'a>(&mut self, entities: impl Iterator<Item = &'a Entity>) {
		self.cache.clear();
		self.index.clear();
		for entity in entities {
			self.candidate(entity);
		}
	}

	/// Drop an entity from the result, if present.
	pub(crate) fn forget(&mut self, id: &EntityId) {
		if let Some(position) = self.index.remove(id) {
			self.cache.remove(position);
			self.index = self.cache.iter().cloned().enumerate().map(|(i, id)| (id, i)).collect();
		}
	}

	/// The ids of every matching entity.
	pub fn result(&self) -> &[EntityId] {
		&self.cache
	}

	pub fn contains(&self, id: &EntityId) -> bool {
		self.index.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.cache.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.is_empty()
	}

	pub fn all_of(&self) -> &BitField {
		&self.all_of
	}

	pub fn any_of(&self) -> &BitField {
		&self.any_of
	}

	pub fn none_of(&self) -> &BitField {
		&self.none_of
	}
}

/// A utility structure to build [Queries](Query).
#[derive(Default, Clone, Debug)]
pub struct QueryBuilder {
	all_of: Vec<ComponentKey>,
	any_of: Vec<ComponentKey>,
	none_of: Vec<ComponentKey>,
}

impl QueryBuilder {
	/// Require every type of the set.
	pub fn all_of<T: ComponentSet>(mut self) -> Self {
		self.all_of.extend(T::keys());
		self
	}

	/// Require at least one type of the set.
	pub fn any_of<T: ComponentSet>(mut self) -> Self {
		self.any_of.extend(T::keys());
		self
	}

	/// Reject entities carrying any type of the set.
	pub fn none_of<T: ComponentSet>(mut self) -> Self {
		self.none_of.extend(T::keys());
		self
	}

	pub fn all_of_names<K: Into<ComponentKey>>(mut self, names: impl IntoIterator<Item = K>) -> Self {
		self.all_of.extend(names.into_iter().map(Into::into));
		self
	}

	pub fn any_of_names<K: Into<ComponentKey>>(mut self, names: impl IntoIterator<Item = K>) -> Self {
		self.any_of.extend(names.into_iter().map(Into::into));
		self
	}

	pub fn none_of_names<K: Into<ComponentKey>>(mut self, names: impl IntoIterator<Item = K>) -> Self {
		self.none_of.extend(names.into_iter().map(Into::into));
		self
	}

	/// Register the query in `domain`, evaluating it against every existing entity.
	pub fn build(self, domain: &mut Domain) -> EcsResult<QueryHandle> {
		domain.create_query(&self.all_of, &self.any_of, &self.none_of)
	}
}
