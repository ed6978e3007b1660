use crate::components::{ComponentCell, ComponentId};
use crate::data_structures::BitField;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::borrow::Borrow;
use std::fmt;

/// A unique, string-based handle to an [Entity].
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for EntityId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for EntityId {
	fn from(id: &str) -> Self {
		Self(id.to_owned())
	}
}

impl From<String> for EntityId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl From<EntityId> for serde_json::Value {
	fn from(id: EntityId) -> Self {
		serde_json::Value::String(id.0)
	}
}

impl From<&EntityId> for serde_json::Value {
	fn from(id: &EntityId) -> Self {
		serde_json::Value::String(id.0.clone())
	}
}

/// An entity and the components attached to it.
///
/// Components are kept in attachment order; the mask mirrors which types are present.
pub struct Entity {
	id: EntityId,
	pub(crate) cbits: BitField,
	pub(crate) components: IndexMap<ComponentId, Vec<ComponentCell>>,
	pub(crate) query_eligible: bool,
}

impl Entity {
	pub(crate) fn new(id: EntityId) -> Self {
		Self {
			id,
			cbits: BitField::new(),
			components: IndexMap::new(),
			query_eligible: true,
		}
	}

	pub fn id(&self) -> &EntityId {
		&self.id
	}

	/// The component mask of this entity.
	pub fn cbits(&self) -> &BitField {
		&self.cbits
	}

	/// Whether mutations are currently forwarded to queries.
	pub fn is_query_eligible(&self) -> bool {
		self.query_eligible
	}

	/// The ids of the attached component types, in attachment order.
	pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
		self.components.keys().copied()
	}

	/// Every attached component, in attachment order.
	pub fn components(&self) -> impl Iterator<Item = &ComponentCell> + '_ {
		self.components.values().flatten()
	}

	pub(crate) fn cells(&self, id: ComponentId) -> &[ComponentCell] {
		self.components.get(&id).map(Vec::as_slice).unwrap_or_default()
	}
}

impl fmt::Debug for Entity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Entity")
			.field("id", &self.id)
			.field("cbits", &self.cbits)
			.field("query_eligible", &self.query_eligible)
			.finish()
	}
}

/// Anything that can name an entity: its id, or a string that is an alias or an id.
#[derive(Clone, Copy, Debug)]
pub enum EntityRef<'a> {
	Id(&'a EntityId),
	/// Resolved as an alias first, then as an id.
	Name(&'a str),
}

impl fmt::Display for EntityRef<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EntityRef::Id(id) => write!(f, "{}", id),
			EntityRef::Name(name) => f.write_str(name),
		}
	}
}

impl<'a> From<&'a EntityId> for EntityRef<'a> {
	fn from(id: &'a EntityId) -> Self {
		Self::Id(id)
	}
}

impl<'a> From<&'a Entity> for EntityRef<'a> {
	fn from(entity: &'a Entity) -> Self {
		Self::Id(entity.id())
	}
}

impl<'a> From<&'a str> for EntityRef<'a> {
	fn from(name: &'a str) -> Self {
		Self::Name(name)
	}
}

impl<'a> From<&'a String> for EntityRef<'a> {
	fn from(name: &'a String) -> Self {
		Self::Name(name)
	}
}
