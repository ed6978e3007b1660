//! [Events](Event) are dispatched through the components of a single entity, in attachment order.
//!
//! A handler may [handle](Event::handle) or [prevent](Event::prevent) an event;
//! both stop dispatch once the current component is done with it.

use crate::error::{EcsError, EcsResult};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The payload of an [Event]: named JSON values in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventData {
	record: Map<String, Value>,
}

impl EventData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style [set](EventData::set).
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(key, value);
		self
	}

	/// Set a field. A new key goes last; an existing key keeps its position.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.record.insert(key.into(), value.into());
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.record.get(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.record.contains_key(key)
	}

	/// Field names in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
		self.record.keys().map(String::as_str)
	}

	pub fn record(&self) -> &Map<String, Value> {
		&self.record
	}

	pub fn len(&self) -> usize {
		self.record.len()
	}

	pub fn is_empty(&self) -> bool {
		self.record.is_empty()
	}
}

impl From<Map<String, Value>> for EventData {
	fn from(record: Map<String, Value>) -> Self {
		Self { record }
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for EventData {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self {
			record: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

/// A named message fired at an entity.
#[derive(Clone, Debug)]
pub struct Event {
	name: String,
	data: EventData,
	handled: bool,
	prevented: bool,
}

impl Event {
	pub fn new(name: impl Into<String>, data: EventData) -> Self {
		Self {
			name: name.into(),
			data,
			handled: false,
			prevented: false,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn data(&self) -> &EventData {
		&self.data
	}

	pub fn data_mut(&mut self) -> &mut EventData {
		&mut self.data
	}

	pub fn handled(&self) -> bool {
		self.handled
	}

	pub fn prevented(&self) -> bool {
		self.prevented
	}

	/// Mark the event as handled. This also prevents further dispatch.
	pub fn handle(&mut self) {
		self.handled = true;
		self.prevented = true;
	}

	/// Stop dispatch without marking the event as handled.
	pub fn prevent(&mut self) {
		self.prevented = true;
	}

	/// Read a payload field as `T`.
	pub fn require<T: DeserializeOwned>(&self, field: &str) -> EcsResult<T> {
		let value = self.data.get(field).ok_or_else(|| EcsError::MissingEventField {
			event: self.name.clone(),
			field: field.to_owned(),
		})?;

		T::deserialize(value).map_err(|source| EcsError::InvalidEventField {
			field: field.to_owned(),
			source,
		})
	}
}

/// Events compare by name only.
impl PartialEq for Event {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}
