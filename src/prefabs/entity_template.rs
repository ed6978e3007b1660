use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One component entry of an [EntityTemplate].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTemplate {
	/// The registered component name, matched case-insensitively.
	#[serde(rename = "type")]
	pub component_type: String,
	#[serde(default)]
	pub properties: Map<String, Value>,
	/// When false, the entry only fills in properties its ancestors don't set.
	#[serde(default = "overwrite_default")]
	pub overwrite: bool,
}

fn overwrite_default() -> bool {
	true
}

impl ComponentTemplate {
	pub fn new(component_type: impl Into<String>, properties: Map<String, Value>) -> Self {
		Self {
			component_type: component_type.into(),
			properties,
			overwrite: true,
		}
	}

	pub fn with_overwrite(mut self, overwrite: bool) -> Self {
		self.overwrite = overwrite;
		self
	}
}

/// A named recipe for an entity, optionally inheriting from other templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
	pub name: String,
	/// Parent template names. The last one declared takes precedence over earlier ones.
	#[serde(default)]
	pub inherit: Vec<String>,
	#[serde(default)]
	pub components: Vec<ComponentTemplate>,
}

impl EntityTemplate {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			inherit: Vec::new(),
			components: Vec::new(),
		}
	}

	pub fn inherit(mut self, parent: impl Into<String>) -> Self {
		self.inherit.push(parent.into());
		self
	}

	pub fn component(mut self, component: ComponentTemplate) -> Self {
		self.components.push(component);
		self
	}
}
