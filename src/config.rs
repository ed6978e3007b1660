//! Runtime configuration shared by [Domains](crate::domain::Domain),
//! the [PrefabBuilder](crate::prefabs::PrefabBuilder) and the [Engine](crate::engine::Engine).

use crate::error::{EcsError, EcsResult};
use serde::{Deserialize, Serialize};

/// Tunables for entity creation and template resolution.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcsConfig {
	/// Maximum length of an `inherit` chain before resolution is aborted.
	pub max_inheritance_depth: usize,
	/// Prepended to every generated entity id.
	pub entity_id_prefix: String,
}

impl Default for EcsConfig {
	fn default() -> Self {
		Self {
			max_inheritance_depth: 32,
			entity_id_prefix: String::new(),
		}
	}
}

impl EcsConfig {
	/// Parse a configuration from JSON, filling missing fields with their defaults.
	pub fn from_json(json: &str) -> EcsResult<Self> {
		serde_json::from_str(json).map_err(EcsError::Config)
	}
}
