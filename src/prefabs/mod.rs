//! Prefabs are named, inheritable recipes for building an entity's initial set of components.
//!
//! Templates are pure data and can be deserialized from JSON:
//!
//! ```json
//! { "name": "Orc", "inherit": ["Monster"], "components": [{ "type": "Health", "properties": { "maximum": 50 } }] }
//! ```

mod entity_template;
mod prefab_builder;

pub use entity_template::*;
pub use prefab_builder::*;
