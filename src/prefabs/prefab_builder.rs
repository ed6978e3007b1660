use crate::prefabs::{ComponentTemplate, EntityTemplate};
use crate::components::{normalize, Attach, ComponentRegistry};
use crate::error::{EcsError, EcsResult};
use crate::entities::EntityId;
use crate::config::EcsConfig;
use serde_json::{Map, Value};
use crate::domain::Domain;
use indexmap::IndexMap;

/// A component type and the final properties it will be built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedComponent {
	/// The registered display name.
	pub component_type: String,
	pub properties: Map<String, Value>,
}

/// A registry of [EntityTemplates](EntityTemplate) that can be resolved and built into any [Domain].
#[derive(Debug, Clone, Default)]
pub struct PrefabBuilder {
	config: EcsConfig,
	templates: IndexMap<String, EntityTemplate>,
}

impl PrefabBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: EcsConfig) -> Self {
		Self {
			config,
			templates: IndexMap::new(),
		}
	}

	/// Add a template, replacing any template registered under the same name.
	pub fn register(&mut self, template: EntityTemplate) {
		log::debug!("registered template {}", template.name);
		self.templates.insert(normalize(&template.name), template);
	}

	/// Parse one template, or an array of templates, from JSON.
	pub fn deserialize(json: &str) -> EcsResult<Vec<EntityTemplate>> {
		let value: Value = serde_json::from_str(json).map_err(EcsError::Template)?;
		match value {
			Value::Array(_) => serde_json::from_value(value).map_err(EcsError::Template),
			other => Ok(vec![serde_json::from_value(other).map_err(EcsError::Template)?]),
		}
	}

	/// Parse and register every template found in `json`.
	pub fn register_json(&mut self, json: &str) -> EcsResult<()> {
		for template in Self::deserialize(json)? {
			self.register(template);
		}
		Ok(())
	}

	/// Every registered template, in registration order.
	pub fn templates(&self) -> impl Iterator<Item = &EntityTemplate> + '_ {
		self.templates.values()
	}

	/// Look up a template by name, case-insensitively.
	pub fn get(&self, name: &str) -> EcsResult<&EntityTemplate> {
		self.templates.get(&normalize(name)).ok_or_else(|| EcsError::UnknownTemplate(name.to_owned()))
	}

	/// Every ancestor of a template, from the most distant one to the nearest parent.
	///
	/// A template reachable through several parents is listed once, at its first position.
	pub fn ancestors(&self, name: &str) -> EcsResult<Vec<&EntityTemplate>> {
		let template = self.get(name)?;
		let mut stack = vec![template.name.clone()];
		let mut ancestors = Vec::new();
		self.collect_ancestors(template, &mut stack, &mut ancestors)?;

		let mut seen = Vec::new();
		ancestors.retain(|t: &&EntityTemplate| {
			let key = normalize(&t.name);
			let first = !seen.contains(&key);
			seen.push(key);
			first
		});

		Ok(ancestors)
	}

	fn collect_ancestors<'a>(
		&'a self, template: &'a EntityTemplate, stack: &mut Vec<String>, out: &mut Vec<&'a EntityTemplate>,
	) -> EcsResult<()> {
		for parent in &template.inherit {
			if stack.iter().any(|name| normalize(name) == normalize(parent)) {
				let mut chain = stack.clone();
				chain.push(parent.clone());
				return Err(EcsError::CyclicTemplate { chain });
			}

			if stack.len() > self.config.max_inheritance_depth {
				return Err(EcsError::TemplateTooDeep {
					name: stack[0].clone(),
					limit: self.config.max_inheritance_depth,
				});
			}

			let parent = self.get(parent)?;
			stack.push(parent.name.clone());
			self.collect_ancestors(parent, stack, out)?;
			stack.pop();
			out.push(parent);
		}

		Ok(())
	}

	/// Resolve a template into the components it builds, in attachment order.
	///
	/// Inherited types come first, from the most distant ancestor down to the template itself.
	/// `overrides` maps component names to property blocks merged on top of everything else;
	/// types that allow multiple instances take an array of blocks, one per instance.
	pub fn resolve(
		&self, registry: &ComponentRegistry, name: &str, overrides: Option<&Map<String, Value>>,
	) -> EcsResult<Vec<ResolvedComponent>> {
		let template = self.get(name)?;
		let ancestors = self.ancestors(name)?;

		// Declaration order, from the most distant ancestor down to the template itself.
		let declared: Vec<&ComponentTemplate> = ancestors
			.iter()
			.copied()
			.chain(std::iter::once(template))
			.flat_map(|t| t.components.iter())
			.collect();

		// Nearest-first: the template's own entries, then each ancestor from the nearest.
		let mut flattened: Vec<&ComponentTemplate> = template.components.iter().collect();
		for ancestor in ancestors.iter().rev() {
			flattened.extend(ancestor.components.iter());
		}

		let mut groups: IndexMap<String, Vec<&ComponentTemplate>> = IndexMap::new();
		for entry in &declared {
			groups.entry(normalize(&entry.component_type)).or_default();
		}
		for entry in flattened {
			groups.entry(normalize(&entry.component_type)).or_default().push(entry);
		}

		let overrides: IndexMap<String, &Value> = overrides
			.into_iter()
			.flatten()
			.map(|(key, value)| (normalize(key), value))
			.collect();

		for key in overrides.keys().filter(|key| !groups.contains_key(*key)) {
			log::warn!("template {} has no {} component, ignoring its override", name, key);
		}

		let mut resolved = Vec::new();
		for (key, group) in groups {
			let registered = registry.get_type(key.as_str())?;
			let component_type = registered.name().to_owned();
			let block = overrides.get(&key).copied();

			if registered.allow_multiple() {
				let positional = match block {
					Some(Value::Array(blocks)) => blocks.iter().collect(),
					Some(block) => vec![block],
					None => Vec::new(),
				};

				let instances = declared.iter().filter(|entry| normalize(&entry.component_type) == key);
				for (i, entry) in instances.enumerate() {
					let mut properties = entry.properties.clone();
					if let Some(Value::Object(block)) = positional.get(i) {
						merge(&mut properties, block);
					}
					resolved.push(ResolvedComponent {
						component_type: component_type.clone(),
						properties,
					});
				}
			} else {
				let mut properties = resolve_overrides(&group);
				if let Some(Value::Object(block)) = block {
					merge(&mut properties, block);
				}
				resolved.push(ResolvedComponent { component_type, properties });
			}
		}

		Ok(resolved)
	}

	/// Create an entity from a template.
	///
	/// Queries are only notified once every component is attached. If any attachment fails,
	/// the partially built entity is destroyed and the error returned.
	pub fn build(
		&self, domain: &mut Domain, name: &str, overrides: Option<&Map<String, Value>>, alias: Option<&str>,
	) -> EcsResult<EntityId> {
		let resolved = self.resolve(domain.components(), name, overrides)?;
		let id = domain.create_entity(alias)?;
		domain.set_query_eligible(&id, false);

		for component in resolved {
			let properties = Some(Value::Object(component.properties));
			if let Err(err) = domain.attach(&id, Attach::Name(component.component_type), properties) {
				if let Err(cleanup) = domain.destroy_entity(&id) {
					log::error!("failed to clean up entity {}: {}", id, cleanup);
				}
				return Err(err);
			}
		}

		domain.set_query_eligible(&id, true);
		domain.candidate(&id);
		log::debug!("built entity {} from template {}", id, name);
		Ok(id)
	}
}

/// Merge the property blocks of one component type.
///
/// `group` is ordered from the most to the least specific template: earlier blocks override
/// matching keys of later ones. A block with `overwrite` unset only fills keys that are still missing.
pub fn resolve_overrides(group: &[&ComponentTemplate]) -> Map<String, Value> {
	let mut properties = Map::new();
	for entry in group.iter().rev() {
		match entry.overwrite {
			true => merge(&mut properties, &entry.properties),
			false => fill(&mut properties, &entry.properties),
		}
	}
	properties
}

/// Recursively merge `overlay` into `base`. Objects merge key by key; everything else is replaced.
pub fn merge(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
	for (key, value) in overlay {
		match (base.get_mut(key), value) {
			(Some(Value::Object(base)), Value::Object(overlay)) => merge(base, overlay),
			_ => {
				base.insert(key.clone(), value.clone());
			},
		}
	}
}

/// Recursively copy keys of `overlay` that `base` lacks.
fn fill(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
	for (key, value) in overlay {
		match (base.get_mut(key), value) {
			(Some(Value::Object(base)), Value::Object(overlay)) => fill(base, overlay),
			(Some(_), _) => {},
			(None, _) => {
				base.insert(key.clone(), value.clone());
			},
		}
	}
}
