use crate::components::{Component, ComponentType};
use crate::error::{EcsError, EcsResult};
use crate::prefabs::PrefabBuilder;
use crate::entities::EntityId;
use crate::config::EcsConfig;
use serde_json::{Map, Value};
use crate::domain::Domain;
use indexmap::IndexMap;

/// A set of named [Domains](Domain) sharing one list of component types and one [PrefabBuilder].
///
/// Exactly one domain is current once any has been created.
#[derive(Default)]
pub struct Engine {
	config: EcsConfig,
	component_types: Vec<ComponentType>,
	prefabs: PrefabBuilder,
	domains: IndexMap<String, Domain>,
	current: Option<String>,
}

impl Engine {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(config: EcsConfig) -> Self {
		Self {
			prefabs: PrefabBuilder::with_config(config.clone()),
			config,
			..Self::default()
		}
	}

	pub fn config(&self) -> &EcsConfig {
		&self.config
	}

	/// Register a component type with the engine and every existing domain.
	pub fn register<T: Component>(&mut self) -> EcsResult<()> {
		self.register_type(ComponentType::of::<T>())
	}

	pub fn register_type(&mut self, component_type: ComponentType) -> EcsResult<()> {
		if self.component_types.contains(&component_type) {
			return Ok(());
		}

		for domain in self.domains.values_mut() {
			domain.register_type(component_type.clone())?;
		}

		self.component_types.push(component_type);
		Ok(())
	}

	pub fn prefabs(&self) -> &PrefabBuilder {
		&self.prefabs
	}

	pub fn prefabs_mut(&mut self) -> &mut PrefabBuilder {
		&mut self.prefabs
	}

	/// Create a domain with every registered component type and make it current.
	///
	/// An existing domain with the same name is replaced, dropping its entities.
	pub fn create_domain(&mut self, name: &str) -> EcsResult<&mut Domain> {
		if let Some(existing) = self.domains.get(name) {
			log::warn!("domain {} already exists, discarding its {} entities", name, existing.entities().len());
		}

		let mut domain = Domain::with_config(name, self.config.clone());
		for component_type in &self.component_types {
			domain.register_type(component_type.clone())?;
		}

		self.domains.insert(name.to_owned(), domain);
		self.current = Some(name.to_owned());
		self.domain_mut()
	}

	/// Make another existing domain current.
	pub fn change_domain(&mut self, name: &str) -> EcsResult<&mut Domain> {
		if !self.domains.contains_key(name) {
			return Err(EcsError::UnknownDomain(name.to_owned()));
		}

		log::debug!("switched to domain {}", name);
		self.current = Some(name.to_owned());
		self.domain_mut()
	}

	/// The name of the current domain.
	pub fn current(&self) -> Option<&str> {
		self.current.as_deref()
	}

	pub fn domain(&self) -> EcsResult<&Domain> {
		let name = self.current.as_ref().ok_or(EcsError::NoActiveDomain)?;
		self.domains.get(name).ok_or_else(|| EcsError::UnknownDomain(name.clone()))
	}

	pub fn domain_mut(&mut self) -> EcsResult<&mut Domain> {
		let name = self.current.as_ref().ok_or(EcsError::NoActiveDomain)?;
		self.domains.get_mut(name).ok_or_else(|| EcsError::UnknownDomain(name.clone()))
	}

	/// Look up any domain by name.
	pub fn get_domain(&self, name: &str) -> EcsResult<&Domain> {
		self.domains.get(name).ok_or_else(|| EcsError::UnknownDomain(name.to_owned()))
	}

	pub fn domain_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.domains.keys().map(String::as_str)
	}

	/// Build a prefab into the current domain.
	pub fn build_prefab(
		&mut self, name: &str, overrides: Option<&Map<String, Value>>, alias: Option<&str>,
	) -> EcsResult<EntityId> {
		let current = self.current.as_ref().ok_or(EcsError::NoActiveDomain)?;
		let domain = self.domains.get_mut(current).ok_or_else(|| EcsError::UnknownDomain(current.clone()))?;
		self.prefabs.build(domain, name, overrides, alias)
	}
}
