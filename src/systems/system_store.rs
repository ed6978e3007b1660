use crate::error::{EcsError, EcsResult};
use std::collections::HashSet;
use crate::systems::System;
use crate::domain::Domain;
use std::any::TypeId;

/// An ordered list of [systems](System) that are set up once and then run together.
#[derive(Default)]
pub struct SystemStore {
	state: State,
	set: HashSet<TypeId>,
	systems: Vec<Box<dyn System>>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	#[default]
	Uninitialized,
	Initializing,
	Initialized,
}

impl SystemStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_system<T: 'static + System>(&mut self, system: T) -> EcsResult<()> {
		match self.state {
			State::Uninitialized => {
				if !self.set.insert(TypeId::of::<T>()) {
					return Err(EcsError::SystemState("System was already added to the store"));
				}
				self.systems.push(Box::new(system));
				Ok(())
			},
			State::Initializing => Err(EcsError::SystemState("Cannot add new systems during initialization")),
			State::Initialized => Err(EcsError::SystemState("Cannot add new systems after initialization")),
		}
	}

	/// Initialize all [systems](System).
	/// Must be called before any system can be run.
	pub fn setup_systems(&mut self, domain: &mut Domain) -> EcsResult<()> {
		match self.state {
			State::Uninitialized => {
				self.state = State::Initializing;
				for system in self.systems.iter_mut() {
					if let Err(err) = system.setup(domain) {
						self.state = State::Uninitialized;
						return Err(err);
					}
				}
				self.state = State::Initialized;
				log::debug!("initialized {} systems", self.systems.len());
				Ok(())
			},
			State::Initializing => Err(EcsError::SystemState("Recursive setup call to setup_systems")),
			State::Initialized => Err(EcsError::SystemState("Systems have already been initialized")),
		}
	}

	/// Execute all [systems](System), in the order they were added.
	pub fn run_systems(&mut self, domain: &mut Domain) -> EcsResult<()> {
		match self.state {
			State::Uninitialized | State::Initializing => {
				Err(EcsError::SystemState("Systems must be initialized before they can run"))
			},
			State::Initialized => self.systems.iter_mut().try_for_each(|s| s.run(domain)),
		}
	}

	pub fn len(&self) -> usize {
		self.systems.len()
	}

	pub fn is_empty(&self) -> bool {
		self.systems.is_empty()
	}
}
