use crate::error::EcsResult;
use crate::domain::Domain;

/// It provides the logic for modifying the state of [Entities](crate::entities::Entity)
/// and their associated [Components](crate::components::Component).
pub trait System {
	/// Initialises the [System], usually by creating the [queries](crate::entities::Query) it reads.
	/// **This function should not be called by user code.**
	fn setup(&mut self, _domain: &mut Domain) -> EcsResult<()> {
		Ok(())
	}

	/// Executes the system
	fn run(&mut self, domain: &mut Domain) -> EcsResult<()>;
}
