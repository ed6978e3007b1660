//! A registry-assigned identifier tied to a [ComponentType](crate::components::ComponentType).
//!
//! Developers shouldn't rely on [component ids](ComponentId) across registries:
//! two [Domains](crate::domain::Domain) may hand out different ids for the same component.
//! [Component ids](ComponentId) double as bit positions in the
//! [bitfields](crate::data_structures::BitField) used by entities and [queries](crate::entities::Query).

use crate::data_structures::BitField;
use std::fmt;

/// The bit ("cbit") a [ComponentRegistry](crate::components::ComponentRegistry) assigned to a component type.
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct ComponentId {
	value: u32,
}

impl ComponentId {
	#[inline(always)]
	pub(crate) const fn new(value: u32) -> Self {
		Self { value }
	}

	/// The raw bit index.
	#[inline(always)]
	pub const fn value(&self) -> u32 {
		self.value
	}

	#[inline(always)]
	pub(crate) const fn index(&self) -> usize {
		self.value as usize
	}
}

impl fmt::Display for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.value)
	}
}

impl From<&[ComponentId]> for BitField {
	fn from(ids: &[ComponentId]) -> Self {
		let mut bitfield = BitField::new();
		for id in ids {
			bitfield.set(id.index(), true);
		}

		bitfield
	}
}
