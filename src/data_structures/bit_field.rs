use std::hash::{Hash, Hasher};
use std::cmp::Ordering;
use std::fmt;

const BITS: usize = 32;
const FIRST_BIT: u32 = 1 << (BITS - 1);

/// A dynamically sized bit-field.
///
/// Used both as an entity's component mask and as the masks of a [Query](crate::entities::Query).
/// Bits past the end of the backing storage read as unset, so two fields of different
/// lengths compare equal when their set bits are equal.
#[derive(Default, Clone)]
pub struct BitField {
	values: Vec<u32>,
}

impl BitField {
	/// Create a new [BitField].
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a new [BitField] with the specified capacity.
	///
	/// # Arguments
	/// * `capacity` - A usize representing the container's target capacity in bits
	pub fn with_capacity(capacity: usize) -> Self {
		let mut instance = Self { values: Vec::new() };
		instance.ensure_capacity(capacity);
		instance
	}

	/// Get the value of the bit at index `i`.
	///
	/// # Arguments
	/// * `i` - The index of the element to retrieve
	#[inline(always)]
	pub fn get(&self, i: usize) -> bool {
		let (position, shift) = Self::pos_shift(i);
		match self.values.get(position) {
			Some(value) => (value & (FIRST_BIT >> shift)) != 0,
			None => false,
		}
	}

	/// Set the value of the bit at index `i`.
	///
	/// # Arguments
	/// * `i` - The index of the element to modify
	#[inline(always)]
	pub fn set(&mut self, i: usize, value: bool) {
		let (position, shift) = Self::pos_shift(i);
		let bit = FIRST_BIT >> shift;

		match value {
			true => {
				if self.values.len() <= position {
					self.values.resize(position + 1, 0);
				}
				self.values[position] |= bit;
			},

			false => {
				if let Some(bit_value) = self.values.get_mut(position) {
					*bit_value &= !bit;
				}
			},
		}
	}

	/// Check whether every bit set in `mask` is also set in this [BitField].
	pub fn contains_all(&self, mask: &BitField) -> bool {
		mask.values.iter().enumerate().all(|(i, mask)| {
			let bits = self.values.get(i).copied().unwrap_or(0);
			(bits & *mask) == *mask
		})
	}

	/// Check whether this [BitField] shares at least one set bit with `mask`.
	pub fn intersects(&self, mask: &BitField) -> bool {
		self.values.iter().zip(mask.values.iter()).any(|(bits, mask)| (*bits & *mask) != 0)
	}

	/// Returns *true* if no bit is set.
	pub fn is_empty(&self) -> bool {
		self.values.iter().all(|v| *v == 0)
	}

	/// Set all bits to 0.
	pub fn clear(&mut self) {
		self.values.fill(0);
	}

	/// Set the minimum capacity of the [BitField].
	/// # Arguments
	/// * `capacity` - A usize representing the container's minimum capacity in bits
	pub fn ensure_capacity(&mut self, capacity: usize) {
		let count = (capacity + BITS - 1) / BITS;
		if self.values.len() < count {
			self.values.resize(count, 0);
		}
	}

	/// Get the [BitField]'s capacity in bits.
	pub fn capacity(&self) -> usize {
		self.values.len() * BITS
	}

	/// Iterate over the indices of all set bits, in ascending order.
	pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
		self.values.iter().enumerate().flat_map(|(position, value)| {
			(0..BITS).filter(move |shift| value & (FIRST_BIT >> shift) != 0).map(move |shift| position * BITS + shift)
		})
	}

	#[inline(always)]
	fn pos_shift(a: usize) -> (usize, usize) {
		(a / BITS, a % BITS)
	}
}

impl FromIterator<usize> for BitField {
	fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
		let mut bitfield = BitField::new();
		for i in iter {
			bitfield.set(i, true);
		}
		bitfield
	}
}

impl Eq for BitField {}

impl PartialEq<Self> for BitField {
	fn eq(&self, other: &Self) -> bool {
		match self.values.len().cmp(&other.values.len()) {
			Ordering::Equal => self.values.eq(&other.values),
			Ordering::Less => {
				self.values.eq(&other.values[0..self.values.len()])
					&& other.values[self.values.len()..].iter().all(|i| *i == 0)
			},
			Ordering::Greater => {
				self.values[0..other.values.len()].eq(&other.values)
					&& self.values[other.values.len()..].iter().all(|i| *i == 0)
			},
		}
	}
}

impl Hash for BitField {
	fn hash<H: Hasher>(&self, state: &mut H) {
		let last = self.values.iter().rposition(|v| *v != 0);
		if let Some(last) = last {
			for i in &self.values[0..=last] {
				i.hash(state);
			}
		}
	}
}

impl fmt::Debug for BitField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter_ones()).finish()
	}
}
