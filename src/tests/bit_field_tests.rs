use crate::data_structures::BitField;

#[test]
pub fn set_and_clear() {
	let mut bits = BitField::new();
	for i in (0..100).step_by(3) {
		bits.set(i, true);
	}

	for i in 0..100 {
		assert_eq!(i % 3 == 0, bits.get(i), "Bit {} has the wrong value", i);
	}

	bits.set(99, false);
	assert!(!bits.get(99), "Bit was not cleared");
	assert!(!bits.get(1000), "Bits past the end should read as unset");
}

#[test]
pub fn masks() {
	let entity: BitField = [1, 4, 40].into_iter().collect();
	let all: BitField = [1, 40].into_iter().collect();
	let missing: BitField = [1, 41].into_iter().collect();
	let other: BitField = [2, 3, 64].into_iter().collect();

	assert!(entity.contains_all(&all), "Entity should contain every bit of the mask");
	assert!(!entity.contains_all(&missing), "Entity is missing bit 41");
	assert!(entity.contains_all(&BitField::new()), "Every field contains the empty mask");
	assert!(entity.intersects(&all), "Fields share bit 1");
	assert!(!entity.intersects(&other), "Fields share no bit");
	assert!(!entity.intersects(&BitField::new()), "Nothing intersects the empty mask");
}

#[test]
pub fn equality_ignores_capacity() {
	let mut small = BitField::new();
	small.set(3, true);

	let mut large = BitField::with_capacity(256);
	large.set(3, true);

	assert_eq!(small, large, "Fields with the same bits should be equal");
	assert!(large.capacity() >= 256, "Capacity was not reserved");

	large.set(200, true);
	assert_ne!(small, large, "Fields with different bits should differ");

	large.clear();
	assert!(large.is_empty(), "Field should be empty after clear");
	assert_eq!(Vec::<usize>::new(), large.iter_ones().collect::<Vec<_>>());
}
