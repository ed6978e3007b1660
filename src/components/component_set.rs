use crate::components::{Component, ComponentKey};

/// A set of [Component] types, expressed as a tuple.
///
/// Used by the [QueryBuilder](crate::entities::QueryBuilder) to turn `(A, B)` into registry keys.
pub trait ComponentSet {
	/// The keys of every type in the set, in declaration order.
	fn keys() -> Vec<ComponentKey>;
}

impl ComponentSet for () {
	fn keys() -> Vec<ComponentKey> {
		Vec::new()
	}
}

macro_rules! impl_component_set {
    ($($t: ident),*) => {
        impl <$($t: Component),*> ComponentSet for ($($t),*,) {
            fn keys() -> Vec<ComponentKey> {
                vec![$(ComponentKey::of::<$t>()),*]
            }
        }
    };
}

impl_component_set!(T0);
impl_component_set!(T0, T1);
impl_component_set!(T0, T1, T2);
impl_component_set!(T0, T1, T2, T3);
impl_component_set!(T0, T1, T2, T3, T4);
impl_component_set!(T0, T1, T2, T3, T4, T5);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7, T8);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_component_set!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
