mod component;

use proc_macro::TokenStream;

/// Implements `prefab_ecs::components::Component` for a struct.
///
/// Options are read from an optional `#[component(...)]` attribute:
/// * `name = "..."` - the registry name, defaults to the type name
/// * `allow_multiple` - several instances may live on one entity
/// * `events(a, b)` - routes event `a` to `Self::on_a` and `b` to `Self::on_b`
/// * `on_event`, `on_attached`, `on_destroyed` - use the matching inherent methods as hooks
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let ast = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    component::impl_component(&ast)
}
