use syn::{DeriveInput, Error, Ident, Lit, Meta, NestedMeta};
use quote::{format_ident, quote};
use proc_macro::TokenStream;

#[derive(Default)]
struct ComponentOptions {
    name: Option<String>,
    allow_multiple: bool,
    events: Vec<Ident>,
    on_event: bool,
    on_attached: bool,
    on_destroyed: bool,
}

impl ComponentOptions {
    fn parse(ast: &DeriveInput) -> syn::Result<Self> {
        let mut options = Self::default();

        for attr in ast.attrs.iter().filter(|a| a.path.is_ident("component")) {
            let list = match attr.parse_meta()? {
                Meta::List(list) => list,
                other => return Err(Error::new_spanned(other, "expected #[component(...)]")),
            };

            for nested in list.nested {
                match nested {
                    NestedMeta::Meta(Meta::Path(path)) if path.is_ident("allow_multiple") => {
                        options.allow_multiple = true
                    },
                    NestedMeta::Meta(Meta::Path(path)) if path.is_ident("on_event") => options.on_event = true,
                    NestedMeta::Meta(Meta::Path(path)) if path.is_ident("on_attached") => options.on_attached = true,
                    NestedMeta::Meta(Meta::Path(path)) if path.is_ident("on_destroyed") => {
                        options.on_destroyed = true
                    },
                    NestedMeta::Meta(Meta::NameValue(pair)) if pair.path.is_ident("name") => match pair.lit {
                        Lit::Str(name) => options.name = Some(name.value()),
                        other => return Err(Error::new_spanned(other, "component name must be a string")),
                    },
                    NestedMeta::Meta(Meta::List(events)) if events.path.is_ident("events") => {
                        for event in events.nested {
                            match event {
                                NestedMeta::Meta(Meta::Path(path)) if path.get_ident().is_some() => {
                                    options.events.extend(path.get_ident().cloned())
                                },
                                other => return Err(Error::new_spanned(other, "expected an event name")),
                            }
                        }
                    },
                    other => return Err(Error::new_spanned(other, "unknown component option")),
                }
            }
        }

        Ok(options)
    }
}

pub fn impl_component(ast: &DeriveInput) -> TokenStream {
    let options = match ComponentOptions::parse(ast) {
        Ok(options) => options,
        Err(err) => return err.to_compile_error().into(),
    };

    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let type_name = options.name.clone().unwrap_or_else(|| name.to_string());
    let allow_multiple = options.allow_multiple;

    let event_names = options.events.iter().map(|e| e.to_string());
    let event_handlers = options.events.iter().map(|e| format_ident!("on_{}", e));

    let on_event = options.on_event.then(|| quote!(.any_event(Self::on_event)));
    let on_attached = options.on_attached.then(|| quote!(.attached(Self::on_attached)));
    let on_destroyed = options.on_destroyed.then(|| quote!(.destroyed(Self::on_destroyed)));

    let gen = quote! {
        impl #impl_generics prefab_ecs::components::Component for #name #ty_generics #where_clause {
            const NAME: &'static str = #type_name;
            const ALLOW_MULTIPLE: bool = #allow_multiple;

            fn handlers() -> prefab_ecs::components::Handlers<Self> {
                prefab_ecs::components::Handlers::new()
                    #(.on(#event_names, Self::#event_handlers))*
                    #on_event
                    #on_attached
                    #on_destroyed
            }
        }
    };
    gen.into()
}
