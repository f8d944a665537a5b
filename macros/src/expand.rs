use crate::parse::{EntryEnum, EntryVariant};
use proc_macro2::TokenStream;
use quote::quote;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Loggable,
    Traceable,
}

impl Flavor {
    fn captures_source(self, variant: &EntryVariant) -> bool {
        self == Flavor::Traceable && !variant.no_source
    }
}

pub fn expand(input: &EntryEnum, flavor: Flavor) -> TokenStream {
    let enum_name = &input.name;
    let variants = &input.variants;

    let definitions = variants.iter().map(|variant| {
        let docs = &variant.docs;
        let message = &variant.message;
        let name = &variant.name;
        let fields = variant.fields.iter().map(|(name, ty)| quote! { #name: #ty });
        let source = flavor
            .captures_source(variant)
            .then(|| quote! { err: String });

        if variant.is_unit(flavor.captures_source(variant)) {
            quote! {
                #(#docs)*
                #[error(#message)]
                #name
            }
        } else {
            quote! {
                #(#docs)*
                #[error(#message)]
                #name { #(#fields,)* #source }
            }
        }
    });

    let level_arms = variants.iter().map(|variant| {
        let name = &variant.name;
        let level = &variant.level;
        if variant.is_unit(flavor.captures_source(variant)) {
            quote! { Self::#name => #level }
        } else {
            quote! { Self::#name { .. } => #level }
        }
    });

    let constructors = variants
        .iter()
        .filter(|_| flavor == Flavor::Traceable)
        .filter_map(|variant| constructor(variant, flavor.captures_source(variant)));

    quote! {
        #[allow(dead_code)]
        #[derive(Debug, Clone, thiserror::Error, serde::Serialize, serde::Deserialize)]
        pub enum #enum_name {
            #(#definitions,)*
        }

        impl #enum_name {
            #[allow(dead_code)]
            pub fn level(&self) -> tracing::Level {
                match self {
                    #(#level_arms,)*
                }
            }

            #(#constructors)*
        }
    }
}

fn constructor(variant: &EntryVariant, with_source: bool) -> Option<TokenStream> {
    // Unit variants already occupy the value namespace.
    if variant.is_unit(with_source) {
        return None;
    }

    let name = &variant.name;
    let params = variant
        .fields
        .iter()
        .map(|(field, ty)| quote! { #field: impl Into<#ty> });
    let assignments = variant
        .fields
        .iter()
        .map(|(field, _)| quote! { #field: #field.into() });

    let constructor = if with_source {
        quote! {
            #[allow(non_snake_case, dead_code)]
            pub fn #name(#(#params,)* source: impl std::fmt::Display) -> Self {
                Self::#name {
                    #(#assignments,)*
                    err: source.to_string(),
                }
            }
        }
    } else {
        quote! {
            #[allow(non_snake_case, dead_code)]
            pub fn #name(#(#params),*) -> Self {
                Self::#name {
                    #(#assignments,)*
                }
            }
        }
    };
    Some(constructor)
}
