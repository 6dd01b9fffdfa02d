use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{DeriveInput, LitStr, parse_macro_input};

use crate::support::attrs::{self, FieldMode};
use crate::support::utils;

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let container = attrs::parse_container(&input.attrs)?;
    let named = utils::require_named_fields(&input)?;

    let mut entries = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let field_attrs = attrs::parse_field(&field.attrs)?;

        let name = field_attrs
            .rename
            .unwrap_or_else(|| LitStr::new(&ident.unraw().to_string(), ident.span()));
        let tags = field_attrs.tags.iter().map(|(key, value)| {
            quote! { .tag(#key, #value) }
        });

        let entry = match field_attrs.mode {
            FieldMode::Skip => continue,
            FieldMode::Value => quote! {
                ::zero_validator::Field::new(#name, &self.#ident) #(#tags)*
            },
            FieldMode::Embed => quote! {
                ::zero_validator::Field::embedded(#name, &self.#ident) #(#tags)*
            },
            FieldMode::Nested => quote! {
                ::zero_validator::Field::with_value(#name, ::zero_validator::FieldValue::Struct) #(#tags)*
            },
        };
        entries.push(entry);
    }

    let messages = container.messages.then(|| {
        quote! {
            fn messages(&self) -> ::zero_validator::MessageOverrides {
                ::zero_validator::FieldMessages::field_messages(self)
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::zero_validator::Record for #struct_name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<::zero_validator::Field<'_>> {
                ::std::vec![#(#entries),*]
            }

            #messages
        }
    })
}
