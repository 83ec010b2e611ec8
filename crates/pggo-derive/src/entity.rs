//! Entity derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

struct BoundField<'a> {
    ident: &'a syn::Ident,
    column: String,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let mut bound = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = FieldAttrs::parse(field)?;
        if attrs.skip {
            continue;
        }
        let column = attrs.column.unwrap_or_else(|| ident.unraw().to_string());
        if let Some(prev) = bound.iter().find(|f: &&BoundField<'_>| f.column == column) {
            return Err(syn::Error::new_spanned(
                field,
                format!("column \"{column}\" is already bound to field `{}`", prev.ident),
            ));
        }
        bound.push(BoundField { ident, column });
    }

    let columns: Vec<&str> = bound.iter().map(|f| f.column.as_str()).collect();
    let pointers = bound.iter().map(|f| {
        let ident = f.ident;
        let column = &f.column;
        quote! { .field(#column, &mut self.#ident) }
    });
    let values = bound.iter().map(|f| {
        let ident = f.ident;
        let column = &f.column;
        quote! { .field(#column, ::std::clone::Clone::clone(&self.#ident)) }
    });

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            /// Bound columns, in field order.
            pub const COLUMNS: &'static [&'static str] = &[#(#columns),*];
        }

        impl #impl_generics ::pggo::Entity for #name #ty_generics #where_clause {
            fn get_pointers<'__pggo>(
                &'__pggo mut self,
                columns: &[&str],
            ) -> ::pggo::OrmResult<::std::vec::Vec<&'__pggo mut dyn ::pggo::Scan>> {
                ::pggo::Pointers::new()
                    #(#pointers)*
                    .select(columns)
            }

            fn get_values(
                &self,
                columns: &[&str],
            ) -> ::pggo::OrmResult<::std::vec::Vec<::pggo::Param>> {
                ::pggo::Values::new()
                    #(#values)*
                    .select(columns)
            }
        }
    })
}

#[derive(Default)]
struct FieldAttrs {
    column: Option<String>,
    skip: bool,
}

impl FieldAttrs {
    fn parse(field: &syn::Field) -> Result<Self> {
        let mut attrs = FieldAttrs::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("pggo") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("column") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    attrs.column = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `column = \"...\"` or `skip`"))
                }
            })?;
        }
        Ok(attrs)
    }
}
