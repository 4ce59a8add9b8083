//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates an implementation of the `Record` trait listing one
//! `DeclaredField` per struct field, in declaration order.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument,
    PathArguments, Result, Type,
};

use super::attrs::{parse_struct_attrs, parse_urlfilter_attrs};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let struct_attrs = parse_struct_attrs(&input.attrs)?;

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut declarations: Vec<TokenStream> = Vec::new();

    // The index is the field's position in the struct, skipped fields included.
    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_urlfilter_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let ident = field_name.unraw().to_string();
        let tag = attrs.tag.unwrap_or_default();
        let ty = &field.ty;

        if attrs.flatten {
            if attrs.decode_values {
                return Err(Error::new(
                    field.span(),
                    "flatten and decode_values cannot be combined; implement DecodeValues on the embedded record and mark it #[urlfilter(decode_values)] instead",
                ));
            }

            let declaration = match generic_inner(ty, "Box") {
                Some(inner) => quote! {
                    ::urlfilter::DeclaredField::<Self>::embedded::<#inner>(
                        #index,
                        #ident,
                        #tag,
                        |s| &*s.#field_name,
                        |s| &mut *s.#field_name,
                    )
                },
                None => quote! {
                    ::urlfilter::DeclaredField::<Self>::embedded::<#ty>(
                        #index,
                        #ident,
                        #tag,
                        |s| &s.#field_name,
                        |s| &mut s.#field_name,
                    )
                },
            };
            declarations.push(declaration);
            continue;
        }

        let shape = if generic_inner(ty, "Vec").is_some() {
            quote! { ::urlfilter::Shape::Sequence }
        } else {
            quote! { ::urlfilter::Shape::Scalar }
        };

        let mut declaration = quote! {
            ::urlfilter::DeclaredField::<Self>::value::<#ty>(
                #index,
                #ident,
                #tag,
                #shape,
                |s| &s.#field_name,
                |s| &mut s.#field_name,
            )
        };

        if attrs.decode_values {
            declaration = quote! {
                #declaration.with_decoder(|s, values| {
                    ::urlfilter::DecodeValues::decode_values(&mut s.#field_name, values)
                })
            };
        }

        declarations.push(declaration);
    }

    let values_decoder = if struct_attrs.decode_values {
        quote! {
            fn values_decoder() -> ::core::option::Option<::urlfilter::DecodeFn<Self>> {
                ::core::option::Option::Some(<Self as ::urlfilter::DecodeValues>::decode_values)
            }
        }
    } else {
        quote! {}
    };

    // Generate the impl block
    let expanded = quote! {
        impl #impl_generics ::urlfilter::Record for #struct_name #ty_generics #where_clause {
            fn declared_fields() -> ::std::vec::Vec<::urlfilter::DeclaredField<Self>> {
                ::std::vec![
                    #(#declarations),*
                ]
            }

            #values_decoder
        }
    };

    Ok(expanded)
}

/// Returns `T` if `ty` is `wrapper<T>`, matching on the last path segment.
fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }

    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}
