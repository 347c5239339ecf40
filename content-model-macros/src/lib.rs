use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, GenericArgument, Index, PathArguments, Type};

/// Implements `content_model::Keyed<K>` from the field marked `#[key]`.
///
/// A field of type `Option<K>` is reported as is; any other field type `K`
/// is always set.
#[proc_macro_derive(Keyed, attributes(key))]
pub fn derive_keyed(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    expand_keyed(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Implements `content_model::Child<P>` from the `ParentCell<P>` field marked
/// `#[parent]`.
#[proc_macro_derive(Child, attributes(parent))]
pub fn derive_child(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    expand_child(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_keyed(ast: &DeriveInput) -> syn::Result<TokenStream2> {
    let (access, field) = marked_field(ast, "key")?;
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let (key_ty, body) = match single_type_argument(&field.ty, "Option") {
        Some(inner) => (inner, quote! { ::core::clone::Clone::clone(&self.#access) }),
        None => (
            &field.ty,
            quote! { ::core::option::Option::Some(::core::clone::Clone::clone(&self.#access)) },
        ),
    };
    Ok(quote! {
        impl #impl_generics ::content_model::Keyed<#key_ty> for #name #ty_generics #where_clause {
            fn key(&self) -> ::core::option::Option<#key_ty> {
                #body
            }
        }
    })
}

fn expand_child(ast: &DeriveInput) -> syn::Result<TokenStream2> {
    let (access, field) = marked_field(ast, "parent")?;
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let parent_ty = single_type_argument(&field.ty, "ParentCell").ok_or_else(|| {
        syn::Error::new_spanned(&field.ty, "#[parent] field must be a ParentCell<P>")
    })?;
    Ok(quote! {
        impl #impl_generics ::content_model::Child<#parent_ty> for #name #ty_generics #where_clause {
            fn parent(&self) -> ::core::option::Option<#parent_ty> {
                self.#access.get()
            }

            fn set_parent(&self, parent: ::core::option::Option<#parent_ty>) {
                self.#access.set(parent)
            }
        }
    })
}

/// Finds the one struct field carrying `#[marker]`, with the tokens to reach it.
fn marked_field<'a>(ast: &'a DeriveInput, marker: &str) -> syn::Result<(TokenStream2, &'a Field)> {
    let Data::Struct(data) = &ast.data else {
        return Err(syn::Error::new(
            Span::call_site(),
            format!("#[{marker}] is only supported on structs"),
        ));
    };
    let mut marked = data
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.attrs.iter().any(|attr| attr.path().is_ident(marker)));
    let Some((position, field)) = marked.next() else {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            format!("no field is marked #[{marker}]"),
        ));
    };
    if let Some((_, extra)) = marked.next() {
        return Err(syn::Error::new_spanned(
            extra,
            format!("only one field may be marked #[{marker}]"),
        ));
    }
    let access = match (&data.fields, &field.ident) {
        (Fields::Named(_), Some(ident)) => quote! { #ident },
        _ => {
            let index = Index::from(position);
            quote! { #index }
        }
    };
    Ok((access, field))
}

/// `T` when `ty` is `wrapper<T>` (by last path segment), else `None`.
fn single_type_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    match arguments.args.first()? {
        GenericArgument::Type(inner) if arguments.args.len() == 1 => Some(inner),
        _ => None,
    }
}
