//! Compile-time dependency injection derives for Unit Passport.
//!
//! - `#[derive(Context)]` makes each field of a context struct extractable
//! - `#[derive(FromContext)]` builds a service by resolving each of its fields
//!
//! Generated code refers to `crate::FromRef`, which the consuming crate must
//! define or re-export at its root.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields};

/// Derive macro for a DI context.
///
/// Generates `impl FromRef<Ctx> for FieldType` for every field, cloning the
/// field out of the context. Field types must be `Clone` and distinct.
///
/// ```ignore
/// #[derive(Context, Clone)]
/// pub struct Context {
///     pub config: Arc<Config>,
///     pub reporter: Reporter,
/// }
///
/// // impl FromRef<Context> for Arc<Config> { ... }
/// // impl FromRef<Context> for Reporter { ... }
/// ```
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_context(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive macro for types resolved from a context.
///
/// Generates `impl FromRef<Context> for Type`, resolving each field with
/// `FromRef::from_ref(ctx)`. The context type defaults to `Context` and can
/// be overridden with `#[from_context(Context = "MyContext")]`.
///
/// ```ignore
/// #[derive(FromContext, Clone)]
/// pub struct PassportService {
///     config: Arc<Config>,
///     reporter: Reporter,
/// }
///
/// let service = PassportService::from_ref(&ctx);
/// ```
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_from_context(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_context(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(input, "Context")?;

    let impls = fields.iter().map(|field| {
        let field_name = &field.ident;
        let field_type = &field.ty;

        quote! {
            impl #impl_generics crate::FromRef<#name #ty_generics> for #field_type #where_clause {
                fn from_ref(ctx: &#name #ty_generics) -> Self {
                    ctx.#field_name.clone()
                }
            }
        }
    });

    Ok(quote! { #(#impls)* })
}

fn expand_from_context(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let context_type = context_type(input)?;
    let fields = named_fields(input, "FromContext")?;

    let field_inits = fields.iter().map(|field| {
        let field_name = &field.ident;
        let field_type = &field.ty;

        quote! {
            #field_name: <#field_type as crate::FromRef<#context_type>>::from_ref(ctx)
        }
    });

    Ok(quote! {
        impl #impl_generics crate::FromRef<#context_type> for #name #ty_generics #where_clause {
            fn from_ref(ctx: &#context_type) -> Self {
                Self {
                    #(#field_inits),*
                }
            }
        }
    })
}

fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> syn::Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}

/// Reads `#[from_context(Context = "Type")]`, defaulting to `Context`.
fn context_type(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let mut context_ty: Option<syn::Type> = None;

    for attr in &input.attrs {
        if attr.path().is_ident("from_context") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("Context") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    context_ty = Some(value.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `Context = \"Type\"`"))
                }
            })?;
        }
    }

    Ok(match context_ty {
        Some(ty) => quote! { #ty },
        None => quote! { Context },
    })
}
