use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, ItemFn, Lit, LitStr, MetaNameValue, Token};

const DEFAULT_RENAME: &str = "camelCase";

/// Expands the `#[api_model]` attribute macro.
///
/// Adds the missing `Debug`/`Serialize`/`Deserialize` derives, `ToSchema` behind the `server`
/// feature and a serde `rename_all` (camelCase unless overridden). Structs additionally reject
/// unknown fields.
pub fn expand_api_model(args: TokenStream, input: DeriveInput) -> TokenStream {
    match model_attrs(args, &input) {
        Ok(attrs) => quote! {
            #attrs
            #input
        },
        Err(err) => err.to_compile_error(),
    }
}

/// Expands the `#[api_handler]` attribute macro into a feature-gated `utoipa::path`.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn model_attrs(args: TokenStream, input: &DeriveInput) -> syn::Result<TokenStream> {
    if let Data::Union(data) = &input.data {
        return Err(syn::Error::new_spanned(data.union_token, "api_model does not support unions"));
    }

    let rename = rename_arg(args)?;
    let existing = SerdeAttrs::scan(&input.attrs)?;
    let derived = derived_traits(&input.attrs);

    let missing: Vec<TokenStream> = [
        ("Debug", quote! { Debug }),
        ("Serialize", quote! { ::serde::Serialize }),
        ("Deserialize", quote! { ::serde::Deserialize }),
    ]
    .into_iter()
    .filter(|(name, _)| !derived.iter().any(|d| d == name))
    .map(|(_, path)| path)
    .collect();

    let mut attrs = TokenStream::new();
    if !missing.is_empty() {
        attrs.extend(quote! { #[derive(#(#missing),*)] });
    }
    if !derived.iter().any(|d| d == "ToSchema") {
        attrs.extend(quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] });
    }

    match existing.rename_all {
        Some(lit) if lit.value() != rename.value() => {
            return Err(syn::Error::new_spanned(
                lit,
                "serde rename_all conflicts with api_model; pass it as api_model(rename_all = ...)",
            ));
        },
        Some(_) => {},
        None => attrs.extend(quote! { #[serde(rename_all = #rename)] }),
    }

    if matches!(input.data, Data::Struct(_)) && !existing.deny_unknown_fields {
        attrs.extend(quote! { #[serde(deny_unknown_fields)] });
    }

    Ok(attrs)
}

/// Parses the optional `rename_all = "..."` argument.
fn rename_arg(args: TokenStream) -> syn::Result<LitStr> {
    let metas = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(args)?;
    let mut rename = None;

    for meta in metas {
        if !meta.path.is_ident("rename_all") {
            return Err(syn::Error::new_spanned(meta.path, "expected `rename_all = \"...\"`"));
        }
        let Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) = &meta.value else {
            return Err(syn::Error::new_spanned(meta.value, "rename_all must be a string literal"));
        };
        if rename.replace(lit.clone()).is_some() {
            return Err(syn::Error::new_spanned(meta.path, "duplicate rename_all"));
        }
    }

    Ok(rename.unwrap_or_else(|| LitStr::new(DEFAULT_RENAME, Span::call_site())))
}

#[derive(Default)]
struct SerdeAttrs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

impl SerdeAttrs {
    fn scan(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut found = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    found.rename_all = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("deny_unknown_fields") {
                    found.deny_unknown_fields = true;
                } else if meta.input.peek(Token![=]) {
                    meta.value()?.parse::<Expr>()?;
                } else if meta.input.peek(syn::token::Paren) {
                    let nested;
                    syn::parenthesized!(nested in meta.input);
                    nested.parse::<TokenStream>()?;
                }
                Ok(())
            })?;
        }
        Ok(found)
    }
}

/// Last path segment of every trait in the item's `#[derive(...)]` lists.
fn derived_traits(attrs: &[Attribute]) -> Vec<String> {
    let mut traits = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.push(segment.ident.to_string());
            }
            Ok(())
        });
    }
    traits
}
