use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Error, Expr, ItemFn, Lit, Meta, ReturnType, Token, Type};

/// Expands the `#[folio_runtime::main]` attribute macro.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            &input.sig.ident,
            "The #[folio_runtime::main] attribute can only be used on async functions",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "The #[folio_runtime::main] attribute requires a Result return type",
        )
        .to_compile_error();
    }

    let name = &input.sig.ident;
    let body = &input.block;
    let vis = &input.vis;
    let attrs = &input.attrs;
    let output = &input.sig.output;

    let config = match parse_args(args) {
        Ok(config) => config,
        Err(err) => return err,
    };

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #config;
            let rt = ::folio_runtime::build_runtime(&config)?;
            rt.block_on(async #body)
        }
    }
}

/// Parses `profile[, worker_threads = N]` into a `RuntimeConfig` constructor expression.
fn parse_args(args: TokenStream) -> Result<TokenStream, TokenStream> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated
        .parse2(args)
        .map_err(|err| err.to_compile_error())?;

    let mut profile = quote! { ::folio_runtime::RuntimeConfig::default() };
    let mut worker_threads = None;

    for meta in metas {
        match meta {
            Meta::Path(path) => {
                let Some(ident) = path.get_ident() else {
                    return Err(Error::new_spanned(path, "Expected a profile name").to_compile_error());
                };
                profile = match ident.to_string().as_str() {
                    "server" => quote! { ::folio_runtime::RuntimeConfig::server() },
                    "compact" => quote! { ::folio_runtime::RuntimeConfig::compact() },
                    "default" => quote! { ::folio_runtime::RuntimeConfig::default() },
                    _ => {
                        return Err(Error::new_spanned(
                            ident,
                            "Unknown runtime profile. Use: server, compact, or default",
                        )
                        .to_compile_error());
                    },
                };
            },
            Meta::NameValue(nv) if nv.path.is_ident("worker_threads") => {
                let Expr::Lit(expr) = &nv.value else {
                    return Err(Error::new_spanned(&nv.value, "worker_threads must be an integer")
                        .to_compile_error());
                };
                let Lit::Int(lit) = &expr.lit else {
                    return Err(Error::new_spanned(&nv.value, "worker_threads must be an integer")
                        .to_compile_error());
                };
                let threads: usize = lit.base10_parse().map_err(|err| err.to_compile_error())?;
                worker_threads = Some(threads);
            },
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Unsupported argument; expected a profile or `worker_threads = N`",
                )
                .to_compile_error());
            },
        }
    }

    Ok(match worker_threads {
        Some(threads) => quote! { #profile.with_worker_threads(#threads) },
        None => profile,
    })
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = &**ty else {
        return false;
    };
    path.path.segments.last().is_some_and(|seg| seg.ident == "Result")
}
