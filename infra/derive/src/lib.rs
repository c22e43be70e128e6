#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace: error enums, feature slice
//! handles, API models/handlers and the runtime entry point.
//!
//! ## Usage
//! Add the crate to `dependencies` of the consuming crate:
//! ```toml
//! [dependencies]
//! folio-derive.workspace = true
//! ```
//!
//! The examples below are `ignore`d because proc-macro crates cannot run their own output.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the workspace Tokio runtime.
///
/// Turns an `async fn main` returning a `Result` into a synchronous `fn main` that builds
/// the runtime described by a [`folio_runtime::RuntimeConfig`] profile and blocks on the body.
///
/// # Arguments
///
/// * `server` - Throughput-oriented profile for the HTTP server.
/// * `compact` - Small footprint profile for tools and tests.
/// * `default` (or no argument) - Worker threads detected from the available parallelism.
/// * `worker_threads = N` - Overrides the worker count of the selected profile.
///
/// # Examples
///
/// ```rust,ignore
/// #[folio_runtime::main(server, worker_threads = 8)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro to define a standard API data model (struct or enum).
///
/// # Injected Behaviors
///
/// * **Derives**: Adds `Debug`, `Serialize` and `Deserialize` if missing.
/// * **`OpenAPI`**: Adds `utoipa::ToSchema` when the `server` feature is enabled.
/// * **Serde Policy**: `rename_all = "camelCase"` and `deny_unknown_fields` by default.
///
/// # Arguments
///
/// * `rename_all = "..."` - Overrides the default Serde rename policy.
/// * `deny_unknown_fields = false` - Disables strict field checking.
///
/// # Example
///
/// ```rust,ignore
/// use folio_derive::api_model;
///
/// #[api_model]
/// pub struct CommitRequest {
///     pub base_version: u64,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts the regular `utoipa::path` arguments (`get`, `put`, `path = "..."`,
/// `responses(...)`, `tag = "..."`) and registers them only when the `server` feature of the
/// consuming crate is enabled.
///
/// # Example
///
/// ```rust,ignore
/// use folio_derive::api_handler;
///
/// #[api_handler(get, path = "/health", responses((status = OK, body = HealthResponse)))]
/// pub async fn health_handler() -> impl IntoResponse {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for domain error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal` variant
///   is present.
/// * **Kinds**: A `kind()` accessor returning the variant name, suitable as a stable,
///   machine-readable error code.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping upstream errors must have a `source` field (or a field marked
///    `#[source]`/`#[from]`) and a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use folio_derive::folio_error;
/// use std::borrow::Cow;
///
/// #[folio_error]
/// pub enum StoreError {
///     #[error("Database error{}: {source}", format_context(.context))]
///     Surreal { source: surrealdb::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load() -> Result<(), StoreError> {
///     query().context("Loading layout")?;
///     Ok(())
/// }
///
/// assert_eq!(StoreError::from("boom").kind(), "Internal");
/// ```
#[proc_macro_attribute]
pub fn folio_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a vertical slice handle.
///
/// 1. Renames the annotated struct to `<Name>Inner`.
/// 2. Generates a cheap-to-clone `Arc` wrapper named `<Name>` that derefs to the inner state.
/// 3. Implements `FeatureSlice` so the handle can be registered in the API state.
///
/// # Example
/// ```rust,ignore
/// #[folio_derive::folio_slice]
/// pub struct Homepage {
///     service: LayoutService<StoreBackend>,
/// }
///
/// let slice = Homepage::new(HomepageInner { service });
/// ```
#[proc_macro_attribute]
pub fn folio_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
