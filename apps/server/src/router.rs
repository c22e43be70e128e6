use axum::Router;
use folio::kernel::prelude::ApiState;
use folio::server::router::{homepage_router, system_router};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

/// Prefix of every feature route.
pub const API_PREFIX: &str = "/api";
/// Location of the Scalar API reference.
pub const DOCS_PATH: &str = "/docs";

#[derive(OpenApi)]
#[openapi(
    info(title = "Folio API", description = "Homepage layout configuration service"),
    modifiers(&BearerAuth)
)]
struct ApiDoc;

/// Registers the `bearer` scheme referenced by administrator routes.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let api = ApiDoc::openapi();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(system_router())
        .nest(API_PREFIX, homepage_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url(DOCS_PATH, api_doc);

    Router::new().merge(openapi_routes).merge(scalar_routes)
}
