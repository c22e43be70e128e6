use crate::Homepage;
use crate::catalog::{SectionId, entries};
use crate::error::{ConflictBody, HomepageError};
use crate::model::{Layout, LayoutVersion};
use crate::render::{RenderedView, visible_sections};
use crate::service::LayoutService;
use crate::store::StoreBackend;
use crate::validator::CandidateSection;
use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use folio_derive::{api_handler, api_model};
use folio_kernel::domain::constants::HOMEPAGE_TAG;
use folio_kernel::security::AdminAccess;
use folio_kernel::server::{ApiJson, ApiState, ErrorBody};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// A catalog entry as exposed to the dashboard.
#[api_model]
pub struct CatalogEntryView {
    pub id: SectionId,
    pub label: String,
    /// Required sections cannot be hidden.
    pub required: bool,
}

#[api_model]
pub struct SectionView {
    pub id: SectionId,
    pub label: String,
    pub required: bool,
    pub order: u32,
    pub visible: bool,
}

/// The committed layout; `version` is the base for the next commit.
#[api_model]
pub struct LayoutView {
    pub version: LayoutVersion,
    pub updated_at: DateTime<Utc>,
    pub sections: Vec<SectionView>,
}

impl From<Layout> for LayoutView {
    fn from(layout: Layout) -> Self {
        let sections = layout
            .sections
            .iter()
            .map(|s| {
                let entry = s.id.entry();
                SectionView {
                    id: s.id,
                    label: entry.label.to_owned(),
                    required: entry.required,
                    order: s.order,
                    visible: s.visible,
                }
            })
            .collect();
        Self { version: layout.version, updated_at: layout.updated_at, sections }
    }
}

/// Full candidate layout and the version it was edited from.
#[api_model]
pub struct CommitRequest {
    pub base_version: LayoutVersion,
    pub sections: Vec<CandidateSection>,
}

#[api_model]
pub struct ResetRequest {
    pub base_version: LayoutVersion,
}

fn service(state: &ApiState) -> Result<&LayoutService<StoreBackend>, HomepageError> {
    state
        .try_get_slice::<Homepage>()
        .map(|homepage| &homepage.service)
        .map_err(|err| HomepageError::from(err.to_string()))
}

fn layout_response(layout: Layout) -> impl IntoResponse {
    (
        [
            (header::ETAG, format!("\"{}\"", layout.version)),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        Json(LayoutView::from(layout)),
    )
}

#[api_handler(
    get,
    path = "/homepage/catalog",
    responses(
        (status = OK, description = "Sections available to the layout", body = Vec<CatalogEntryView>),
    ),
    tag = HOMEPAGE_TAG,
)]
pub(crate) async fn catalog_handler() -> Json<Vec<CatalogEntryView>> {
    Json(
        entries()
            .iter()
            .map(|e| CatalogEntryView { id: e.id, label: e.label.to_owned(), required: e.required })
            .collect(),
    )
}

#[api_handler(
    get,
    path = "/homepage/layout",
    responses(
        (status = OK, description = "Current layout", body = LayoutView),
        (status = SERVICE_UNAVAILABLE, description = "Layout store unavailable", body = ErrorBody),
    ),
    tag = HOMEPAGE_TAG,
)]
pub(crate) async fn read_layout_handler(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, HomepageError> {
    let layout = service(&state)?.read().await?;
    Ok(layout_response(layout))
}

#[api_handler(
    put,
    path = "/homepage/layout",
    request_body = CommitRequest,
    responses(
        (status = OK, description = "Layout committed", body = LayoutView),
        (status = UNAUTHORIZED, description = "Missing administrator credentials", body = ErrorBody),
        (status = FORBIDDEN, description = "Administrator token rejected", body = ErrorBody),
        (status = BAD_REQUEST, description = "Body is not valid JSON", body = ErrorBody),
        (status = PRECONDITION_FAILED, description = "Base version is stale", body = ConflictBody),
        (status = UNPROCESSABLE_ENTITY, description = "Candidate violates a layout rule or the body shape", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "Layout store unavailable", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = HOMEPAGE_TAG,
)]
pub(crate) async fn commit_layout_handler(
    State(state): State<ApiState>,
    AdminAccess(admin): AdminAccess,
    ApiJson(request): ApiJson<CommitRequest>,
) -> Result<impl IntoResponse, HomepageError> {
    let layout = service(&state)?.commit_entries(&request.sections, request.base_version).await?;
    info!(subject = %admin.subject, version = %layout.version, "Homepage layout updated");
    Ok(layout_response(layout))
}

#[api_handler(
    post,
    path = "/homepage/layout/reset",
    request_body = ResetRequest,
    responses(
        (status = OK, description = "Catalog defaults committed", body = LayoutView),
        (status = UNAUTHORIZED, description = "Missing administrator credentials", body = ErrorBody),
        (status = FORBIDDEN, description = "Administrator token rejected", body = ErrorBody),
        (status = PRECONDITION_FAILED, description = "Base version is stale", body = ConflictBody),
        (status = SERVICE_UNAVAILABLE, description = "Layout store unavailable", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = HOMEPAGE_TAG,
)]
pub(crate) async fn reset_layout_handler(
    State(state): State<ApiState>,
    AdminAccess(admin): AdminAccess,
    ApiJson(request): ApiJson<ResetRequest>,
) -> Result<impl IntoResponse, HomepageError> {
    let layout = service(&state)?.reset(request.base_version).await?;
    info!(subject = %admin.subject, version = %layout.version, "Homepage layout reset");
    Ok(layout_response(layout))
}

#[api_handler(
    get,
    path = "/homepage/sections",
    responses(
        (status = OK, description = "Visible sections in display order", body = RenderedView),
    ),
    tag = HOMEPAGE_TAG,
)]
pub(crate) async fn sections_handler(
    State(state): State<ApiState>,
) -> Result<Json<RenderedView>, HomepageError> {
    Ok(Json(visible_sections(service(&state)?).await))
}

/// Homepage routes, relative to the API prefix.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(catalog_handler))
        .routes(routes!(read_layout_handler, commit_layout_handler))
        .routes(routes!(reset_layout_handler))
        .routes(routes!(sections_handler))
}
