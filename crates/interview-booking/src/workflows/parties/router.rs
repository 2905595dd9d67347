use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;

use super::domain::{Party, PartyId, PartyRole};
use super::repository::PartyRepository;
use super::service::PartyRegistryService;
use crate::error::AppError;

/// Registry routes for every role: `POST /<role>`, `GET|PUT|DELETE /<role>/:id`, `GET /<roles>`.
pub fn party_router<R>(service: Arc<PartyRegistryService<R>>) -> Router
where
    R: PartyRepository + 'static,
{
    PartyRole::ALL
        .into_iter()
        .fold(Router::new(), |router, role| {
            router
                .route(
                    &format!("/{}", role.path_segment()),
                    post(register_handler::<R>).layer(Extension(role)),
                )
                .route(
                    &format!("/{}/:id", role.path_segment()),
                    get(get_handler::<R>)
                        .put(update_handler::<R>)
                        .delete(delete_handler::<R>)
                        .layer(Extension(role)),
                )
                .route(
                    &format!("/{}", role.collection_segment()),
                    get(list_handler::<R>).layer(Extension(role)),
                )
        })
        .with_state(service)
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<PartyRegistryService<R>>>,
    Extension(role): Extension<PartyRole>,
    body: Result<Json<Party>, JsonRejection>,
) -> Result<Response, AppError>
where
    R: PartyRepository + 'static,
{
    let Json(party) = body?;
    let stored = service.register(role, party)?;
    let payload = json!({
        "message": format!("{} Created Successfully", role.label()),
        "party": stored,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<PartyRegistryService<R>>>,
    Extension(role): Extension<PartyRole>,
    Path(id): Path<i64>,
) -> Result<Response, AppError>
where
    R: PartyRepository + 'static,
{
    let party = service.get(role, PartyId(id))?;
    Ok((StatusCode::OK, Json(party)).into_response())
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<PartyRegistryService<R>>>,
    Extension(role): Extension<PartyRole>,
) -> Result<Response, AppError>
where
    R: PartyRepository + 'static,
{
    let parties = service.list(role)?;
    Ok((StatusCode::OK, Json(parties)).into_response())
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<PartyRegistryService<R>>>,
    Extension(role): Extension<PartyRole>,
    Path(id): Path<i64>,
    body: Result<Json<Party>, JsonRejection>,
) -> Result<Response, AppError>
where
    R: PartyRepository + 'static,
{
    let Json(party) = body?;
    let stored = service.update(role, PartyId(id), party)?;
    let payload = json!({
        "message": format!("{} Details Updated Successfully", role.label()),
        "party": stored,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<PartyRegistryService<R>>>,
    Extension(role): Extension<PartyRole>,
    Path(id): Path<i64>,
) -> Result<Response, AppError>
where
    R: PartyRepository + 'static,
{
    service.delete(role, PartyId(id))?;
    let payload = json!({
        "message": format!("{} was deleted Successfully", role.label()),
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}
