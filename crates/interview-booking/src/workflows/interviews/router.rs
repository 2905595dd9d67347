use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{InterviewId, InterviewRequest};
use super::repository::InterviewRepository;
use super::service::InterviewLifecycleService;
use crate::error::AppError;
use crate::workflows::notifications::NotificationPublisher;
use crate::workflows::parties::PartyDirectory;

/// Router builder exposing the interview booking endpoints.
pub fn interview_router<S, P>(service: Arc<InterviewLifecycleService<S, P>>) -> Router
where
    S: InterviewRepository + PartyDirectory + 'static,
    P: NotificationPublisher + 'static,
{
    Router::new()
        .route("/interview", post(create_handler::<S, P>))
        .route(
            "/interview/:id",
            get(get_handler::<S, P>)
                .put(reschedule_handler::<S, P>)
                .delete(delete_handler::<S, P>),
        )
        .route("/interviews", get(list_handler::<S, P>))
        .with_state(service)
}

pub(crate) async fn create_handler<S, P>(
    State(service): State<Arc<InterviewLifecycleService<S, P>>>,
    body: Result<Json<InterviewRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: InterviewRepository + PartyDirectory + 'static,
    P: NotificationPublisher + 'static,
{
    let Json(request) = body?;
    let interview = service.create(request)?;
    let payload = json!({
        "message": "Interview Created Successfully",
        "interview": interview,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn reschedule_handler<S, P>(
    State(service): State<Arc<InterviewLifecycleService<S, P>>>,
    Path(id): Path<i64>,
    body: Result<Json<InterviewRequest>, JsonRejection>,
) -> Result<Response, AppError>
where
    S: InterviewRepository + PartyDirectory + 'static,
    P: NotificationPublisher + 'static,
{
    let Json(request) = body?;
    let interview = service.reschedule(InterviewId(id), request)?;
    let payload = json!({
        "message": "Interview Details Updated Successfully",
        "interview": interview,
    });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn delete_handler<S, P>(
    State(service): State<Arc<InterviewLifecycleService<S, P>>>,
    Path(id): Path<i64>,
) -> Result<Response, AppError>
where
    S: InterviewRepository + PartyDirectory + 'static,
    P: NotificationPublisher + 'static,
{
    service.delete(InterviewId(id))?;
    let payload = json!({ "message": "Interview was deleted Successfully" });
    Ok((StatusCode::OK, Json(payload)).into_response())
}

pub(crate) async fn get_handler<S, P>(
    State(service): State<Arc<InterviewLifecycleService<S, P>>>,
    Path(id): Path<i64>,
) -> Result<Response, AppError>
where
    S: InterviewRepository + PartyDirectory + 'static,
    P: NotificationPublisher + 'static,
{
    let interview = service.get(InterviewId(id))?;
    Ok((StatusCode::OK, Json(interview)).into_response())
}

pub(crate) async fn list_handler<S, P>(
    State(service): State<Arc<InterviewLifecycleService<S, P>>>,
) -> Result<Response, AppError>
where
    S: InterviewRepository + PartyDirectory + 'static,
    P: NotificationPublisher + 'static,
{
    let interviews = service.list()?;
    Ok((StatusCode::OK, Json(interviews)).into_response())
}
