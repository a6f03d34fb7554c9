//! HTTP routes
//!
//! | method | path | success |
//! |---|---|---|
//! | GET | `/agendas/{id}/preview` | 200 preview |
//! | POST | `/agendas/{id}/commit` | 202 job |
//! | POST | `/meetings/{id}/date-change` | 202 job |
//! | GET | `/jobs/{id}` | 200 job |
//!
//! Every failure answers `{"error": "..."}`.

use docname_core::JobId;
use docname_jobs::{CommitRequest, DateChangeRequest, JobRunner, RequestError};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Largest accepted request body
const MAX_BODY_BYTES: u64 = 256 * 1024;

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason
    pub error: String,
}

/// All routes, with rejections turned into JSON errors
pub fn routes(
    runner: JobRunner,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let preview = warp::path!("agendas" / String / "preview")
        .and(warp::get())
        .and(with_runner(runner.clone()))
        .and_then(handle_preview);

    let commit = warp::path!("agendas" / String / "commit")
        .and(warp::post())
        .and(json_body::<CommitRequest>())
        .and(with_runner(runner.clone()))
        .and_then(handle_commit);

    let date_change = warp::path!("meetings" / String / "date-change")
        .and(warp::post())
        .and(json_body::<DateChangeRequest>())
        .and(with_runner(runner.clone()))
        .and_then(handle_date_change);

    let job = warp::path!("jobs" / String)
        .and(warp::get())
        .and(with_runner(runner))
        .and_then(handle_job);

    preview
        .or(commit)
        .or(date_change)
        .or(job)
        .with(warp::trace::request())
        .recover(handle_rejection)
}

fn with_runner(runner: JobRunner) -> impl Filter<Extract = (JobRunner,), Error = Infallible> + Clone {
    warp::any().map(move || runner.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: for<'de> Deserialize<'de> + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

async fn handle_preview(agenda: String, runner: JobRunner) -> Result<Response, Infallible> {
    Ok(match runner.preview(&agenda.into()).await {
        Ok(preview) => warp::reply::json(&preview).into_response(),
        Err(err) => request_error(&err),
    })
}

async fn handle_commit(
    agenda: String,
    request: CommitRequest,
    runner: JobRunner,
) -> Result<Response, Infallible> {
    Ok(match runner.submit_commit(agenda.into(), request).await {
        Ok(job) => accepted(&job),
        Err(err) => request_error(&err),
    })
}

async fn handle_date_change(
    meeting: String,
    request: DateChangeRequest,
    runner: JobRunner,
) -> Result<Response, Infallible> {
    Ok(match runner.submit_date_change(meeting.into(), request).await {
        Ok(job) => accepted(&job),
        Err(err) => request_error(&err),
    })
}

async fn handle_job(id: String, runner: JobRunner) -> Result<Response, Infallible> {
    let Ok(id) = id.parse::<JobId>() else {
        return Ok(error_reply(StatusCode::BAD_REQUEST, format!("invalid job id: {id}")));
    };
    Ok(match runner.job(id).await {
        Ok(job) => warp::reply::json(&job).into_response(),
        Err(err) => request_error(&err),
    })
}

fn accepted<T: Serialize>(body: &T) -> Response {
    warp::reply::with_status(warp::reply::json(body), StatusCode::ACCEPTED).into_response()
}

fn request_error(err: &RequestError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(%err, "request failed");
    } else {
        tracing::debug!(%err, %status, "request rejected");
    }
    error_reply(status, err.to_string())
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: message.into(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("invalid body: {e}"))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "body too large".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "content length required".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::BAD_REQUEST, "expected a JSON body".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        tracing::error!(?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    };
    Ok(error_reply(status, message))
}
