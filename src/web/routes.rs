use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio_util::io::ReaderStream;
use tracing::{error, info, warn};

use super::pages;
use super::AppState;
use crate::feed::{write_feed, FeedOptions};
use crate::telegram::{get_channel_with_posts, ChannelError};

/// Buffer between the feed writer task and the response body.
const STREAM_BUFFER_BYTES: usize = 64 * 1024;

const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(health))
        .route("/rss", get(missing_channel))
        .route("/rss/", get(missing_channel))
        .route("/rss/:channel", get(channel_feed))
}

async fn home(State(state): State<AppState>) -> Html<String> {
    Html(pages::render_home(&state.config).into_string())
}

async fn health() -> &'static str {
    "ok"
}

/// Query options accepted by the feed endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    pub count: Option<usize>,
    pub title_max_length: Option<usize>,
}

async fn channel_feed(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    params: Result<Query<FeedParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!(channel = %channel, error = %rejection, "Rejected feed query");
            return error_response(StatusCode::BAD_REQUEST, &rejection.body_text());
        }
    };

    let count = params.count.map(|c| c.min(state.config.max_post_count));
    let title_max_length = params
        .title_max_length
        .filter(|len| *len > 0)
        .unwrap_or(state.config.default_title_max_length);

    let loaded = match get_channel_with_posts(&state.fetcher, &channel, count).await {
        Ok(loaded) => loaded,
        Err(e) => return channel_error_response(&channel, &e),
    };

    info!(
        channel = %loaded.info.id,
        posts = loaded.posts.len(),
        count = ?count,
        "Serving channel feed"
    );

    let options = FeedOptions {
        title_max_length,
        site_url: state.config.hosting_url.clone(),
        self_url: state.config.feed_url(&loaded.info.id),
    };

    let (mut writer, reader) = tokio::io::duplex(STREAM_BUFFER_BYTES);
    let probe = state.probe.clone();
    tokio::spawn(async move {
        if let Err(e) = write_feed(&loaded, &mut writer, &probe, &options).await {
            error!(channel = %loaded.info.id, error = %e, "Feed stream aborted");
        }
    });

    (
        [(header::CONTENT_TYPE, RSS_CONTENT_TYPE)],
        Body::from_stream(ReaderStream::new(reader)),
    )
        .into_response()
}

async fn missing_channel() -> Response {
    channel_error_response("", &ChannelError::ChannelRequired)
}

fn channel_error_response(channel: &str, err: &ChannelError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(channel = %channel, error = %err, "Failed to load channel");
    } else {
        warn!(channel = %channel, error = %err, "Channel request rejected");
    }
    error_response(status, &err.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
