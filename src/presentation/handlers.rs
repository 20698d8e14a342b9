// HTTP request handlers
use crate::application::aggregators::{habit_analytics, wallet_analytics, HabitView, WalletRange};
use crate::domain::format::{format_change, format_percent};
use crate::domain::metric::MetricSeries;
use crate::infrastructure::event_stream::{change_signal, sse_response};
use crate::infrastructure::http_response::{accepts_brotli, json_response, svg_response};
use crate::presentation::app_state::AppState;
use crate::presentation::charts::svg::to_svg;
use crate::presentation::page_controller::ControllerError;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub enum ApiError {
    Controller(ControllerError),
    Status(StatusCode),
}

impl From<ControllerError> for ApiError {
    fn from(e: ControllerError) -> Self {
        ApiError::Controller(e)
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        ApiError::Status(status)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Controller(e) => {
                let status = match &e {
                    ControllerError::NotEditing { .. } => StatusCode::CONFLICT,
                    ControllerError::UnknownPage(_) | ControllerError::UnknownWidget { .. } => {
                        StatusCode::NOT_FOUND
                    }
                    ControllerError::UnknownWidgetType { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                };
                tracing::warn!("Rejected request: {}", e);
                (status, e.to_string()).into_response()
            }
            ApiError::Status(status) => status.into_response(),
        }
    }
}

type ApiResult = Result<Response, ApiError>;

#[derive(Deserialize)]
pub struct AddWidgetRequest {
    #[serde(rename = "type")]
    pub widget_type: String,
}

#[derive(Deserialize)]
pub struct HabitQuery {
    pub view: Option<String>,
}

#[derive(Deserialize)]
pub struct WalletQuery {
    pub range: Option<String>,
}

#[derive(Serialize)]
struct HabitReport {
    view: HabitView,
    series: MetricSeries,
    /// Today's completion, rounded
    today: String,
}

#[derive(Serialize)]
struct WalletReport {
    range: WalletRange,
    series: MetricSeries,
    percent_change: f64,
    change: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current page composition
pub async fn get_page(
    Path(page): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let page = state.page(&page)?;
    let view = page.render_page(&state.feed.current(), &state.context());
    Ok(json_response(&view, accepts_brotli(&headers)).await?)
}

pub async fn begin_editing(
    Path(page): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let page = state.page(&page)?;
    page.begin_editing();
    let view = page.render_page(&state.feed.current(), &state.context());
    Ok(json_response(&view, accepts_brotli(&headers)).await?)
}

pub async fn finish_editing(
    Path(page): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let page = state.page(&page)?;
    page.finish_editing();
    let view = page.render_page(&state.feed.current(), &state.context());
    Ok(json_response(&view, accepts_brotli(&headers)).await?)
}

pub async fn add_widget(
    Path(page): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddWidgetRequest>,
) -> ApiResult {
    let page = state.page(&page)?;
    let widget = page.add_widget(&request.widget_type)?;
    Ok((StatusCode::CREATED, Json(widget)).into_response())
}

pub async fn remove_widget(
    Path((page, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let page = state.page(&page)?;
    page.remove_widget(&id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// One widget drawn as SVG
pub async fn widget_svg(
    Path((page, id)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let page = state.page(&page)?;
    let widget = page.render_widget(&id, &state.feed.current(), &state.context())?;
    Ok(svg_response(to_svg(&widget.scene), accepts_brotli(&headers)).await?)
}

/// Server-sent page views, re-rendered on every source or layout change
pub async fn stream_page(
    Path(page): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let page = state.page(&page)?;
    tracing::info!("Opening page stream for {:?}", page.slot());

    let mut signal = Box::pin(change_signal(state.feed.subscribe(), page.subscribe()));
    let views = async_stream::stream! {
        while signal.next().await.is_some() {
            yield page.render_page(&state.feed.current(), &state.context());
        }
    };
    Ok(sse_response("page", views)?)
}

pub async fn habit_report(
    Query(query): Query<HabitQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let view = match query.view.as_deref() {
        None => HabitView::default(),
        Some(token) => HabitView::parse(token).ok_or(StatusCode::BAD_REQUEST)?,
    };
    let snapshot = state.feed.current();
    let ctx = state.context();
    let series = habit_analytics(&snapshot.habits, &snapshot.habit_logs, view, ctx.today());
    let today = format_percent(series.last().map(|p| p.value).unwrap_or(0.0));

    let report = HabitReport { view, series, today };
    Ok(json_response(&report, accepts_brotli(&headers)).await?)
}

pub async fn wallet_report(
    Query(query): Query<WalletQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult {
    let range = match query.range.as_deref() {
        None => WalletRange::default(),
        Some(token) => WalletRange::parse(token).ok_or(StatusCode::BAD_REQUEST)?,
    };
    let snapshot = state.feed.current();
    let trend = wallet_analytics(&snapshot.accounts, &snapshot.transactions, range, state.context().now);

    let report = WalletReport {
        range,
        change: format_change(trend.percent_change),
        percent_change: trend.percent_change,
        series: trend.series,
    };
    Ok(json_response(&report, accepts_brotli(&headers)).await?)
}
