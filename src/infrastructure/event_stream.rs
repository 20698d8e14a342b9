// Server-sent event streaming utilities
use axum::body::{Body, Bytes};
use axum::http::{header, Response, StatusCode};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Create a `text/event-stream` response; every item becomes one event named `event`
pub fn sse_response<S, T>(event: &'static str, stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize,
{
    let byte_stream = stream.map(move |msg| encode_event(event, &msg));

    // Events are not compressed: proxies and EventSource clients expect a plain stream
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single message to an SSE frame
fn encode_event<T: Serialize>(event: &str, data: &T) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_string(data).map_err(std::io::Error::other)?;
    Ok(Bytes::from(format!("event: {}\ndata: {}\n\n", event, json)))
}

/// Yields once immediately, then once per change on either channel
pub fn change_signal<A, B>(
    primary: watch::Receiver<A>,
    secondary: watch::Receiver<B>,
) -> impl Stream<Item = ()> + Send + 'static
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    stream::select(
        WatchStream::new(primary).map(|_| ()),
        WatchStream::from_changes(secondary).map(|_| ()),
    )
}
