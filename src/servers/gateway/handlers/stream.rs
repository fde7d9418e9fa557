//! Handler for the `GET /stream?magnet=<magnet link>&path=<path>` endpoint.
//!
//! The content is streamed while it's downloaded: the response body waits for
//! the pieces that have not been downloaded yet. See
//! [`range`](crate::servers::gateway::range) for the supported range
//! requests.
//!
//! Multipart responses are not generated: a request for more than one
//! satisfiable range gets `200 OK` with the whole file, where other HTTP
//! file servers answer `206 Partial Content` with a `multipart/byteranges`
//! body. Clients asking for several ranges must accept the full content.
use std::io::SeekFrom;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use tokio::io::{AsyncReadExt as _, AsyncSeekExt as _};
use tokio_util::io::ReaderStream;

use super::{GatewayState, StreamQuery};
use crate::core::error::Error;
use crate::core::services::stream::{get_file, Stream};
use crate::core::swarm::{self, File};
use crate::servers::gateway::range::{self, Selection};

/// It starts reporting the download progress of the file and streams it.
///
/// # Errors
///
/// See [`responses`](crate::servers::gateway::responses) for the status codes.
pub async fn handle(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let stream = get_file(state.client.as_ref(), &query.magnet, &query.path, state.metadata_timeout).await?;

    state.reporters.spawn(query.magnet, stream.swarm.clone(), stream.file.clone());

    serve(&stream, &headers).await
}

async fn serve(stream: &Stream, request_headers: &HeaderMap) -> Result<Response, Error> {
    let file = stream.file.as_ref();
    let length = file.length();
    let last_modified = range::last_modified(stream.creation_date);

    let mut headers: Vec<(HeaderName, String)> = vec![(header::ACCEPT_RANGES, "bytes".to_owned())];

    if let Some(date) = &last_modified {
        headers.push((header::LAST_MODIFIED, range::http_date(date)));
    }

    let (status, body) = match Selection::resolve(request_headers, length, last_modified) {
        Selection::NotModified => (StatusCode::NOT_MODIFIED, Body::empty()),
        Selection::Unsatisfiable => {
            headers.push((header::CONTENT_RANGE, format!("bytes */{length}")));

            (StatusCode::RANGE_NOT_SATISFIABLE, Body::empty())
        }
        Selection::Full => {
            headers.push((header::CONTENT_TYPE, range::content_type(file.display_path()).to_owned()));
            headers.push((header::CONTENT_LENGTH, length.to_string()));

            (StatusCode::OK, content(file, 0, length).await?)
        }
        Selection::Partial { start, end } => {
            let partial_length = end - start + 1;

            headers.push((header::CONTENT_TYPE, range::content_type(file.display_path()).to_owned()));
            headers.push((header::CONTENT_LENGTH, partial_length.to_string()));
            headers.push((header::CONTENT_RANGE, format!("bytes {start}-{end}/{length}")));

            (StatusCode::PARTIAL_CONTENT, content(file, start, partial_length).await?)
        }
    };

    Ok((status, AppendHeaders(headers), body).into_response())
}

/// A body with `length` bytes of the file from `start`.
async fn content(file: &dyn File, start: u64, length: u64) -> Result<Body, Error> {
    if length == 0 {
        return Ok(Body::empty());
    }

    let mut reader = file.reader()?;

    reader.seek(SeekFrom::Start(start)).await.map_err(swarm::Error::from)?;

    Ok(Body::from_stream(ReaderStream::new(reader.take(length))))
}
