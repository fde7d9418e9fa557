//! HTTP conditional and range requests for the streamed files.
//!
//! Supported request headers:
//!
//! - `If-Modified-Since`: `304 Not Modified` when the torrent was not created
//!   after that date.
//! - `Range`: one `bytes` range. `start-end`, `start-` and the suffix form
//!   `-length` are accepted. The end is clamped to the file length.
//! - `If-Range`: the range is only honored if the date matches the
//!   last modification date. Entity tags are never matched, the gateway does
//!   not generate them.
//!
//! Requests with more than one satisfiable range get the whole file. Ranges
//! that cannot be parsed, or that start after the end of the file, get
//! `416 Range Not Satisfiable`.
//!
//! The last modification date is the creation date of the torrent. Torrents
//! without a creation date are served without `Last-Modified`, and the date
//! conditions are ignored for them.
use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const BYTES_UNIT: &str = "bytes=";

/// What part of the file the response contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Full,
    /// Inclusive bounds.
    Partial {
        start: u64,
        end: u64,
    },
    Unsatisfiable,
    NotModified,
}

impl Selection {
    /// Resolves the request headers against a file of `length` bytes.
    #[must_use]
    pub fn resolve(headers: &HeaderMap, length: u64, last_modified: Option<DateTime<Utc>>) -> Self {
        if let (Some(last_modified), Some(since)) = (last_modified, header_date(headers, &header::IF_MODIFIED_SINCE)) {
            if last_modified <= since {
                return Self::NotModified;
            }
        }

        let Some(range) = headers.get(header::RANGE).map(|value| value.to_str().unwrap_or_default()) else {
            return Self::Full;
        };

        if headers.contains_key(header::IF_RANGE) {
            let matches = match (last_modified, header_date(headers, &header::IF_RANGE)) {
                (Some(last_modified), Some(date)) => last_modified == date,
                _ => false,
            };

            if !matches {
                return Self::Full;
            }
        }

        let Some(ranges) = parse(range, length) else {
            return Self::Unsatisfiable;
        };

        match ranges.as_slice() {
            [] => Self::Unsatisfiable,
            [(start, end)] => Self::Partial { start: *start, end: *end },
            _ => Self::Full,
        }
    }
}

/// Parses a `Range` header into the satisfiable inclusive ranges. It returns
/// `None` if the header is malformed.
fn parse(range: &str, length: u64) -> Option<Vec<(u64, u64)>> {
    let parts = range.trim().strip_prefix(BYTES_UNIT)?;

    let mut ranges = Vec::new();

    for part in parts.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let (start, end) = part.split_once('-')?;
        let (start, end) = (start.trim(), end.trim());

        if start.is_empty() {
            let suffix: u64 = end.parse().ok()?;

            if suffix > 0 && length > 0 {
                ranges.push((length - suffix.min(length), length - 1));
            }

            continue;
        }

        let start: u64 = start.parse().ok()?;

        let end = if end.is_empty() {
            length.saturating_sub(1)
        } else {
            let end: u64 = end.parse().ok()?;

            if end < start {
                return None;
            }

            end.min(length.saturating_sub(1))
        };

        if start < length {
            ranges.push((start, end));
        }
    }

    Some(ranges)
}

fn header_date(headers: &HeaderMap, name: &header::HeaderName) -> Option<DateTime<Utc>> {
    let value = headers.get(name)?.to_str().ok()?;

    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// The last modification date of a torrent created at `creation_date`
/// seconds since the Unix Epoch.
#[must_use]
pub fn last_modified(creation_date: i64) -> Option<DateTime<Utc>> {
    if creation_date <= 0 {
        return None;
    }

    DateTime::from_timestamp(creation_date, 0)
}

/// Formats a date as an HTTP date.
#[must_use]
pub fn http_date(date: &DateTime<Utc>) -> String {
    date.format(HTTP_DATE_FORMAT).to_string()
}

/// The media type for a file name, by its extension.
#[must_use]
pub fn content_type(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "nfo" => "text/plain; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "srt" => "application/x-subrip",
        "vtt" => "text/vtt; charset=utf-8",
        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "ogv" => "video/ogg",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "epub" => "application/epub+zip",
        "zip" => "application/zip",
        "iso" => "application/x-iso9660-image",
        _ => "application/octet-stream",
    }
}
