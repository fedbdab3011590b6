// SPDX-License-Identifier: GPL-3.0-only

//! HTTP request handler
//!
//! A single blocking accept loop serving two routes:
//!
//! - `GET /` — trigger a capture + publish cycle and report the result
//! - `GET /test` — health check, literal `Test OK`
//!
//! A capture request moves Idle → Capturing → Publishing → Responded; a
//! failure in either stage short-circuits to an `NG` response. The HTTP
//! status is 200 for both outcomes — status lives in the body, preserving
//! the contract of the service this replaces. Error details go to the
//! log, never over HTTP.

use crate::backends::camera::FrameSource;
use crate::errors::{AppError, AppResult};
use crate::pipelines::{BlobStore, CapturePipeline, PublishPipeline, PublishedUrls};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tiny_http::{Header, Method, Response, Server};
use tracing::{info, warn};

/// Body of the `/test` health route
const TEST_BODY: &str = "Test OK";

/// Shared server state, constructed once at startup
///
/// The camera is the only mutable shared resource; the mutex serializes
/// concurrent capture requests so they never race for the device.
pub struct AppState {
    pub camera: Mutex<Box<dyn FrameSource>>,
    pub capture: CapturePipeline,
    pub store: Box<dyn BlobStore>,
}

/// Outcome marker in the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NG")]
    Ng,
}

/// Response payload for the capture route
///
/// Exactly two shapes: OK with the two URLs, or NG with a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureResult {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CaptureResult {
    pub fn ok(urls: PublishedUrls) -> Self {
        Self {
            status: Status::Ok,
            original: Some(urls.original),
            preview: Some(urls.preview),
            message: None,
        }
    }

    pub fn ng(message: impl Into<String>) -> Self {
        Self {
            status: Status::Ng,
            original: None,
            preview: None,
            message: Some(message.into()),
        }
    }
}

/// Run one capture + publish cycle against the shared state.
pub fn handle_capture(state: &AppState) -> CaptureResult {
    info!("Capture requested");

    let artifacts = {
        let mut camera = match state.camera.lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Camera mutex poisoned by an earlier panic");
                return CaptureResult::ng("camera unavailable");
            }
        };
        match state.capture.capture(camera.as_mut()) {
            Ok(artifacts) => artifacts,
            Err(e) => {
                warn!(error = %e, "Capture failed");
                return CaptureResult::ng("camera capture failed");
            }
        }
    };

    match PublishPipeline::new(state.store.as_ref()).publish(&artifacts) {
        Ok(urls) => CaptureResult::ok(urls),
        Err(e) => {
            warn!(error = %e, "Publish failed");
            CaptureResult::ng("upload failed")
        }
    }
}

/// Blocking accept loop; returns only when the listener shuts down.
pub fn run(addr: &str, state: Arc<AppState>) -> AppResult<()> {
    let server =
        Server::http(addr).map_err(|e| AppError::Other(format!("bind {} failed: {}", addr, e)))?;
    info!(addr, "HTTP server listening");

    for request in server.incoming_requests() {
        // The raw URL carries any query string; routing looks at the path only.
        let url = request.url();
        let path = url.split_once('?').map_or(url, |(path, _)| path).to_string();
        let outcome = match (request.method(), path.as_str()) {
            (&Method::Get, "/") => {
                let result = handle_capture(&state);
                request.respond(json_response(&result))
            }
            (&Method::Get, "/test") => request.respond(Response::from_string(TEST_BODY)),
            _ => request.respond(Response::from_string("").with_status_code(404)),
        };
        if let Err(e) = outcome {
            warn!(error = %e, "Failed to send response");
        }
    }

    Ok(())
}

/// Serialize a payload as a 200 JSON response.
fn json_response(result: &CaptureResult) -> Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string(result)
        .unwrap_or_else(|_| r#"{"status":"NG","message":"internal error"}"#.to_string());
    let mut response = Response::from_string(body);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response.add_header(header);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_shape_omits_message() {
        let result = CaptureResult::ok(PublishedUrls {
            original: "https://example.com/o.jpg".to_string(),
            preview: "https://example.com/p.jpg".to_string(),
        });
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();
        assert_eq!(json["status"], "OK");
        assert_eq!(json["original"], "https://example.com/o.jpg");
        assert_eq!(json["preview"], "https://example.com/p.jpg");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_ng_shape_omits_urls() {
        let result = CaptureResult::ng("camera capture failed");
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();
        assert_eq!(json["status"], "NG");
        assert_eq!(json["message"], "camera capture failed");
        assert!(json.get("original").is_none());
        assert!(json.get("preview").is_none());
    }
}
