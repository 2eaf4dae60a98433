use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::Settings;
use crate::server::api::{self, ApiError};
use crate::settlement::SettlementError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Dispatch one request. `path` may carry a query string, which is ignored.
pub fn route_request(method: &str, path: &str, body: &str, settings: &Settings) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    let result = match (method, path) {
        ("GET", "/") => {
            return HttpResponse {
                status_code: 200,
                status_text: "OK",
                content_type: "text/html; charset=utf-8",
                body: index_html(),
            }
        }
        ("GET", "/api/health") => api::health_payload(),
        ("GET", "/api/units") => api::units_payload(),
        ("POST", "/api/parse") => api::parse_payload(body),
        ("POST", "/api/reconcile") => api::reconcile_payload(body, settings),
        ("POST", "/api/settle") => api::settle_payload(body, settings),
        ("POST", "/api/raw-dump") => api::raw_dump_payload(body),
        (_, "/" | "/api/health" | "/api/units" | "/api/parse" | "/api/reconcile" | "/api/settle" | "/api/raw-dump") => {
            return error_response(405, "Method Not Allowed", "Method not allowed")
        }
        _ => return error_response(404, "Not Found", "Route not found"),
    };
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(err) => api_error_response(err),
    }
}

fn api_error_response(err: ApiError) -> HttpResponse {
    match err {
        ApiError::Parse(_) | ApiError::Dump(_) => error_response(400, "Bad Request", &err.to_string()),
        ApiError::Validation(validation) => validation_error_response(400, "Bad Request", validation),
        ApiError::Settlement(SettlementError::Config(config)) => {
            tracing::error!(error = %config, "settlement configuration error");
            error_response(500, "Internal Server Error", &config.to_string())
        }
        ApiError::Settlement(settlement) => error_response(422, "Unprocessable Entity", &settlement.to_string()),
        ApiError::Serialize(_) => error_response(500, "Internal Server Error", &err.to_string()),
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback = "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>crsplit</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    textarea { width: 100%; min-height: 220px; box-sizing: border-box; font-family: monospace; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>crsplit</h1>
  <p>Paste a combat report and parse it. Settlement requests go to <code>POST /api/reconcile</code>.</p>
  <textarea id="report"></textarea>
  <div><button id="parse-btn">POST /api/parse</button></div>
  <pre id="output">Ready.</pre>
  <script>
    const output = document.getElementById('output');
    document.getElementById('parse-btn').addEventListener('click', async () => {
      const response = await fetch('/api/parse', { method: 'POST', body: document.getElementById('report').value });
      output.textContent = 'HTTP ' + response.status + '\n' + await response.text();
    });
  </script>
</body>
</html>
"#
    .to_string()
}
