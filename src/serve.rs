//! Preview server for the live gallery page
//!
//! `fabric-gallery serve` → loads the sheet once, starts the server, opens the browser.
//!
//! Every filter request carries its whole filter state in the query string,
//! so requests are independent of each other.

use crate::config::GalleryConfig;
use crate::filter::{FilterOptions, FilterState};
use crate::record::Record;
use crate::render::gallery::{self, LoadMode};
use crate::render::page::{self, PageMode};
use crate::report::{html, Summary};
use crate::session::Session;
use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, error, info, warn};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    fn failure(message: impl Into<String>) -> Self {
        Self { ok: false, data: None, error: Some(message.into()) }
    }
}

#[derive(Serialize)]
struct RecordsReport<'a> {
    summary: Summary,
    records: Vec<IndexedRecord<'a>>,
}

#[derive(Serialize)]
struct IndexedRecord<'a> {
    index: usize,
    #[serde(flatten)]
    record: &'a Record,
}

/// What a route produced, before it goes on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(body: String) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, content_type: "application/json", body },
            Err(e) => {
                error!("Failed to encode response: {}", e);
                Self::internal_error()
            }
        }
    }

    fn not_found() -> Self {
        Self { status: 404, content_type: "text/plain", body: "Not found".to_string() }
    }

    fn internal_error() -> Self {
        Self {
            status: 500,
            content_type: "application/json",
            body: r#"{"ok":false,"data":null,"error":"internal error"}"#.to_string(),
        }
    }
}

/// Start server, open browser, serve the gallery
pub fn start(port: u16, session: Session, config: GalleryConfig, open_browser: bool) -> std::io::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let url = format!("http://localhost:{}", port);

    eprintln!("\n\x1b[1;32m🧵 Fabric Gallery\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Sheet: {}", config.sheet_url);
    eprintln!(
        "   {} fabrics, {} with images\n",
        session.catalog().len(),
        session.catalog().valid_count()
    );
    info!(%addr, "preview server listening");

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!("Could not open browser: {}", e);
        }
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &session, &config) {
            error!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(request: Request, session: &Session, config: &GalleryConfig) -> std::io::Result<()> {
    let method = request.method().clone();
    let url = request.url().to_string();
    let reply = route(&method, &url, session, config);
    debug!(%method, %url, status = reply.status, "request");

    let content_type = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad header"))?;
    let response = Response::from_string(reply.body)
        .with_status_code(reply.status)
        .with_header(content_type);
    request.respond(response)
}

/// Dispatch one request against the loaded session
pub fn route(method: &Method, url: &str, session: &Session, config: &GalleryConfig) -> Reply {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };

    if *method != Method::Get {
        return Reply::not_found();
    }

    match path {
        "/" => {
            let mut out = Vec::new();
            match page::write(&mut out, &html::page(session, config, PageMode::Live)) {
                Ok(()) => Reply::html(String::from_utf8_lossy(&out).into_owned()),
                Err(e) => {
                    error!("Failed to render page: {}", e);
                    Reply::internal_error()
                }
            }
        }

        "/api/gallery" => match FilterState::from_query(query) {
            Ok(state) => {
                let items = state.apply(&session.catalog().gallery());
                Reply::html(gallery::render(&items, &LoadMode::Eager))
            }
            Err(e) => bad_query(e),
        },

        "/api/records" => match FilterState::from_query(query) {
            Ok(state) => {
                let items = state.apply(&session.catalog().gallery());
                let report = RecordsReport {
                    summary: Summary::new(session.catalog(), &items),
                    records: items
                        .into_iter()
                        .map(|(index, record)| IndexedRecord { index, record })
                        .collect(),
                };
                Reply::json(200, &ApiResponse::success(report))
            }
            Err(e) => bad_query(e),
        },

        "/api/options" => Reply::json(200, &ApiResponse::<&FilterOptions>::success(session.options())),

        _ => match path.strip_prefix("/api/fabric/").map(str::parse::<usize>) {
            Some(Ok(index)) => session
                .render_detail(index)
                .map(Reply::html)
                .unwrap_or_else(Reply::not_found),
            _ => Reply::not_found(),
        },
    }
}

fn bad_query(e: serde_urlencoded::de::Error) -> Reply {
    warn!("Bad filter query: {}", e);
    Reply::json(400, &ApiResponse::failure(format!("bad filter query: {}", e)))
}
