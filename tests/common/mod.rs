//! Shared in-process HTTP collaborators for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::Query;
use axum::Json;
use axum::Router;
use serde_json::{json, Value};

use docshelf::config::ShelfConfig;
use docshelf::library::{CatalogRecord, RecordId};

pub const API_KEY: &str = "test-key";

pub const FEED: &str = "id,tenHocPhan,linkDrive\n\
                        2,Toán A1,http://x/2\n\
                        1,Vật Lý,http://x/1\n\
                        ,bad,http://x/3\n\
                        4,Đại Số Tuyến Tính,http://x/4\n";

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing is listening on.
pub async fn closed_port() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn config(base: &str) -> ShelfConfig {
    ShelfConfig {
        feed_url: format!("{base}/feed.csv"),
        api_key: API_KEY.into(),
        logo_url: format!("{base}/logo.png"),
        backend_url: base.into(),
        request_timeout_secs: 5,
        ..Default::default()
    }
}

pub fn record(id: u64) -> CatalogRecord {
    CatalogRecord {
        id: RecordId::new(id).expect("non-zero id"),
        title: format!("Doc {id}"),
        source_link: format!("http://x/{id}"),
    }
}

/// Shortening handler that answers `http://s/<last path segment>`.
///
/// Record 1 answers slowly so concurrent requests finish out of order.
pub async fn echo_shorten(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("api").map(String::as_str) != Some(API_KEY) {
        return Json(json!({ "status": "error", "message": "invalid api key" }));
    }
    let Some(target) = params.get("url") else {
        return Json(json!({ "status": "error" }));
    };
    let tail = target.rsplit('/').next().unwrap_or_default().to_string();
    if tail == "1" {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    Json(json!({ "status": "success", "shortenedUrl": format!("http://s/{tail}") }))
}
