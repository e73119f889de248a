//! HTTP client integration tests.
//!
//! Each test starts a local axum server that imitates the VizieR `asu-tsv`
//! endpoint or the SkyServer `getjpeg` endpoint and points the real client at
//! it.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

use stamps_core::testing::fixtures::jpeg_bytes;
use stamps_core::{
    fetch_catalog_to_csv, read_catalog, CatalogConfig, CatalogError, CatalogSource, CutoutConfig,
    CutoutOutcome, CutoutRequest, CutoutService, SkyServerClient, VizierClient,
};

const VIZIER_BODY: &str = "#\n\
# VizieR Astronomical Server\n\
#RESOURCE=yCat_7237\n\
\n\
PGC\tRAJ2000\tDEJ2000\tOType\tMType\tlogD25\tPA\n\
\t\"h:m:s\"\t\"d:m:s\"\t\t\t[0.1arcmin]\tdeg\n\
-------\t-----------\t---------\t-\t-----\t-----\t-----\n\
2557\t00 42 44.35\t+41 16 08.6\tG\tSb\t2.29\t35.0\n\
5818\t01 33 50.89\t+30 39 36.6\tG\tSc\t1.79\t22.5\n\
12345\t10 00 00.00\t-05 30 00.0\tG\t\t1.02\t\n";

/// Start a server on an ephemeral port and return its address.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    addr
}

async fn asu_tsv(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("-source").map(String::as_str) != Some("VII/237/pgc") {
        return (StatusCode::BAD_REQUEST, "unknown source").into_response();
    }
    VIZIER_BODY.into_response()
}

async fn getjpeg(Query(params): Query<HashMap<String, String>>) -> Response {
    let size: u32 = params
        .get("width")
        .and_then(|w| w.parse().ok())
        .unwrap_or(64);
    // Negative declinations are outside the simulated footprint.
    match params.get("dec").and_then(|d| d.parse::<f64>().ok()) {
        Some(dec) if dec >= 0.0 => {
            ([("content-type", "image/jpeg")], jpeg_bytes(size)).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "outside footprint").into_response(),
    }
}

fn cutout_request(dir: &TempDir, pgc: u64, dec: f64) -> CutoutRequest {
    CutoutRequest {
        pgc,
        ra: 10.68,
        dec,
        plate_scale: 1.125,
        image_size: 32,
        output_path: dir.path().join(format!("glx_{}_0.0_NA.jpg", pgc)),
        verbose: true,
    }
}

#[tokio::test]
async fn test_vizier_download_to_csv() {
    let addr = serve(Router::new().route("/viz-bin/asu-tsv", get(asu_tsv))).await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hyperleda.csv");

    let client = VizierClient::new(
        CatalogConfig::default().with_base_url(format!("http://{}/viz-bin", addr)),
    )
    .unwrap();
    let rows = assert_ok!(fetch_catalog_to_csv(&client, &path).await);
    assert_eq!(rows, 3);

    let records = read_catalog(&path).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].pgc, 2557);
    assert!((records[0].ra - 10.684792).abs() < 1e-5);
    assert!((records[0].dec - 41.269056).abs() < 1e-5);
    assert!((records[2].dec + 5.5).abs() < 1e-9);
    assert_eq!(records[2].morph_type, None);
    assert_eq!(records[2].position_angle, None);
}

#[tokio::test]
async fn test_vizier_error_status_is_fatal() {
    let addr = serve(Router::new().route("/viz-bin/asu-tsv", get(asu_tsv))).await;
    let config = CatalogConfig {
        source: "VII/999/none".to_string(),
        ..CatalogConfig::default()
    }
    .with_base_url(format!("http://{}/viz-bin", addr));
    let client = VizierClient::new(config).unwrap();

    let result = client.fetch_table().await;
    assert!(matches!(result, Err(CatalogError::ApiError { status: 400, .. })));
}

#[tokio::test]
async fn test_skyserver_saves_cutout() {
    let addr = serve(Router::new().route("/ImgCutout/getjpeg", get(getjpeg))).await;
    let dir = TempDir::new().unwrap();
    let client = SkyServerClient::new(
        &CutoutConfig::default().with_base_url(format!("http://{}/ImgCutout", addr)),
    )
    .unwrap();

    let request = cutout_request(&dir, 2557, 41.27);
    let outcome = assert_ok!(client.fetch(&request).await);

    match outcome {
        CutoutOutcome::Saved { path, bytes } => {
            assert_eq!(path, request.output_path);
            assert_eq!(bytes, std::fs::metadata(&path).unwrap().len());
            let image = image::open(&path).unwrap();
            assert_eq!((image.width(), image.height()), (32, 32));
        }
        other => panic!("expected saved cutout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_skyserver_http_error_is_skipped() {
    let addr = serve(Router::new().route("/ImgCutout/getjpeg", get(getjpeg))).await;
    let dir = TempDir::new().unwrap();
    let client = SkyServerClient::new(
        &CutoutConfig::default().with_base_url(format!("http://{}/ImgCutout", addr)),
    )
    .unwrap();

    let request = cutout_request(&dir, 12345, -5.5);
    let outcome = assert_ok!(client.fetch(&request).await);

    assert_eq!(
        outcome,
        CutoutOutcome::Skipped {
            reason: "HTTP 404".to_string()
        }
    );
    assert!(!request.output_path.exists());
}

#[tokio::test]
async fn test_skyserver_unwritable_output_is_error() {
    let addr = serve(Router::new().route("/ImgCutout/getjpeg", get(getjpeg))).await;
    let dir = TempDir::new().unwrap();
    let client = SkyServerClient::new(
        &CutoutConfig::default().with_base_url(format!("http://{}/ImgCutout", addr)),
    )
    .unwrap();

    let mut request = cutout_request(&dir, 2557, 41.27);
    request.output_path = dir.path().join("missing").join("glx_2557_0.0_NA.jpg");

    assert_err!(client.fetch(&request).await);
}
