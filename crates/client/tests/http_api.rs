//! `HttpConeApi` against a local axum stand-in for the cone-mosaic service.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use cone_viewer_client::{ApiError, ClientConfig, ConeApi, ExportBackend, HttpConeApi};
use cone_viewer_core::model::Filters;
use parking_lot::Mutex;
use serde_json::json;

type Seen = Arc<Mutex<Vec<String>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });
    format!("http://{addr}")
}

fn backend(seen: Seen) -> Router {
    Router::new()
        .route(
            "/patients",
            get(|| async {
                Json(json!([
                    { "subject_id": "S042", "age": 27, "eye": "OD" },
                    { "subject_id": "S077", "age": null }
                ]))
            }),
        )
        .route(
            "/plot-data",
            get(|State(seen): State<Seen>, RawQuery(q): RawQuery| async move {
                seen.lock().push(q.unwrap_or_default());
                Json(json!({ "x": [1.0, 2.0], "y": [3.0, 4.0], "cone_type": ["L", "M"] }))
            }),
        )
        .route(
            "/metadata",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/eccentricity-ranges",
            get(|| async { Json(json!({ "unexpected": true })) }),
        )
        .route(
            "/cones/export",
            get(|| async {
                (
                    [(
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"S042_temporal_L_cones.csv\"",
                    )],
                    "x,y,cone_spectral_type\n1,3,L\n",
                )
                    .into_response()
            }),
        )
        .with_state(seen)
}

fn config(base_url: String, export_backend: ExportBackend) -> ClientConfig {
    ClientConfig {
        base_url,
        plot_limit: 500,
        export_backend,
        ..ClientConfig::default()
    }
}

fn filters() -> Filters {
    Filters::new("S042", "temporal", ["L", "M"])
        .expect("complete selection")
        .with_eccentricity(Some(0.0), Some(5.0))
}

#[tokio::test]
async fn plot_data_query_repeats_cone_types_and_sends_limit() {
    let seen = Seen::default();
    let base = serve(backend(Arc::clone(&seen))).await;
    let api = HttpConeApi::new(&config(base, ExportBackend::ServerRoute)).expect("client");

    let data = api.plot_data(&filters()).await.expect("plot data");
    assert_eq!(data.len(), 2);

    let queries = seen.lock().clone();
    assert_eq!(
        queries,
        ["subject_id=S042&meridian=temporal&cone_spectral_type=L&cone_spectral_type=M\
          &eccentricity_min=0&eccentricity_max=5&limit=500"]
    );
}

#[tokio::test]
async fn patients_decode_with_optional_eye() {
    let base = serve(backend(Seen::default())).await;
    let api = HttpConeApi::new(&config(base, ExportBackend::ServerRoute)).expect("client");
    let patients = api.patients().await.expect("patients");
    assert_eq!(patients.len(), 2);
    assert_eq!(patients[0].display_id(), "S042R");
    assert_eq!(patients[1].display_id(), "S077");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let base = serve(backend(Seen::default())).await;
    let api = HttpConeApi::new(&config(base, ExportBackend::ServerRoute)).expect("client");
    let err = api.metadata(&filters()).await.expect_err("500 must reject");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn wrong_shape_is_a_decode_error() {
    let base = serve(backend(Seen::default())).await;
    let api = HttpConeApi::new(&config(base, ExportBackend::ServerRoute)).expect("client");
    let err = api
        .eccentricity_ranges("S042", "temporal")
        .await
        .expect_err("missing ranges field");
    assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);

    let api = HttpConeApi::new(&config(format!("http://{addr}"), ExportBackend::ServerRoute))
        .expect("client");
    let err = api.patients().await.expect_err("nothing is listening");
    assert!(matches!(err, ApiError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn server_export_uses_content_disposition_name() {
    let base = serve(backend(Seen::default())).await;
    let api = HttpConeApi::new(&config(base, ExportBackend::ServerRoute)).expect("client");
    let export = api.export_csv(&filters(), "S042R").await.expect("export");
    assert_eq!(export.file_name, "S042_temporal_L_cones.csv");
    assert!(export.bytes.starts_with(b"x,y,cone_spectral_type"));
}

#[tokio::test]
async fn storage_export_fetches_display_id_file() {
    let app = Router::new().route(
        "/bucket/S042R.csv",
        get(|| async { "x,y,cone_spectral_type\n" }),
    );
    let base = serve(app).await;
    let api = HttpConeApi::new(&config(
        "http://127.0.0.1:9".into(),
        ExportBackend::ObjectStorage {
            base_url: format!("{base}/bucket"),
        },
    ))
    .expect("client");
    let export = api.export_csv(&filters(), "S042R").await.expect("export");
    assert_eq!(export.file_name, "S042R.csv");
}

#[tokio::test]
async fn disabled_export_never_hits_the_network() {
    let api = HttpConeApi::new(&config("http://127.0.0.1:9".into(), ExportBackend::Disabled))
        .expect("client");
    let err = api.export_csv(&filters(), "S042R").await.expect_err("disabled");
    assert!(matches!(err, ApiError::ExportDisabled));
}
