use axum::{Json, Router, http::StatusCode, routing::get};
use insights::{Dashboard, Facet, FetchError, HttpRecordSource, LoadState, RecordSource};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{address}")
}

async fn dataset() -> Json<Value> {
    Json(json!([
        { "region": "Africa", "intensity": 3, "topic": "oil", "relevance": 2, "likelihood": 4 },
        { "region": "Africa", "intensity": 3, "topic": "gas", "end_year": "" },
        { "region": "Asia", "intensity": 1, "topic": "oil", "sector": "" },
        { "country": "India", "intensity": "", "relevance": null }
    ]))
}

async fn broken() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Document store unavailable" })),
    )
}

#[tokio::test]
async fn test_fetch_all_records() {
    let base = serve(Router::new().route("/api/data", get(dataset))).await;

    let records = HttpRecordSource::new(&base).fetch_all_records().await.unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[3].country.as_deref(), Some("India"));
    assert_eq!(records[3].intensity, None);
}

#[tokio::test]
async fn test_non_success_status() {
    let base = serve(Router::new().route("/api/data", get(broken))).await;

    let result = HttpRecordSource::new(&base).fetch_all_records().await;

    assert!(matches!(
        result,
        Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR))
    ));
}

#[tokio::test]
async fn test_dashboard_end_to_end() {
    let base = serve(Router::new().route("/api/data", get(dataset))).await;
    let mut dashboard = Dashboard::new();

    dashboard.load(&HttpRecordSource::new(&base)).await;
    assert_eq!(dashboard.state(), &LoadState::Ready);

    {
        let view = dashboard.view().unwrap();
        let intensity: Vec<(i64, u64)> = view
            .derived
            .by_intensity
            .iter()
            .map(|b| (b.intensity, b.count))
            .collect();

        assert_eq!(intensity, vec![(1, 1), (3, 2)]);
        assert_eq!(view.derived.by_region[0].name, "Africa");
        assert_eq!(view.derived.by_region[0].value, 2);
        assert_eq!(view.derived.summary.mean_relevance, 0.5);
        assert_eq!(view.options.get(Facet::Sector).len(), 0);
    }

    dashboard.set_filter(Facet::Topic, "oil");
    let view = dashboard.view().unwrap();

    assert_eq!(view.derived.summary.total, 2);
    assert_eq!(view.derived.summary.mean_intensity, 2.0);
}

#[tokio::test]
async fn test_dashboard_unreachable_server() {
    // nothing listens on the discard port
    let mut dashboard = Dashboard::new();

    dashboard.load(&HttpRecordSource::new("http://127.0.0.1:9")).await;

    assert!(dashboard.raw().is_empty());
    assert!(matches!(dashboard.state(), LoadState::Failed(_)));
    assert!(dashboard.view().unwrap().derived.summary.mean_intensity.is_nan());
}
