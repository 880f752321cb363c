use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use foundation::{GeoRect, LatLon, ObstacleId};
use parking_lot::Mutex;
use planner::{
    AdminSecret, ConfirmObstaclesRequest, DeleteObstacleRequest, Geocoder, HttpPlannerService,
    NominatimGeocoder, ObstaclesRequest, PlannerService, RouteRequest, ServiceConfig,
    ServiceErrorKind,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use session::{Algorithm, Obstacle};

const SECRET: &str = "s3cret";

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Recorded {
    fn push(&self, path: &str, body: Value) {
        self.bodies.lock().push((path.to_string(), body));
    }

    fn bodies(&self) -> Vec<(String, Value)> {
        self.bodies.lock().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("ADMIN_SECRET")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == SECRET)
}

async fn route(State(rec): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    rec.push("/route", body);
    Json(json!({
        "route": [[49.0, 24.0], [49.5, 24.5], [50.0, 25.0]],
        "bounding_box": [[48.9, 23.9], [50.1, 25.1]],
    }))
}

async fn obstacles(State(rec): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    rec.push("/obstacles", body);
    Json(json!({ "obstacles": [[49.2, 24.2], { "id": 7, "lat": 49.3, "lon": 24.3 }] }))
}

async fn get_obstacles(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    Json(json!({
        "confirmed": [{ "id": 1, "lat": 49.0, "lon": 24.0 }],
        "unconfirmed": [{ "id": 2, "lat": 49.1, "lon": 24.1 }],
    }))
    .into_response()
}

async fn confirm_obstacles(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN;
    }
    rec.push("/confirm-obstacles", body);
    StatusCode::OK
}

async fn delete_obstacle(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN;
    }
    rec.push("/delete-obstacle", body);
    StatusCode::OK
}

async fn search(
    State(rec): State<Recorded>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let hits = if params.get("q").map(String::as_str) == Some("Kyiv") {
        json!([
            { "lat": "50.4501", "lon": "30.5234", "display_name": "Kyiv, Ukraine" },
            { "lat": "50.0", "lon": "30.0", "display_name": "Kyiv Oblast" },
        ])
    } else {
        json!([])
    };
    rec.queries.lock().push(params);
    Json(hits)
}

async fn spawn_server() -> (SocketAddr, Recorded) {
    let rec = Recorded::default();
    let app = Router::new()
        .route("/route", post(route))
        .route("/obstacles", post(obstacles))
        .route("/get-obstacles", get(get_obstacles))
        .route("/confirm-obstacles", post(confirm_obstacles))
        .route("/delete-obstacle", post(delete_obstacle))
        .route("/search", get(search))
        .with_state(rec.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, rec)
}

fn config(addr: SocketAddr) -> ServiceConfig {
    ServiceConfig::default().with_base_url(format!("http://{addr}"))
}

#[tokio::test]
async fn route_round_trip() {
    let (addr, rec) = spawn_server().await;
    let service = HttpPlannerService::new(config(addr)).unwrap();

    let response = service
        .plan_route(RouteRequest {
            start: LatLon::new(49.0, 24.0),
            end: LatLon::new(50.0, 25.0),
            margin: 0.2,
            algorithm: Algorithm::AntColony,
        })
        .await
        .unwrap();

    assert_eq!(response.route.len(), 3);
    assert_eq!(
        response.bounding_box.and_then(|b| b.to_rect()),
        Some(GeoRect::new(48.9, 23.9, 50.1, 25.1))
    );
    assert_eq!(
        rec.bodies(),
        vec![(
            "/route".to_string(),
            json!({
                "start": [49.0, 24.0],
                "end": [50.0, 25.0],
                "margin": 0.2,
                "algorithm": "Ant colony",
            })
        )]
    );
}

#[tokio::test]
async fn obstacle_fetch_and_save_bodies() {
    let (addr, rec) = spawn_server().await;
    let service = HttpPlannerService::new(config(addr)).unwrap();

    let fetched = service
        .sync_obstacles(ObstaclesRequest::fetch())
        .await
        .unwrap()
        .into_obstacles();
    assert_eq!(
        fetched,
        vec![
            Obstacle::drawn(LatLon::new(49.2, 24.2)),
            Obstacle::persisted(ObstacleId(7), LatLon::new(49.3, 24.3)),
        ]
    );

    service
        .sync_obstacles(ObstaclesRequest::save(vec![LatLon::new(49.2, 24.2)]))
        .await
        .unwrap();

    assert_eq!(
        rec.bodies(),
        vec![
            ("/obstacles".to_string(), json!({})),
            ("/obstacles".to_string(), json!({ "obstacles": [[49.2, 24.2]] })),
        ]
    );
}

#[tokio::test]
async fn admin_calls_carry_secret() {
    let (addr, rec) = spawn_server().await;
    let service = HttpPlannerService::new(config(addr)).unwrap();
    let secret = AdminSecret::new(SECRET);

    let lists = service.list_obstacles(secret.clone()).await.unwrap();
    assert_eq!(lists.confirmed.len(), 1);
    assert_eq!(lists.unconfirmed[0].id, ObstacleId(2));

    service
        .confirm_obstacles(
            secret.clone(),
            ConfirmObstaclesRequest {
                confirmed_ids: vec![ObstacleId(1), ObstacleId(2)],
                all_ids: vec![ObstacleId(1), ObstacleId(2)],
            },
        )
        .await
        .unwrap();
    service
        .delete_obstacle(
            secret,
            DeleteObstacleRequest {
                node_id: ObstacleId(2),
            },
        )
        .await
        .unwrap();

    assert_eq!(
        rec.bodies(),
        vec![
            (
                "/confirm-obstacles".to_string(),
                json!({ "confirmed_ids": [1, 2], "all_ids": [1, 2] })
            ),
            ("/delete-obstacle".to_string(), json!({ "node_id": 2 })),
        ]
    );
}

#[tokio::test]
async fn wrong_secret_is_forbidden() {
    let (addr, _rec) = spawn_server().await;
    let service = HttpPlannerService::new(config(addr)).unwrap();

    let err = service
        .list_obstacles(AdminSecret::new("nope"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::Status(403));
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn geocoder_sends_bounded_query() {
    let (addr, rec) = spawn_server().await;
    let geocoder = NominatimGeocoder::new(config(addr)).unwrap();

    let hit = geocoder
        .lookup("Kyiv".to_string(), GeoRect::SERVICE_REGION)
        .await
        .unwrap();
    assert_eq!(hit, Some(LatLon::new(50.4501, 30.5234)));

    let miss = geocoder
        .lookup("Atlantis".to_string(), GeoRect::SERVICE_REGION)
        .await
        .unwrap();
    assert_eq!(miss, None);

    let queries = rec.queries.lock().clone();
    assert_eq!(queries.len(), 2);
    let first = &queries[0];
    assert_eq!(first["format"], "json");
    assert_eq!(first["addressdetails"], "1");
    assert_eq!(first["bounded"], "1");
    assert_eq!(first["viewbox"], "22.14,52.38,40.23,44.38");
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let service = HttpPlannerService::new(config(addr)).unwrap();

    let err = service
        .sync_obstacles(ObstaclesRequest::fetch())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ServiceErrorKind::Transport);
}
