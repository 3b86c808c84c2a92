use axum::{
    routing::{get, patch, post},
    Extension, Router,
};
use folias_server::{api, migrator};
use sea_orm::{Database, DatabaseConnection};
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    folias_server::telemetry::init_telemetry("folias-server");

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    // Fail fast on missing auth config rather than on the first login
    std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");

    // Database Connection
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    use sea_orm_migration::MigratorTrait;
    migrator::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    // Initialize Metrics
    folias_server::metrics::init_metrics(&db).await;

    let app = app(db, prometheus_layer, metric_handle);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn welcome() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({"message": "Welcome to Folias API"}))
}

async fn health_check() -> &'static str {
    "OK"
}

fn app(
    db: DatabaseConnection,
    prometheus_layer: axum_prometheus::PrometheusMetricLayer<'static>,
    metric_handle: metrics_exporter_prometheus::PrometheusHandle,
) -> Router {
    let auth_routes = Router::new()
        .route("/users/register", post(api::auth::register))
        .route("/users/login", post(api::auth::login));

    let protected_routes = Router::new()
        .route("/users/me", get(api::user::get_me))
        .route("/users/update-me", patch(api::user::update_me))
        .route(
            "/plants",
            get(api::plant::list_plants).post(api::plant::create_plant),
        )
        .route("/plants/to-water", get(api::plant::plants_to_water))
        .route("/plants/by-room/:room_id", get(api::plant::plants_by_room))
        .route("/plants/by-health/:status", get(api::plant::plants_by_health))
        .route(
            "/plants/:id",
            get(api::plant::get_plant)
                .patch(api::plant::update_plant)
                .delete(api::plant::delete_plant),
        )
        .route(
            "/rooms",
            get(api::room::list_rooms).post(api::room::create_room),
        )
        .route(
            "/rooms/:id",
            get(api::room::get_room)
                .patch(api::room::update_room)
                .delete(api::room::delete_room),
        )
        .route("/care-logs", post(api::care_log::create_care_log))
        .route("/care-logs/recent", get(api::care_log::recent_care_logs))
        .route(
            "/care-logs/plant/:plant_id",
            get(api::care_log::care_logs_for_plant),
        )
        .route(
            "/care-logs/type/:log_type",
            get(api::care_log::care_logs_by_type),
        )
        .route(
            "/care-logs/:id",
            get(api::care_log::get_care_log)
                .patch(api::care_log::update_care_log)
                .delete(api::care_log::delete_care_log),
        )
        .route(
            "/config/:kind",
            get(api::config::list_entries).post(api::config::create_entry),
        )
        .route(
            "/config/:kind/:id",
            get(api::config::get_entry)
                .patch(api::config::update_entry)
                .delete(api::config::delete_entry),
        )
        .route_layer(axum::middleware::from_fn(api::middleware::auth_middleware));

    let cors_origin =
        std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check))
        .nest("/api", auth_routes.merge(protected_routes))
        .layer(Extension(db))
        .layer(prometheus_layer)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    // Span name is "METHOD /path" (e.g. "POST /api/plants")
                    let span_name = if let Some(path) = matched_path {
                        format!("{} {}", request.method(), path)
                    } else {
                        format!("{} {}", request.method(), request.uri().path())
                    };

                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        request_id = %uuid::Uuid::new_v4(),
                        method = ?request.method(),
                        uri = ?request.uri(),
                        // Filled in by handlers
                        table = tracing::field::Empty,
                        action = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        plant_id = tracing::field::Empty,
                        business_event = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(
                    |_request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                        // the completion event is enough; skip the started log
                    },
                )
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(
                    cors_origin
                        .parse::<axum::http::HeaderValue>()
                        .expect("CORS_ORIGIN must be a valid origin"),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::PATCH,
                    axum::http::Method::DELETE,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true),
        )
        .route("/metrics", get(|| async move { metric_handle.render() }))
}
