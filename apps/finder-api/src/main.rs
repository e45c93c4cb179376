//! 设施查找后端：附近搜索代理、营业状态日志、拥挤度、反馈、路线与活动接口。

mod handlers;
mod middleware;
mod routes;
mod utils;

use axum::Router;
use finder_config::{AppConfig, StorageBackend};
use finder_places::{GooglePlacesClient, PlacesProvider, PlacesSettings};
use finder_storage::{
    CongestionStore, EventStore, FacilityStore, FeedbackStore, InMemoryCongestionStore,
    InMemoryEventStore, InMemoryFacilityStore, InMemoryFeedbackStore, InMemoryOpenStatusStore,
    InMemorySensorStore, OpenStatusStore, RedisStore, SensorStore,
};
use finder_telemetry::init_tracing;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 全部 handler 共享的状态。
#[derive(Clone)]
pub struct AppState {
    pub places: Arc<dyn PlacesProvider>,
    pub facility_store: Arc<dyn FacilityStore>,
    pub open_status_store: Arc<dyn OpenStatusStore>,
    pub congestion_store: Arc<dyn CongestionStore>,
    pub feedback_store: Arc<dyn FeedbackStore>,
    pub event_store: Arc<dyn EventStore>,
    pub sensor_store: Arc<dyn SensorStore>,
    /// 浏览器地图加载用。
    pub places_api_key: String,
    pub sensor_recent_limit: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let places = Arc::new(GooglePlacesClient::new(PlacesSettings {
        api_key: config.places_api_key.clone(),
        base_url: config.places_base_url.clone(),
        language: config.places_language.clone(),
        photo_max_width: config.photo_max_width,
        timeout_seconds: config.upstream_timeout_seconds,
    })?);

    let state = build_state(&config, places)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(addr = %config.http_addr, storage = ?config.storage_backend, "finder_api_listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(
    config: &AppConfig,
    places: Arc<dyn PlacesProvider>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let state = match config.storage_backend {
        StorageBackend::Memory => AppState {
            places,
            facility_store: Arc::new(InMemoryFacilityStore::new()),
            open_status_store: Arc::new(InMemoryOpenStatusStore::new()),
            congestion_store: Arc::new(InMemoryCongestionStore::new()),
            feedback_store: Arc::new(InMemoryFeedbackStore::new()),
            event_store: Arc::new(InMemoryEventStore::new()),
            sensor_store: Arc::new(InMemorySensorStore::new()),
            places_api_key: config.places_api_key.clone(),
            sensor_recent_limit: config.sensor_recent_limit,
        },
        StorageBackend::Redis => {
            // 同一个连接客户端实现全部存储接口
            let redis = Arc::new(RedisStore::connect(&config.redis_url)?);
            AppState {
                places,
                facility_store: redis.clone(),
                open_status_store: redis.clone(),
                congestion_store: redis.clone(),
                feedback_store: redis.clone(),
                event_store: redis.clone(),
                sensor_store: redis,
                places_api_key: config.places_api_key.clone(),
                sensor_recent_limit: config.sensor_recent_limit,
            }
        }
    };
    Ok(state)
}

fn build_app(state: AppState) -> Router {
    routes::create_api_router()
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_context))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
