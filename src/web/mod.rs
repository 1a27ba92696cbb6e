pub mod handlers;

use crate::{
    models::{DiseaseClassifier, OnnxClassifier},
    utils::error::PredictError,
    Config, Result,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// 请求间共享的只读上下文，启动时构建一次
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub classifier: Arc<dyn DiseaseClassifier>,
}

impl AppState {
    pub fn new(config: Config, classifier: Arc<dyn DiseaseClassifier>) -> Self {
        Self {
            config: Arc::new(config),
            classifier,
        }
    }
}

pub async fn serve(config: Config) -> Result<()> {
    // 解析绑定地址
    let addr = config.socket_addr()?;

    // 加载模型，失败则直接终止启动
    let classifier = OnnxClassifier::load(&config)?;
    let state = AppState::new(config, Arc::new(classifier));

    let app = create_app(state);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /         - Service status and classes");
    tracing::info!("  POST /predict  - Multipart image upload (field: file)");
    tracing::info!("  GET  /health   - Health check");

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        PredictError::Internal(format!("Failed to bind to address {}: {}", addr, e))
    })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PredictError::Internal(format!("Server failed to start: {}", e)))?;

    Ok(())
}

pub fn create_app(state: AppState) -> Router {
    let max_request_size = state.config.server_config.max_request_size;

    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/predict", post(handlers::predict_handler))
        .route("/health", get(handlers::health_handler))
        // 超限在读取multipart时报错，由处理器转换为失败响应
        .layer(DefaultBodyLimit::max(max_request_size))
        .layer(TraceLayer::new_for_http())
        // 允许任意来源并携带凭据
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
