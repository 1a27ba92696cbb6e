use crate::{
    diagnosis::{Diagnosis, DiagnosisPipeline, CLASS_LABELS},
    utils::error::PredictError,
    web::AppState,
    Result,
};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

/// multipart中图像字段名
const FILE_FIELD: &str = "file";

/// 统一响应格式，成功与失败均返回200，由success区分
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// 服务状态与类别列表
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    let classes: serde_json::Map<String, Value> = CLASS_LABELS
        .iter()
        .map(|label| (label.id.to_string(), Value::from(label.name_vi)))
        .collect();

    Json(json!({
        "message": "CropWise - Corn Disease Detection API",
        "status": "running",
        "model": state.classifier.model_name(),
        "classes": classes,
    }))
}

/// 健康检查端点
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Multipart文件上传处理器
///
/// 任何阶段的错误都在这里截获并转换为 `{success: false, error}`。
pub async fn predict_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Json<ApiResponse<Diagnosis>> {
    let start_time = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!("Processing predict request: request_id={}", request_id);

    match predict(&state, multipart).await {
        Ok(diagnosis) => {
            tracing::info!(
                "Prediction: request_id={}, class={} ({:.2}%), time={:.3}s",
                request_id,
                diagnosis.predicted_class_vi,
                diagnosis.confidence,
                start_time.elapsed().as_secs_f32()
            );
            Json(ApiResponse::success(diagnosis))
        }
        Err(e) => {
            tracing::error!(
                "Prediction failed: request_id={}, code={}, error={}",
                request_id,
                e.error_code(),
                e
            );
            Json(ApiResponse::error(e.to_string()))
        }
    }
}

async fn predict(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Diagnosis> {
    let multipart = multipart.map_err(|e| {
        PredictError::InvalidInput(format!("Expected multipart form data: {}", e.body_text()))
    })?;

    let image_data = read_file_field(multipart).await?;

    DiagnosisPipeline::process_bytes(
        state.classifier.clone(),
        image_data,
        state.config.server_config.max_request_size,
    )
    .await
}

/// 读取上传的图像字段，其余字段忽略
async fn read_file_field(mut multipart: Multipart) -> Result<Bytes> {
    let mut image_data: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        PredictError::InvalidInput(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or("unknown").to_string();

        if field_name != FILE_FIELD {
            tracing::debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        tracing::debug!(
            "Receiving file: name={:?}, content_type={:?}",
            field.file_name(),
            field.content_type()
        );

        // 读取文件数据
        let data = field.bytes().await.map_err(|e| {
            PredictError::InvalidInput(format!("Failed to read file data: {}", e))
        })?;

        tracing::debug!("Received file: {} bytes", data.len());
        image_data = Some(data);
    }

    image_data.ok_or_else(|| PredictError::InvalidInput("No image file provided".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_payload_has_only_flag_and_error() {
        let response: ApiResponse<Diagnosis> = ApiResponse::error("boom".to_string());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn success_payload_is_flattened() {
        let diagnosis =
            crate::diagnosis::ResultFormatter::format(&[0.1, 0.1, 0.1, 0.7]).unwrap();
        let value = serde_json::to_value(ApiResponse::success(diagnosis)).unwrap();

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["predicted_class"], json!("Healthy"));
        assert_eq!(value["predicted_class_vi"], json!("Khỏe Mạnh"));
        assert!(value.get("error").is_none());
        assert!(value.get("data").is_none());
        assert_eq!(value["all_predictions"].as_object().unwrap().len(), 4);
    }
}
