use crate::{
    diagnosis::{Diagnosis, ResultFormatter},
    image::{ImageLoader, ImagePreprocessor},
    models::DiseaseClassifier,
    utils::error::PredictError,
    Result,
};
use axum::body::Bytes;
use std::sync::Arc;
use std::time::Instant;

/// 请求处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Decoding,
    Preprocessing,
    Inference,
    Formatting,
}

/// 诊断处理流水线
pub struct DiagnosisPipeline;

impl DiagnosisPipeline {
    /// 处理上传的图像字节
    ///
    /// 解码、预处理和推理都是CPU密集型操作，放到阻塞线程池执行。
    /// 任务一旦开始就会运行到结束，即使客户端已断开。
    pub async fn process_bytes(
        classifier: Arc<dyn DiseaseClassifier>,
        bytes: Bytes,
        max_size: usize,
    ) -> Result<Diagnosis> {
        tokio::task::spawn_blocking(move || Self::process(classifier.as_ref(), &bytes, max_size))
            .await
            .map_err(|e| PredictError::Internal(format!("Diagnosis task failed: {}", e)))?
    }

    /// 同步执行完整流水线：解码 -> 预处理 -> 推理 -> 格式化
    pub fn process(
        classifier: &dyn DiseaseClassifier,
        bytes: &[u8],
        max_size: usize,
    ) -> Result<Diagnosis> {
        let start_time = Instant::now();

        Self::enter(PipelineStage::Decoding);
        let image = ImageLoader::from_bytes(bytes, max_size)?;
        tracing::debug!("Decoded image: {}x{}", image.width(), image.height());

        Self::enter(PipelineStage::Preprocessing);
        let tensor = ImagePreprocessor::to_tensor(&image);
        drop(image);

        Self::enter(PipelineStage::Inference);
        let inference_start = Instant::now();
        let probabilities = classifier.classify(tensor)?;
        let inference_time = inference_start.elapsed();

        Self::enter(PipelineStage::Formatting);
        let diagnosis = ResultFormatter::format(&probabilities)?;

        tracing::debug!(
            "Pipeline completed: class={}, inference={:.3}s, total={:.3}s",
            diagnosis.predicted_class,
            inference_time.as_secs_f32(),
            start_time.elapsed().as_secs_f32()
        );

        Ok(diagnosis)
    }

    fn enter(stage: PipelineStage) {
        tracing::trace!("Pipeline stage: {:?}", stage);
    }
}
