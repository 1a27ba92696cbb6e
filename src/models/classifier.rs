use crate::image::preprocessing::INPUT_SIZE;
use crate::models::device::{self, Device};
use crate::models::{DiseaseClassifier, Probabilities, NUM_CLASSES};
use crate::utils::error::PredictError;
use crate::{Config, Result};
use ndarray::{Array3, Axis};
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session},
    value::{Tensor, ValueType},
};
use parking_lot::Mutex;

pub struct OnnxClassifier {
    // Session::run 需要独占访问
    session: Mutex<Session>,
    input_name: String,  // 动态发现的输入名称
    output_name: String, // 动态发现的输出名称
    device: Device,
}

impl OnnxClassifier {
    /// 启动时加载模型；文件缺失、设备不可用或输入输出形状不匹配均视为不可恢复的配置错误
    pub fn load(config: &Config) -> Result<Self> {
        let model_path = &config.model_path;

        if !model_path.exists() {
            return Err(PredictError::ModelLoad(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }

        let device = device::resolve_device(config.onnx_config.device, device::cuda_available())?;
        tracing::info!(
            "Using device: {} (requested: {})",
            device,
            config.onnx_config.device
        );

        tracing::info!("Loading classification model from: {}", model_path.display());

        let session = Session::builder()?
            .with_execution_providers(device::execution_providers(device))?
            .with_optimization_level(optimization_level(config.onnx_config.optimization_level))?
            .with_intra_threads(config.onnx_config.intra_threads)?
            .commit_from_file(model_path)?;

        let input = session.inputs.first().ok_or_else(|| {
            PredictError::ModelLoad("Classification model has no inputs".to_string())
        })?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => check_input_shape(shape)?,
            other => {
                return Err(PredictError::ModelLoad(format!(
                    "Model input '{}' is not a tensor: {:?}",
                    input.name, other
                )))
            }
        }
        let input_name = input.name.clone();

        let output = session.outputs.first().ok_or_else(|| {
            PredictError::ModelLoad("Classification model has no outputs".to_string())
        })?;
        match &output.output_type {
            ValueType::Tensor { shape, .. } => check_output_shape(shape)?,
            other => {
                return Err(PredictError::ModelLoad(format!(
                    "Model output '{}' is not a tensor: {:?}",
                    output.name, other
                )))
            }
        }
        let output_name = output.name.clone();

        tracing::info!(
            "Classification model ready: input='{}', output='{}', device={}, intra_threads={}",
            input_name,
            output_name,
            device,
            config.onnx_config.intra_threads
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            device,
        })
    }

    /// 实际使用的推理设备
    pub fn device(&self) -> Device {
        self.device
    }

    fn run_logits(&self, input: Array3<f32>) -> Result<Vec<f32>> {
        // 添加batch维度
        let input_tensor = Tensor::from_array(input.insert_axis(Axis(0)))?;

        let logits = {
            let mut session = self.session.lock();
            let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

            match outputs.get(&self.output_name) {
                Some(output) => output.try_extract_array::<f32>()?.into_owned(),
                None => {
                    let available_outputs: Vec<String> =
                        outputs.keys().map(|s| s.to_string()).collect();
                    return Err(PredictError::Inference(format!(
                        "Classification output '{}' not found. Available outputs: {:?}",
                        self.output_name, available_outputs
                    )));
                }
            }
        };

        Ok(logits.iter().copied().collect())
    }
}

impl DiseaseClassifier for OnnxClassifier {
    fn classify(&self, input: Array3<f32>) -> Result<Probabilities> {
        let logits = self.run_logits(input)?;

        let logits: [f32; NUM_CLASSES] = logits.as_slice().try_into().map_err(|_| {
            PredictError::Inference(format!(
                "Expected {} logits, model produced {}",
                NUM_CLASSES,
                logits.len()
            ))
        })?;

        Ok(softmax(&logits))
    }
}

fn optimization_level(level: u8) -> GraphOptimizationLevel {
    match level {
        0 => GraphOptimizationLevel::Disable,
        1 => GraphOptimizationLevel::Level1,
        2 => GraphOptimizationLevel::Level2,
        _ => GraphOptimizationLevel::Level3,
    }
}

/// 输入必须是 NCHW 的 (1, 3, 256, 256)；动态维度（<= 0）不做限制
fn check_input_shape(shape: &[i64]) -> Result<()> {
    let size = INPUT_SIZE as i64;
    let expected = [1, 3, size, size];

    if shape.len() != expected.len() {
        return Err(PredictError::ModelLoad(format!(
            "Model input has rank {} ({:?}), expected {:?}",
            shape.len(),
            shape,
            expected
        )));
    }

    for (axis, (&actual, &wanted)) in shape.iter().zip(expected.iter()).enumerate() {
        if actual > 0 && actual != wanted {
            return Err(PredictError::ModelLoad(format!(
                "Model input dimension {} is {}, expected {} (input shape {:?})",
                axis, actual, wanted, shape
            )));
        }
    }

    Ok(())
}

/// 输出最后一维为类别数；动态维度到推理时再校验
fn check_output_shape(shape: &[i64]) -> Result<()> {
    match shape.last() {
        None => Err(PredictError::ModelLoad(
            "Model output is a scalar, expected class logits".to_string(),
        )),
        Some(&classes) if classes > 0 && classes as usize != NUM_CLASSES => {
            Err(PredictError::ModelLoad(format!(
                "Model head has {} classes, expected {}",
                classes, NUM_CLASSES
            )))
        }
        Some(_) => Ok(()),
    }
}

/// 数值稳定的 softmax
pub fn softmax(logits: &[f32; NUM_CLASSES]) -> Probabilities {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let mut probs = [0.0f32; NUM_CLASSES];
    let mut sum = 0.0;
    for (p, &l) in probs.iter_mut().zip(logits) {
        *p = (l - max).exp();
        sum += *p;
    }
    for p in probs.iter_mut() {
        *p /= sum;
    }

    probs
}
