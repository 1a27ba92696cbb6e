pub mod classifier;
pub mod device;

pub use classifier::{softmax, OnnxClassifier};
pub use device::Device;

use crate::Result;
use ndarray::Array3;

/// 分类类别数量（3种病害 + 健康）
pub const NUM_CLASSES: usize = 4;

/// 对外报告的模型架构名称
pub const MODEL_NAME: &str = "ResNet18";

/// 概率分布，下标即类别ID
pub type Probabilities = [f32; NUM_CLASSES];

/// 叶片病害分类器
///
/// 启动时构建一次，之后在所有请求间只读共享。
pub trait DiseaseClassifier: Send + Sync {
    /// 输入为 (3, 256, 256) 的归一化张量，返回各类别概率
    fn classify(&self, input: Array3<f32>) -> Result<Probabilities>;

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}
