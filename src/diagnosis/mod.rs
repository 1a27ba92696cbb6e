pub mod formatter;
pub mod labels;
pub mod pipeline;
pub mod types;

pub use formatter::ResultFormatter;
pub use labels::{ClassLabel, DiseaseInfo, CLASS_LABELS};
pub use pipeline::{DiagnosisPipeline, PipelineStage};
pub use types::{ClassProbabilities, ClassProbability, Diagnosis};
