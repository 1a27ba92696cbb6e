use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0} bytes, max allowed: {1} bytes")]
    FileTooLarge(usize, usize),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("ORT error: {0}")]
    Ort(#[from] ort::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl PredictError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PredictError::ModelLoad(_) => "MODEL_LOAD_ERROR",
            PredictError::ImageDecode(_) => "IMAGE_DECODE_ERROR",
            PredictError::InvalidInput(_) => "INVALID_INPUT",
            PredictError::FileTooLarge(_, _) => "FILE_TOO_LARGE",
            PredictError::Inference(_) => "INFERENCE_ERROR",
            PredictError::Ort(_) => "ORT_ERROR",
            PredictError::Config(_) => "CONFIG_ERROR",
            PredictError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
