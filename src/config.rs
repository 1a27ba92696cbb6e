use crate::models::Device;
use crate::utils::error::PredictError;
use crate::Result;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器绑定地址
    pub bind_addr: String,

    /// 模型文件路径（ResNet18导出的ONNX）
    pub model_path: PathBuf,

    /// ONNX Runtime配置
    pub onnx_config: OnnxConfig,

    /// 服务器配置
    pub server_config: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// CPU线程数
    pub intra_threads: usize,

    /// 优化级别 (0-3)
    pub optimization_level: u8,

    /// 推理设备
    pub device: Device,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

impl Config {
    pub fn new(
        bind_addr: String,
        model_path: impl Into<PathBuf>,
        intra_threads: Option<usize>,
        max_upload_mb: usize,
    ) -> Result<Self> {
        if max_upload_mb == 0 {
            return Err(PredictError::Config(
                "Upload limit must be at least 1 MB".to_string(),
            ));
        }

        let cpu_cores = num_cpus::get();

        let onnx_config = OnnxConfig {
            // 默认使用75%的CPU核心
            intra_threads: intra_threads.unwrap_or(cpu_cores * 3 / 4).max(1),
            optimization_level: 3,
            device: Device::Auto,
        };

        let server_config = ServerConfig {
            max_request_size: max_upload_mb * 1024 * 1024,
        };

        Ok(Self {
            bind_addr,
            model_path: model_path.into(),
            onnx_config,
            server_config,
        })
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.onnx_config.device = device;
        self
    }

    /// 解析绑定地址
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr.parse().map_err(|e| {
            PredictError::Config(format!("Invalid bind address {}: {}", self.bind_addr, e))
        })
    }
}
