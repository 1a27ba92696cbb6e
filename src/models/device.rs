//! 推理设备选择
//!
//! `auto` 在 CUDA 可用时使用 GPU，否则回退到 CPU；显式指定 `cuda` 而运行时不可用则启动失败。
//! CUDA 支持需要启用 `cuda` feature，未启用时只有 CPU。

use crate::utils::error::PredictError;
use crate::Result;
use ort::execution_providers::{CPUExecutionProvider, ExecutionProviderDispatch};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Device {
    Auto,
    Cpu,
    Cuda,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Auto => write!(f, "auto"),
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda => write!(f, "cuda"),
        }
    }
}

/// 根据请求和运行时能力确定实际设备
pub fn resolve_device(requested: Device, cuda_available: bool) -> Result<Device> {
    match requested {
        Device::Cpu => Ok(Device::Cpu),
        Device::Cuda if cuda_available => Ok(Device::Cuda),
        Device::Cuda => Err(PredictError::Config(
            "CUDA execution provider requested but not available".to_string(),
        )),
        Device::Auto if cuda_available => Ok(Device::Cuda),
        Device::Auto => Ok(Device::Cpu),
    }
}

/// CUDA 是否编译进来且运行时可用
pub fn cuda_available() -> bool {
    #[cfg(feature = "cuda")]
    {
        use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
        CUDAExecutionProvider::default()
            .is_available()
            .unwrap_or(false)
    }
    #[cfg(not(feature = "cuda"))]
    {
        false
    }
}

/// 按优先级排列的执行提供者，CPU 总是最后的回退
pub fn execution_providers(device: Device) -> Vec<ExecutionProviderDispatch> {
    let mut eps = Vec::new();

    #[cfg(feature = "cuda")]
    {
        if device == Device::Cuda {
            eps.push(ort::execution_providers::CUDAExecutionProvider::default().build());
        }
    }
    #[cfg(not(feature = "cuda"))]
    {
        let _ = device;
    }

    eps.push(CPUExecutionProvider::default().build());
    eps
}
