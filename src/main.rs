use anyhow::Result;
use clap::Parser;
use cropwise_api::{config::Config, models::Device, web::serve};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cropwise-api")]
#[command(about = "Corn leaf disease detection service")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0:8001")]
    bind: String,

    /// Path to the ONNX classification model
    #[arg(long, default_value = "model.onnx")]
    model_path: String,

    /// ONNX Runtime intra-op threads (defaults to 75% of CPU cores)
    #[arg(long)]
    intra_threads: Option<usize>,

    /// Inference device (auto uses CUDA when available, otherwise CPU)
    #[arg(long, value_enum, default_value_t = Device::Auto)]
    device: Device,

    /// Maximum upload size in MB
    #[arg(long, default_value_t = 50)]
    max_upload_mb: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志系统
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting CropWise API server...");
    tracing::info!("Bind address: {}", args.bind);
    tracing::info!("Model path: {}", args.model_path);
    tracing::info!("Requested device: {}", args.device);

    let config = Config::new(
        args.bind,
        args.model_path,
        args.intra_threads,
        args.max_upload_mb,
    )?
    .with_device(args.device);

    // 模型加载失败会在这里返回错误并终止进程
    serve(config).await?;

    Ok(())
}
