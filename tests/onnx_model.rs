//! 使用真实 ONNX 模型的集成测试
//!
//! 需要网络或本地模型文件，默认 `#[ignore]`：
//! ```sh
//! cargo test --test onnx_model -- --ignored
//! ```
//!
//! `CROPWISE_TEST_MODEL` 指向一个 4 类、输入 (1, 3, 256, 256) 的分类模型。

use cropwise_api::{
    image::ImagePreprocessor,
    models::{Device, DiseaseClassifier, OnnxClassifier},
    Config, PredictError,
};
use image::{DynamicImage, Rgb, RgbImage};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

const SQUEEZENET_URL: &str = "https://github.com/onnx/models/raw/main/validated/vision/classification/squeezenet/model/squeezenet1.0-12.onnx";

fn test_models_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("models");
    fs::create_dir_all(&dir).expect("Failed to create test models directory");
    dir
}

fn download_if_missing(url: &str, filename: &str) -> PathBuf {
    let path = test_models_dir().join(filename);
    if path.exists() {
        return path;
    }

    println!("Downloading {} from {}...", filename, url);
    let response = reqwest::blocking::get(url).expect("Failed to download model");
    assert!(
        response.status().is_success(),
        "Failed to download {}: HTTP {}",
        url,
        response.status()
    );
    let bytes = response.bytes().expect("Failed to read response body");

    let mut file = fs::File::create(&path).expect("Failed to create file");
    file.write_all(&bytes).expect("Failed to write file");
    path
}

fn cpu_config(model_path: PathBuf) -> Config {
    Config::new("127.0.0.1:0".into(), model_path, Some(1), 50)
        .unwrap()
        .with_device(Device::Cpu)
}

#[test]
#[ignore]
fn imagenet_model_is_rejected_at_load() {
    // 224×224 输入、1000 类输出
    let model_path = download_if_missing(SQUEEZENET_URL, "squeezenet1.0-12.onnx");

    match OnnxClassifier::load(&cpu_config(model_path)) {
        Err(PredictError::ModelLoad(msg)) => println!("rejected: {}", msg),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("incompatible model should not load"),
    }
}

#[test]
#[ignore]
fn disease_model_produces_distribution() {
    let model_path = PathBuf::from(
        std::env::var("CROPWISE_TEST_MODEL").expect("CROPWISE_TEST_MODEL not set"),
    );
    let classifier = OnnxClassifier::load(&cpu_config(model_path)).unwrap();
    assert_eq!(classifier.device(), Device::Cpu);

    let mut img = RgbImage::new(320, 240);
    for (x, y, p) in img.enumerate_pixels_mut() {
        *p = Rgb([(x % 256) as u8, 170, (y % 256) as u8]);
    }
    let tensor = ImagePreprocessor::to_tensor(&DynamicImage::ImageRgb8(img));

    let probs = classifier.classify(tensor.clone()).unwrap();
    let sum: f32 = probs.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4, "sum = {}", sum);
    assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));

    // 同一输入结果确定
    assert_eq!(classifier.classify(tensor).unwrap(), probs);
}
