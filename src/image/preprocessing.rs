use image::{imageops::FilterType, DynamicImage};
use ndarray::Array3;

/// 模型输入边长
pub const INPUT_SIZE: u32 = 256;

/// ImageNet 归一化参数 (RGB)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// 分类模型预处理流水线：RGB -> 双线性缩放到 256x256 -> [0,1] -> 按通道归一化
    ///
    /// 输出为 CHW 布局，形状 (3, 256, 256)，不含 batch 维度。
    pub fn to_tensor(image: &DynamicImage) -> Array3<f32> {
        let rgb = image.to_rgb8();
        let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

        let size = INPUT_SIZE as usize;
        Array3::<f32>::from_shape_fn((3, size, size), |(c, y, x)| {
            let value = resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
            (value - IMAGENET_MEAN[c]) / IMAGENET_STD[c]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, RgbaImage, Rgba};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn output_shape_is_fixed() {
        for (w, h) in [(50, 50), (1, 1), (640, 480), (300, 1200)] {
            let tensor = ImagePreprocessor::to_tensor(&solid(w, h, [0, 0, 0]));
            assert_eq!(tensor.shape(), &[3, 256, 256], "input {}x{}", w, h);
        }
    }

    #[test]
    fn normalizes_per_channel() {
        let tensor = ImagePreprocessor::to_tensor(&solid(40, 30, [255, 0, 255]));

        let expected = [
            (1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0],
            (0.0 - IMAGENET_MEAN[1]) / IMAGENET_STD[1],
            (1.0 - IMAGENET_MEAN[2]) / IMAGENET_STD[2],
        ];
        for c in 0..3 {
            for &(y, x) in &[(0, 0), (128, 77), (255, 255)] {
                assert!(
                    (tensor[[c, y, x]] - expected[c]).abs() < 1e-3,
                    "channel {} at ({}, {}) = {}",
                    c,
                    y,
                    x,
                    tensor[[c, y, x]]
                );
            }
        }
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let rgba = RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 0]));
        let tensor = ImagePreprocessor::to_tensor(&DynamicImage::ImageRgba8(rgba));
        let white_red = (1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        assert!((tensor[[0, 10, 10]] - white_red).abs() < 1e-3);
    }

    #[test]
    fn same_image_same_tensor() {
        let mut img = RgbImage::new(97, 61);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = Rgb([(x * 2) as u8, (y * 4) as u8, ((x + y) % 256) as u8]);
        }
        let img = DynamicImage::ImageRgb8(img);
        assert_eq!(
            ImagePreprocessor::to_tensor(&img),
            ImagePreprocessor::to_tensor(&img)
        );
    }
}
