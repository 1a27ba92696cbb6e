use crate::diagnosis::labels::CLASS_LABELS;
use crate::diagnosis::types::{ClassProbabilities, ClassProbability, Diagnosis};
use crate::models::Probabilities;
use crate::utils::error::PredictError;
use crate::Result;

/// 结果格式化器
pub struct ResultFormatter;

impl ResultFormatter {
    /// 将概率分布格式化为诊断结果
    pub fn format(probabilities: &Probabilities) -> Result<Diagnosis> {
        if let Some(bad) = probabilities.iter().find(|p| !p.is_finite()) {
            return Err(PredictError::Inference(format!(
                "Model produced a non-finite probability: {}",
                bad
            )));
        }

        let class_id = Self::argmax(probabilities);
        let label = &CLASS_LABELS[class_id];

        let mut all_predictions = ClassProbabilities::default();
        for (entry, &prob) in CLASS_LABELS.iter().zip(probabilities) {
            all_predictions.push(
                entry.name_vi,
                ClassProbability {
                    probability: prob * 100.0,
                    label_en: entry.name_en,
                },
            );
        }

        Ok(Diagnosis {
            class_id,
            predicted_class: label.name_en,
            predicted_class_vi: label.name_vi,
            confidence: probabilities[class_id] * 100.0,
            disease_info: label.info,
            all_predictions,
        })
    }

    /// 最大概率下标，相同时取较小的ID
    fn argmax(probabilities: &Probabilities) -> usize {
        let mut best = 0;
        for (i, &p) in probabilities.iter().enumerate().skip(1) {
            if p > probabilities[best] {
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn picks_highest_probability() {
        let diagnosis = ResultFormatter::format(&[0.1, 0.6, 0.2, 0.1]).unwrap();
        assert_eq!(diagnosis.class_id, 1);
        assert_eq!(diagnosis.predicted_class, "Common_Rust");
        assert_eq!(diagnosis.predicted_class_vi, "Bệnh Gỉ Sắt");
        assert!((diagnosis.confidence - 60.0).abs() < 1e-4);
        assert_eq!(diagnosis.disease_info.name, "Bệnh Gỉ Sắt (Common Rust)");
    }

    #[test]
    fn ties_resolve_to_lowest_id() {
        let diagnosis = ResultFormatter::format(&[0.1, 0.4, 0.1, 0.4]).unwrap();
        assert_eq!(diagnosis.predicted_class, "Common_Rust");

        let diagnosis = ResultFormatter::format(&[0.25; 4]).unwrap();
        assert_eq!(diagnosis.predicted_class, "Blight");
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let diagnosis = ResultFormatter::format(&[0.05, 0.15, 0.3, 0.5]).unwrap();
        let total: f32 = diagnosis.all_predictions.iter().map(|(_, e)| e.probability).sum();
        assert!((total - 100.0).abs() < 1e-3);
        assert_eq!(diagnosis.all_predictions.iter().count(), 4);
        assert_eq!(
            diagnosis.all_predictions.get("Khỏe Mạnh").unwrap().label_en,
            "Healthy"
        );
    }

    #[test]
    fn rejects_nan() {
        let err = ResultFormatter::format(&[f32::NAN, 0.2, 0.3, 0.5]).unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
    }

    #[test]
    fn serializes_in_class_order() {
        let diagnosis = ResultFormatter::format(&[0.7, 0.1, 0.1, 0.1]).unwrap();
        let value = serde_json::to_value(&diagnosis).unwrap();

        assert!(value.get("class_id").is_none());
        assert_eq!(value["predicted_class"], json!("Blight"));
        assert_eq!(
            value["disease_info"]["treatment"],
            json!("Sử dụng thuốc diệt nấm, cải thiện thoát nước, loại bỏ lá bệnh.")
        );
        assert_eq!(
            value["all_predictions"]["Bệnh Khô Lá"]["label_en"],
            json!("Blight")
        );

        let text = serde_json::to_string(&diagnosis.all_predictions).unwrap();
        let positions: Vec<usize> = CLASS_LABELS
            .iter()
            .map(|l| text.find(l.name_vi).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
