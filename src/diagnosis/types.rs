use crate::diagnosis::labels::DiseaseInfo;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// 单次诊断结果
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Diagnosis {
    /// 预测类别ID（不输出）
    #[serde(skip)]
    pub class_id: usize,
    /// 英文类别名
    pub predicted_class: &'static str,
    /// 越南语类别名
    pub predicted_class_vi: &'static str,
    /// 置信度 (0 - 100)
    pub confidence: f32,
    pub disease_info: DiseaseInfo,
    pub all_predictions: ClassProbabilities,
}

/// 单个类别的概率
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ClassProbability {
    /// 百分比 (0 - 100)
    pub probability: f32,
    pub label_en: &'static str,
}

/// 以越南语类别名为键的概率表，按类别ID顺序输出
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassProbabilities(Vec<(&'static str, ClassProbability)>);

impl ClassProbabilities {
    pub fn push(&mut self, label_vi: &'static str, entry: ClassProbability) {
        self.0.push((label_vi, entry));
    }

    pub fn get(&self, label_vi: &str) -> Option<&ClassProbability> {
        self.0
            .iter()
            .find(|(key, _)| *key == label_vi)
            .map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ClassProbability)> {
        self.0.iter().map(|(key, entry)| (*key, entry))
    }
}

impl Serialize for ClassProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, entry) in &self.0 {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}
