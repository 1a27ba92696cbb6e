use crate::models::NUM_CLASSES;
use serde::Serialize;

/// 病害说明（固定文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiseaseInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub treatment: &'static str,
}

/// 分类类别，下标与模型输出一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassLabel {
    pub id: usize,
    pub name_en: &'static str,
    pub name_vi: &'static str,
    pub info: DiseaseInfo,
}

pub static CLASS_LABELS: [ClassLabel; NUM_CLASSES] = [
    ClassLabel {
        id: 0,
        name_en: "Blight",
        name_vi: "Bệnh Khô Lá",
        info: DiseaseInfo {
            name: "Bệnh Khô Lá (Blight)",
            description: "Bệnh do nấm gây ra, làm lá khô héo và chết dần.",
            treatment: "Sử dụng thuốc diệt nấm, cải thiện thoát nước, loại bỏ lá bệnh.",
        },
    },
    ClassLabel {
        id: 1,
        name_en: "Common_Rust",
        name_vi: "Bệnh Gỉ Sắt",
        info: DiseaseInfo {
            name: "Bệnh Gỉ Sắt (Common Rust)",
            description: "Bệnh nấm gây ra các đốm màu vàng cam trên lá.",
            treatment: "Phun thuốc diệt nấm chứa mancozeb hoặc chlorothalonil.",
        },
    },
    ClassLabel {
        id: 2,
        name_en: "Gray_Leaf_Spot",
        name_vi: "Bệnh Đốm Lá Xám",
        info: DiseaseInfo {
            name: "Bệnh Đốm Lá Xám (Gray Leaf Spot)",
            description: "Bệnh nấm gây ra các vết đốm xám trên lá ngô.",
            treatment: "Luân canh cây trồng, sử dụng giống kháng bệnh, phun thuốc diệt nấm.",
        },
    },
    ClassLabel {
        id: 3,
        name_en: "Healthy",
        name_vi: "Khỏe Mạnh",
        info: DiseaseInfo {
            name: "Khỏe Mạnh (Healthy)",
            description: "Cây ngô hoàn toàn khỏe mạnh, không có dấu hiệu bệnh tật.",
            treatment: "Tiếp tục chăm sóc và theo dõi định kỳ.",
        },
    },
];
