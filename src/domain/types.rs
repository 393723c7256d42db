// ==========================================
// 藻类农场管理系统 - 领域类型定义
// ==========================================
// 产品类别与饲喂方案均为封闭枚举:
// - 存储使用稳定代码 (与历史数据一致)
// - 展示使用标签查找表
// - 未知代码在边界处拒绝,不在读取时兜底
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 产品类别 (Product Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "MP_ALGA_ENTERA")]
    RawAlgaeWhole, // 原料: 整藻
    #[serde(rename = "MP_ALGA_DESHIDRATADA")]
    RawAlgaeDehydrated, // 原料: 脱水藻
    #[serde(rename = "MP_ALGA_MICRONIZADA")]
    RawAlgaeMicronized, // 原料: 微粉藻
    #[serde(rename = "PT_ALIMENTO")]
    FinishedFeed, // 成品: 动物饲料
    #[serde(rename = "PT_BIOESTIMULANTE")]
    FinishedBiostimulant, // 成品: 生物刺激素
}

/// 类别代码 → 展示标签
const CATEGORY_LABELS: [(ProductCategory, &str, &str); 5] = [
    (
        ProductCategory::RawAlgaeWhole,
        "MP_ALGA_ENTERA",
        "Materia Prima: Alga Entera",
    ),
    (
        ProductCategory::RawAlgaeDehydrated,
        "MP_ALGA_DESHIDRATADA",
        "Materia Prima: Alga Deshidratada",
    ),
    (
        ProductCategory::RawAlgaeMicronized,
        "MP_ALGA_MICRONIZADA",
        "Materia Prima: Alga Micronizada",
    ),
    (
        ProductCategory::FinishedFeed,
        "PT_ALIMENTO",
        "Producto Terminado: Alimento Animal",
    ),
    (
        ProductCategory::FinishedBiostimulant,
        "PT_BIOESTIMULANTE",
        "Producto Terminado: Bioestimulante",
    ),
];

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::RawAlgaeWhole,
        ProductCategory::RawAlgaeDehydrated,
        ProductCategory::RawAlgaeMicronized,
        ProductCategory::FinishedFeed,
        ProductCategory::FinishedBiostimulant,
    ];

    /// 存储代码
    pub fn code(&self) -> &'static str {
        CATEGORY_LABELS
            .iter()
            .find(|(c, _, _)| c == self)
            .map(|(_, code, _)| *code)
            .unwrap_or("")
    }

    /// 展示标签
    pub fn label(&self) -> &'static str {
        CATEGORY_LABELS
            .iter()
            .find(|(c, _, _)| c == self)
            .map(|(_, _, label)| *label)
            .unwrap_or("")
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ProductCategory {
    type Err = UnknownCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        CATEGORY_LABELS
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(category, _, _)| *category)
            .ok_or_else(|| UnknownCodeError {
                kind: "product_category",
                code: s.to_string(),
            })
    }
}

// ==========================================
// 饲喂方案 (Diet Type)
// ==========================================
// 只有两组: 实验组(藻类饲料) / 对照组(常规饲料)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietType {
    #[serde(rename = "ALGAS")]
    ExperimentalAlgae, // 实验组
    #[serde(rename = "CONTROL")]
    Control, // 对照组
}

impl DietType {
    pub const ALL: [DietType; 2] = [DietType::ExperimentalAlgae, DietType::Control];

    pub fn code(&self) -> &'static str {
        match self {
            DietType::ExperimentalAlgae => "ALGAS",
            DietType::Control => "CONTROL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DietType::ExperimentalAlgae => "Experimental (Base Algas)",
            DietType::Control => "Control (Alimento Normal)",
        }
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for DietType {
    type Err = UnknownCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALGAS" => Ok(DietType::ExperimentalAlgae),
            "CONTROL" => Ok(DietType::Control),
            _ => Err(UnknownCodeError {
                kind: "diet_type",
                code: s.to_string(),
            }),
        }
    }
}

// ==========================================
// 未知代码错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知的{kind}代码: {code}")]
pub struct UnknownCodeError {
    pub kind: &'static str,
    pub code: String,
}
