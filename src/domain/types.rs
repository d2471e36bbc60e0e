// ==========================================
// 进口货柜到岸成本核算系统 - 领域类型定义
// ==========================================
// 依据: Import_Cost_Master_Spec.md - PART A 货币与列角色体系
// 依据: Extraction_Heuristics_v0.2.md - 2.3 列角色分类
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 货币 (Currency)
// ==========================================
// 红线: 货币在列分类阶段一次性判定,分摊阶段只读枚举,不再做文本匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    Usd, // 美元（默认报价货币）
    Rmb, // 人民币
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Usd
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Rmb => write!(f, "RMB"),
        }
    }
}

impl Currency {
    /// 从价格列表头文本判定货币
    ///
    /// # 规则
    /// - 表头（大写后）含 RMB / CNY / ￥ / ¥ → 人民币
    /// - 其他 → 美元（历史文件默认 USD 报价）
    pub fn from_price_header(header_text: &str) -> Self {
        let upper = header_text.to_uppercase();
        if upper.contains("RMB")
            || upper.contains("CNY")
            || upper.contains('￥')
            || upper.contains('¥')
        {
            Currency::Rmb
        } else {
            Currency::Usd
        }
    }

    /// 转换为存储/展示字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Rmb => "RMB",
        }
    }
}

// ==========================================
// 列角色 (Column Role)
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 2.3 列角色枚举
// 用途: 表头分类器输出,每个角色至多绑定一个列下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Item,        // 货号列（无更优候选时默认第 0 列）
    Description, // 描述列（仅用于报告,描述正文来自货号单元格分解）
    Quantity,    // 数量列
    UnitPrice,   // 单价列
    TotalAmount, // 总金额列（识别后仅记录,行解析不读取）
    Volume,      // 体积列（CBM）
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnRole {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Item => "item",
            ColumnRole::Description => "description",
            ColumnRole::Quantity => "quantity",
            ColumnRole::UnitPrice => "unit_price",
            ColumnRole::TotalAmount => "total_amount",
            ColumnRole::Volume => "volume",
        }
    }
}
