// ==========================================
// 进口货柜到岸成本核算系统 - 产品领域模型
// ==========================================
// 依据: Import_Cost_Master_Spec.md - PART B 数据模型
// 依据: Extraction_Heuristics_v0.2.md - 3. 产品记录与提取报告
// 依据: field_dictionary_v0.1.md - 字段字典
// ==========================================

use crate::domain::types::{ColumnRole, Currency};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ProductRecord - 产品行记录
// ==========================================
// 红线: 提取阶段一次构建,之后只读;分摊引擎不回读原始表格
// 不变式: quantity 与 unit_price 均为正时 total_price = quantity * unit_price,否则为 0
// 保留条件: code 非空 且 (quantity > 0 或 unit_price > 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub code: String,        // 货号（首单元格首行首个空白分隔词）
    pub item_number: String, // 供应商货号（"Item No." 标签行解析）
    pub description: String, // 规格描述（材质/规格/包装行拼接）
    pub quantity: f64,       // 数量（件）
    pub unit_price: f64,     // 单价（报价货币）
    pub total_volume: f64,   // 总体积（m³）
    pub currency: Currency,  // 报价货币（列分类阶段判定）
    pub total_price: f64,    // 总价（报价货币）
}

impl ProductRecord {
    /// 展示名（货号 + 供应商货号）
    pub fn display_name(&self) -> String {
        if self.item_number.is_empty() {
            self.code.clone()
        } else {
            format!("{} - {}", self.code, self.item_number)
        }
    }

    /// 单件体积（数量为 0 时返回 0,避免除零）
    pub fn volume_per_unit(&self) -> f64 {
        if self.quantity > 0.0 {
            self.total_volume / self.quantity
        } else {
            0.0
        }
    }

    /// 保留条件判定
    pub fn is_retainable(&self) -> bool {
        !self.code.is_empty() && (self.quantity > 0.0 || self.unit_price > 0.0)
    }
}

// ==========================================
// ColumnRoleMap - 列角色映射
// ==========================================
// 用途: 表头分类器输出;每个角色至多一个列下标
// 约定: item 无更优候选时默认第 0 列（货号总在最左）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoleMap {
    pub item: usize,                 // 货号列
    pub description: Option<usize>,  // 描述列（仅报告用）
    pub quantity: Option<usize>,     // 数量列
    pub unit_price: Option<usize>,   // 单价列
    pub total_amount: Option<usize>, // 总金额列（仅报告用,行解析不读取）
    pub volume: Option<usize>,       // 体积列
    pub currency: Currency,          // 由单价列表头判定的报价货币
}

impl Default for ColumnRoleMap {
    fn default() -> Self {
        Self {
            item: 0,
            description: None,
            quantity: None,
            unit_price: None,
            total_amount: None,
            volume: None,
            currency: Currency::default(),
        }
    }
}

impl ColumnRoleMap {
    /// 已解析的核心角色数量
    ///
    /// # 说明
    /// - item 隐含解析（默认第 0 列）,恒计 1
    /// - description / total_amount 仅用于报告,不计入门槛
    pub fn resolved_core_roles(&self) -> usize {
        1 + [self.quantity, self.unit_price, self.volume]
            .iter()
            .filter(|idx| idx.is_some())
            .count()
    }

    /// 指定列是否已绑定任一角色（数据推断回填时跳过已占用列）
    pub fn is_assigned(&self, col: usize) -> bool {
        self.index_of(ColumnRole::Item) == Some(col)
            || self.description == Some(col)
            || self.quantity == Some(col)
            || self.unit_price == Some(col)
            || self.total_amount == Some(col)
            || self.volume == Some(col)
    }

    /// 查询角色绑定的列下标
    pub fn index_of(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::Item => Some(self.item),
            ColumnRole::Description => self.description,
            ColumnRole::Quantity => self.quantity,
            ColumnRole::UnitPrice => self.unit_price,
            ColumnRole::TotalAmount => self.total_amount,
            ColumnRole::Volume => self.volume,
        }
    }
}

// ==========================================
// RowSkipReason - 行跳过原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowSkipReason {
    NoProductCode, // 首单元格无字母数字内容（无货号）
    NotRetained,   // 不满足保留条件（数量与单价均为 0 或货号为空）
    ParseFailure,  // 行级解析失败（行丢弃,提取继续）
}

impl fmt::Display for RowSkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowSkipReason::NoProductCode => write!(f, "NO_PRODUCT_CODE"),
            RowSkipReason::NotRetained => write!(f, "NOT_RETAINED"),
            RowSkipReason::ParseFailure => write!(f, "PARSE_FAILURE"),
        }
    }
}

// ==========================================
// RowSkip - 行跳过诊断记录
// ==========================================
// 用途: 行级非致命诊断,随提取报告返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSkip {
    pub row_number: usize,    // 表格行号（0 基）
    pub code: Option<String>, // 货号（如可解析）
    pub reason: RowSkipReason,
    pub message: String, // 诊断描述
}

// ==========================================
// ExtractionReport - 提取报告
// ==========================================
// 用途: 提取接口返回的结构化诊断（表头位置/列映射/行范围/跳过明细）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub total_rows: usize,                  // 表格总行数
    pub header_row: Option<usize>,          // 表头行下标
    pub header_strategy: Option<String>,    // 命中的表头定位策略名
    pub columns: Option<ColumnRoleMap>,     // 列角色映射
    pub product_start_row: Option<usize>,   // 产品区起始行
    pub product_end_row: Option<usize>,     // 产品区结束行（含）
    pub parsed_rows: usize,                 // 成功解析行数
    pub skips: Vec<RowSkip>,                // 行跳过明细
}

impl ExtractionReport {
    /// 创建空报告（仅记录表格行数）
    pub fn empty(total_rows: usize) -> Self {
        Self {
            total_rows,
            header_row: None,
            header_strategy: None,
            columns: None,
            product_start_row: None,
            product_end_row: None,
            parsed_rows: 0,
            skips: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_record_display_name() {
        let mut record = ProductRecord {
            code: "A100".to_string(),
            item_number: "X1".to_string(),
            description: String::new(),
            quantity: 100.0,
            unit_price: 2.5,
            total_volume: 0.05,
            currency: Currency::Usd,
            total_price: 250.0,
        };
        assert_eq!(record.display_name(), "A100 - X1");

        record.item_number.clear();
        assert_eq!(record.display_name(), "A100");
    }

    #[test]
    fn test_product_record_volume_per_unit_zero_quantity() {
        let record = ProductRecord {
            code: "A100".to_string(),
            item_number: String::new(),
            description: String::new(),
            quantity: 0.0,
            unit_price: 2.5,
            total_volume: 0.05,
            currency: Currency::Usd,
            total_price: 0.0,
        };
        assert_eq!(record.volume_per_unit(), 0.0);
    }

    #[test]
    fn test_retention_rule() {
        let mut record = ProductRecord {
            code: "A100".to_string(),
            item_number: String::new(),
            description: String::new(),
            quantity: 0.0,
            unit_price: 0.0,
            total_volume: 0.0,
            currency: Currency::Usd,
            total_price: 0.0,
        };
        assert!(!record.is_retainable());

        record.unit_price = 1.0;
        assert!(record.is_retainable());

        record.code.clear();
        assert!(!record.is_retainable());
    }

    #[test]
    fn test_role_map_resolved_core_roles() {
        let mut map = ColumnRoleMap::default();
        // item 隐含解析,恒计 1
        assert_eq!(map.resolved_core_roles(), 1);

        map.quantity = Some(2);
        map.unit_price = Some(3);
        assert_eq!(map.resolved_core_roles(), 3);

        // description / total_amount 不计入门槛
        map.description = Some(1);
        map.total_amount = Some(5);
        assert_eq!(map.resolved_core_roles(), 3);
    }

    #[test]
    fn test_role_map_is_assigned() {
        let map = ColumnRoleMap {
            quantity: Some(2),
            ..ColumnRoleMap::default()
        };
        assert!(map.is_assigned(0)); // item 默认第 0 列
        assert!(map.is_assigned(2));
        assert!(!map.is_assigned(3));
    }
}
