// ==========================================
// 进口货柜到岸成本核算系统 - 货柜与成本领域模型
// ==========================================
// 依据: Import_Cost_Master_Spec.md - PART B 数据模型
// 依据: Cost_Allocation_Rules_v0.2.md - 1. 参数与成本行
// ==========================================

use crate::domain::types::Currency;
use serde::{Deserialize, Serialize};

// ==========================================
// ShipmentParameters - 货柜参数
// ==========================================
// 红线: 不可变值对象;引擎为纯函数,不持有逐步填充的可变状态
// 约定: 金额字段非负;汇率为乘法因子（报价货币 → 本币）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShipmentParameters {
    pub container_cost: f64,       // 货柜海运费（USD）
    pub container_volume: f64,     // 货柜容积（m³）
    pub import_tax_rate: f64,      // 进口税率（乘法因子,如 0.17）
    pub usd_to_local_rate: f64,    // USD → 本币汇率
    pub rmb_to_local_rate: f64,    // RMB → 本币汇率
    pub local_transport_cost: f64, // 本地运输费（本币）
    pub unloading_cost: f64,       // 卸货费（本币）
    pub additional_fees: f64,      // 附加费用（本币）
}

impl ShipmentParameters {
    /// 查询指定货币的本币汇率
    pub fn rate_for(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Usd => self.usd_to_local_rate,
            Currency::Rmb => self.rmb_to_local_rate,
        }
    }

    /// 至少配置了一种货币的汇率
    pub fn has_any_rate(&self) -> bool {
        self.usd_to_local_rate > 0.0 || self.rmb_to_local_rate > 0.0
    }
}

// ==========================================
// CostLine - 成本行
// ==========================================
// 用途: 单产品的到岸成本拆解;is_total 标记汇总行
// 约定: *_share 为绝对额分摊,*_per_unit 为单件口径;汇总行单件字段恒为 0
// 约定: 金额字段在产出时四舍五入到 2 位小数,中间计算不舍入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub name: String,       // 展示名（货号 - 供应商货号）
    pub currency: Currency, // 报价货币
    pub quantity: f64,      // 数量（件）
    pub total_volume: f64,  // 总体积（m³）
    pub volume_per_unit: f64,
    pub volume_ratio: f64, // 体积占比（0..1,汇总行为 1）

    // ===== 货值 =====
    pub unit_price: f64,       // 原始单价（报价货币）
    pub unit_price_local: f64, // 原始单价（本币）

    // ===== 海运费分摊（货柜基准货币 USD）=====
    pub shipping_cost: f64,                // 绝对额（USD）
    pub shipping_cost_per_unit: f64,       // 单件（USD）
    pub shipping_cost_per_unit_local: f64, // 单件（本币）

    // ===== 本地固定费用分摊（本币）=====
    pub local_transport_share: f64, // 绝对额
    pub unloading_share: f64,
    pub additional_fees_share: f64,
    pub local_transport_per_unit: f64, // 单件
    pub unloading_per_unit: f64,
    pub additional_fees_per_unit: f64,

    // ===== 到岸单件成本（本币）=====
    pub final_cost_per_unit: f64,          // 不含税
    pub vat_per_unit: f64,                 // 进口税（单件）
    pub final_cost_per_unit_with_vat: f64, // 含税

    // ===== 到岸绝对成本（本币,不含税）=====
    pub total_cost_local: f64,

    pub is_total: bool, // 汇总行标记
}

// ==========================================
// AllocationSummary - 分摊汇总块
// ==========================================
// 用途: 货柜级对账信息;本地固定费用在此按申报额单独列示,
//       不再叠加进汇总行的分摊合计（避免重复计入）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub product_count: usize,      // 产品数
    pub total_quantity: f64,       // 总件数
    pub total_volume: f64,         // 总体积（m³）
    pub container_volume: f64,     // 货柜容积（m³）
    pub container_utilization: f64, // 装载率（0..1）
    pub goods_cost_usd: f64,       // USD 报价货值合计
    pub goods_cost_rmb: f64,       // RMB 报价货值合计
    pub container_cost: f64,       // 货柜海运费（USD,申报额）
    pub local_transport_cost: f64, // 本地运输费（本币,申报额）
    pub unloading_cost: f64,       // 卸货费（本币,申报额）
    pub additional_fees: f64,      // 附加费用（本币,申报额）
}

// ==========================================
// AllocationResult - 分摊结果
// ==========================================
// 用途: 分摊接口返回值;lines 与输入产品同序,totals 为汇总行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub lines: Vec<CostLine>,
    pub totals: CostLine,
    pub summary: AllocationSummary,
}
