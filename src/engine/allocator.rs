// ==========================================
// 进口货柜到岸成本核算系统 - 成本分摊引擎
// ==========================================
// 依据: Cost_Allocation_Rules_v0.2.md - 2. 体积比例分摊
// ==========================================
// 职责: 产品列表 + 货柜参数 → 到岸单件成本拆解
// 红线: 无状态引擎,纯函数;不回读原始表格,不持有可变累加状态
// 红线: 金额仅在产出时舍入到 2 位小数,中间计算不舍入
// ==========================================

use crate::domain::product::ProductRecord;
use crate::domain::shipment::{
    AllocationResult, AllocationSummary, CostLine, ShipmentParameters,
};
use crate::domain::types::Currency;
use crate::engine::error::{AllocateResult, AllocationError};

/// 金额舍入: 四舍五入到 2 位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// CostAllocator - 成本分摊引擎
// ==========================================
pub struct CostAllocator;

impl CostAllocator {
    /// 创建新的成本分摊引擎
    pub fn new() -> Self {
        Self
    }

    /// 分摊货柜固定成本
    ///
    /// # 参数
    /// - products: 产品列表（可为提取结果,亦可为调用方编辑后的列表）
    /// - params: 货柜参数（不可变值对象）
    ///
    /// # 返回
    /// - Ok(AllocationResult): 成本行（与输入同序）+ 汇总行 + 对账汇总块
    /// - Err(InvalidShipment): 总体积为 0 / 超出货柜容积 / 无任何汇率
    /// - Err(MissingExchangeRate): 某产品报价货币的汇率未配置
    ///
    /// # 规则
    /// - volume_ratio = 产品体积 / 总体积
    /// - 海运费按体积比例分摊,以货柜基准货币 USD 计
    /// - 本地运输/卸货/附加费按同一比例分摊,除以数量得单件份额
    /// - 单件到岸成本 = 本币单价 + 本币单件海运费 + 三项本币单件份额
    /// - 含税成本 = 到岸成本 × (1 + 进口税率)
    /// - 数量为 0 的产品单件字段取 0,避免除零
    pub fn allocate(
        &self,
        products: &[ProductRecord],
        params: &ShipmentParameters,
    ) -> AllocateResult<AllocationResult> {
        self.validate(products, params)?;

        let total_volume: f64 = products.iter().map(|p| p.total_volume).sum();

        let mut lines = Vec::with_capacity(products.len());
        let mut acc = TotalsAccumulator::default();

        for product in products {
            let rate = params.rate_for(product.currency);
            if rate <= 0.0 {
                return Err(AllocationError::missing_rate(product.currency));
            }

            let volume_ratio = product.total_volume / total_volume;
            let per_unit = |value: f64| {
                if product.quantity > 0.0 {
                    value / product.quantity
                } else {
                    0.0
                }
            };

            // 海运费分摊（USD）
            let shipping_cost = params.container_cost * volume_ratio;
            let shipping_cost_per_unit = per_unit(shipping_cost);
            let shipping_cost_per_unit_local = shipping_cost_per_unit * params.usd_to_local_rate;

            // 货值折算本币
            let unit_price_local = product.unit_price * rate;

            // 本地固定费用分摊（本币）
            let local_transport_share = params.local_transport_cost * volume_ratio;
            let unloading_share = params.unloading_cost * volume_ratio;
            let additional_fees_share = params.additional_fees * volume_ratio;
            let local_transport_per_unit = per_unit(local_transport_share);
            let unloading_per_unit = per_unit(unloading_share);
            let additional_fees_per_unit = per_unit(additional_fees_share);

            // 到岸单件成本（本币）
            let final_cost_per_unit = unit_price_local
                + shipping_cost_per_unit_local
                + local_transport_per_unit
                + unloading_per_unit
                + additional_fees_per_unit;
            let vat_per_unit = final_cost_per_unit * params.import_tax_rate;
            let final_cost_per_unit_with_vat = final_cost_per_unit + vat_per_unit;
            let total_cost_local = final_cost_per_unit * product.quantity;

            acc.add(
                product,
                shipping_cost,
                local_transport_share,
                unloading_share,
                additional_fees_share,
                total_cost_local,
            );

            lines.push(CostLine {
                name: product.display_name(),
                currency: product.currency,
                quantity: product.quantity,
                total_volume: product.total_volume,
                volume_per_unit: product.volume_per_unit(),
                volume_ratio,
                unit_price: round2(product.unit_price),
                unit_price_local: round2(unit_price_local),
                shipping_cost: round2(shipping_cost),
                shipping_cost_per_unit: round2(shipping_cost_per_unit),
                shipping_cost_per_unit_local: round2(shipping_cost_per_unit_local),
                local_transport_share: round2(local_transport_share),
                unloading_share: round2(unloading_share),
                additional_fees_share: round2(additional_fees_share),
                local_transport_per_unit: round2(local_transport_per_unit),
                unloading_per_unit: round2(unloading_per_unit),
                additional_fees_per_unit: round2(additional_fees_per_unit),
                final_cost_per_unit: round2(final_cost_per_unit),
                vat_per_unit: round2(vat_per_unit),
                final_cost_per_unit_with_vat: round2(final_cost_per_unit_with_vat),
                total_cost_local: round2(total_cost_local),
                is_total: false,
            });
        }

        let totals = acc.into_totals(total_volume);
        let summary = Self::build_summary(products, params, total_volume);

        tracing::info!(
            products = lines.len(),
            total_volume,
            "成本分摊完成"
        );

        Ok(AllocationResult {
            lines,
            totals,
            summary,
        })
    }

    /// 前置校验
    fn validate(
        &self,
        products: &[ProductRecord],
        params: &ShipmentParameters,
    ) -> AllocateResult<()> {
        if products.is_empty() {
            return Err(AllocationError::invalid_shipment("产品列表为空"));
        }

        let total_volume: f64 = products.iter().map(|p| p.total_volume).sum();
        if total_volume <= 0.0 {
            return Err(AllocationError::invalid_shipment("产品总体积为 0"));
        }
        if total_volume > params.container_volume {
            return Err(AllocationError::invalid_shipment(format!(
                "产品总体积 {:.3} m³ 超出货柜容积 {:.3} m³",
                total_volume, params.container_volume
            )));
        }

        if !params.has_any_rate() {
            return Err(AllocationError::invalid_shipment("未配置任何本币汇率"));
        }

        // 海运费以 USD 计价,折算本币必须有 USD 汇率
        if params.container_cost > 0.0 && params.usd_to_local_rate <= 0.0 {
            return Err(AllocationError::missing_rate(Currency::Usd));
        }

        Ok(())
    }

    /// 对账汇总块（本地固定费用按申报额单独列示）
    fn build_summary(
        products: &[ProductRecord],
        params: &ShipmentParameters,
        total_volume: f64,
    ) -> AllocationSummary {
        let total_quantity: f64 = products.iter().map(|p| p.quantity).sum();
        let goods_cost = |currency: Currency| {
            products
                .iter()
                .filter(|p| p.currency == currency)
                .map(|p| p.total_price)
                .sum::<f64>()
        };

        let container_utilization = if params.container_volume > 0.0 {
            total_volume / params.container_volume
        } else {
            0.0
        };

        AllocationSummary {
            product_count: products.len(),
            total_quantity,
            total_volume,
            container_volume: params.container_volume,
            container_utilization,
            goods_cost_usd: round2(goods_cost(Currency::Usd)),
            goods_cost_rmb: round2(goods_cost(Currency::Rmb)),
            container_cost: round2(params.container_cost),
            local_transport_cost: round2(params.local_transport_cost),
            unloading_cost: round2(params.unloading_cost),
            additional_fees: round2(params.additional_fees),
        }
    }
}

impl Default for CostAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// TotalsAccumulator - 汇总行累加器
// ==========================================
// 说明: 绝对额字段逐产品累加（不舍入）,单件字段在汇总行恒为 0
#[derive(Debug, Default)]
struct TotalsAccumulator {
    quantity: f64,
    shipping_cost: f64,
    local_transport_share: f64,
    unloading_share: f64,
    additional_fees_share: f64,
    total_cost_local: f64,
}

impl TotalsAccumulator {
    fn add(
        &mut self,
        product: &ProductRecord,
        shipping_cost: f64,
        local_transport_share: f64,
        unloading_share: f64,
        additional_fees_share: f64,
        total_cost_local: f64,
    ) {
        self.quantity += product.quantity;
        self.shipping_cost += shipping_cost;
        self.local_transport_share += local_transport_share;
        self.unloading_share += unloading_share;
        self.additional_fees_share += additional_fees_share;
        self.total_cost_local += total_cost_local;
    }

    fn into_totals(self, total_volume: f64) -> CostLine {
        let volume_per_unit = if self.quantity > 0.0 {
            total_volume / self.quantity
        } else {
            0.0
        };

        CostLine {
            name: "TOTALS".to_string(),
            currency: Currency::Usd,
            quantity: self.quantity,
            total_volume,
            volume_per_unit,
            volume_ratio: 1.0,
            unit_price: 0.0,
            unit_price_local: 0.0,
            shipping_cost: round2(self.shipping_cost),
            shipping_cost_per_unit: 0.0,
            shipping_cost_per_unit_local: 0.0,
            local_transport_share: round2(self.local_transport_share),
            unloading_share: round2(self.unloading_share),
            additional_fees_share: round2(self.additional_fees_share),
            local_transport_per_unit: 0.0,
            unloading_per_unit: 0.0,
            additional_fees_per_unit: 0.0,
            final_cost_per_unit: 0.0,
            vat_per_unit: 0.0,
            final_cost_per_unit_with_vat: 0.0,
            total_cost_local: round2(self.total_cost_local),
            is_total: true,
        }
    }
}
