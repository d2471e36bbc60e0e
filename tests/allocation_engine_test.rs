// ==========================================
// 进口货柜到岸成本核算系统 - 分摊引擎集成测试
// ==========================================
// 依据: Cost_Allocation_Rules_v0.2.md - 体积比例分摊
// 覆盖: 提取 → 编辑 → 分摊 全链路与守恒/失败语义
// ==========================================

use shipment_landed_cost::domain::types::Currency;
use shipment_landed_cost::engine::{AllocationError, CostAllocator};
use shipment_landed_cost::extractor::{extract, Cell, Grid};
use shipment_landed_cost::{ProductRecord, ShipmentParameters};

// ==========================================
// 辅助函数: 测试数据
// ==========================================
fn product(code: &str, quantity: f64, unit_price: f64, volume: f64) -> ProductRecord {
    ProductRecord {
        code: code.to_string(),
        item_number: String::new(),
        description: String::new(),
        quantity,
        unit_price,
        total_volume: volume,
        currency: Currency::Usd,
        total_price: if quantity > 0.0 && unit_price > 0.0 {
            quantity * unit_price
        } else {
            0.0
        },
    }
}

fn forty_foot_params() -> ShipmentParameters {
    ShipmentParameters {
        container_cost: 1000.0,
        container_volume: 10.0,
        import_tax_rate: 0.17,
        usd_to_local_rate: 3.7,
        rmb_to_local_rate: 0.52,
        local_transport_cost: 500.0,
        unloading_cost: 200.0,
        additional_fees: 100.0,
    }
}

// ==========================================
// 守恒性质
// ==========================================

#[test]
fn test_full_container_single_product_conservation() {
    // 独占货柜申报容积的产品,海运费分摊 = 货柜海运费（舍入范围内）
    let params = ShipmentParameters {
        container_volume: 8.0,
        ..forty_foot_params()
    };
    let products = [product("A100", 200.0, 1.2, 8.0)];

    let result = CostAllocator::new().allocate(&products, &params).unwrap();
    assert_eq!(result.lines[0].shipping_cost, 1000.0);
}

#[test]
fn test_two_product_volume_split() {
    // 体积 2.0 / 3.0,货柜 10 m³: 闲置容积不算错误,
    // 分摊比例按产品总体积 5.0 计 → 0.4 / 0.6
    let params = forty_foot_params();
    let products = [
        product("A100", 100.0, 2.5, 2.0),
        product("A200", 50.0, 3.0, 3.0),
    ];

    let result = CostAllocator::new().allocate(&products, &params).unwrap();
    assert_eq!(result.lines[0].shipping_cost, 400.0);
    assert_eq!(result.lines[1].shipping_cost, 600.0);
    assert_eq!(result.totals.shipping_cost, 1000.0);
    assert_eq!(result.totals.local_transport_share, 500.0);
    assert_eq!(result.totals.unloading_share, 200.0);
    assert_eq!(result.totals.additional_fees_share, 100.0);
}

// ==========================================
// 失败语义
// ==========================================

#[test]
fn test_overweight_volume_returns_invalid_shipment_and_no_lines() {
    let params = ShipmentParameters {
        container_volume: 4.0,
        ..forty_foot_params()
    };
    let products = [
        product("A100", 100.0, 2.5, 2.0),
        product("A200", 50.0, 3.0, 3.0),
    ];

    let result = CostAllocator::new().allocate(&products, &params);
    assert!(matches!(
        result,
        Err(AllocationError::InvalidShipment { .. })
    ));
}

#[test]
fn test_missing_rmb_rate_fails_whole_request() {
    let params = ShipmentParameters {
        rmb_to_local_rate: 0.0,
        ..forty_foot_params()
    };
    let mut rmb_product = product("B100", 10.0, 120.0, 1.0);
    rmb_product.currency = Currency::Rmb;
    let products = [product("A100", 100.0, 2.5, 2.0), rmb_product];

    let result = CostAllocator::new().allocate(&products, &params);
    assert_eq!(
        result.unwrap_err(),
        AllocationError::MissingExchangeRate {
            currency: Currency::Rmb
        }
    );
}

// ==========================================
// 提取 → 分摊 全链路
// ==========================================

fn invoice_grid() -> Grid {
    Grid::from_rows(vec![
        vec![Cell::text("Supplier: Golden Wheel Industrial")],
        vec![
            Cell::text("Item NO."),
            Cell::text("DESCRIPTION"),
            Cell::text("QTY(PCS)"),
            Cell::text("PRICE(USD)"),
            Cell::text("CBM"),
        ],
        vec![
            Cell::text("A100\nItem No.：X1"),
            Cell::text("Red widget"),
            Cell::number(100.0),
            Cell::number(2.5),
            Cell::number(2.0),
        ],
        vec![
            Cell::text("A200\nItem No.：X2"),
            Cell::text("Blue widget"),
            Cell::number(50.0),
            Cell::number(3.0),
            Cell::number(3.0),
        ],
        vec![Cell::text("TOTAL"), Cell::Empty, Cell::number(150.0)],
    ])
}

#[test]
fn test_extract_then_allocate_end_to_end() {
    let outcome = extract(&invoice_grid());
    assert_eq!(outcome.products.len(), 2);

    let result = CostAllocator::new()
        .allocate(&outcome.products, &forty_foot_params())
        .unwrap();

    assert_eq!(result.lines.len(), 2);
    assert_eq!(result.lines[0].name, "A100 - X1");
    assert_eq!(result.lines[0].shipping_cost, 400.0);
    assert_eq!(result.lines[1].shipping_cost, 600.0);

    // 对账汇总块
    assert_eq!(result.summary.product_count, 2);
    assert_eq!(result.summary.goods_cost_usd, 400.0);
    assert_eq!(result.summary.total_volume, 5.0);
}

#[test]
fn test_allocator_accepts_caller_edited_products() {
    // 调用方在提取与核算之间改动产品列表: 引擎不假设列表来自提取器
    let mut products = extract(&invoice_grid()).products;
    products[0].quantity = 120.0;
    products.push(product("MANUAL", 10.0, 7.0, 1.0));

    let result = CostAllocator::new()
        .allocate(&products, &forty_foot_params())
        .unwrap();

    assert_eq!(result.lines.len(), 3);
    assert_eq!(result.totals.quantity, 180.0);
    // 新总体积 6.0 → 手工行占比 1/6
    assert!((result.lines[2].volume_ratio - 1.0 / 6.0).abs() < 1e-9);
}

#[test]
fn test_per_unit_landed_cost_with_vat() {
    // 人工验算: 独占 4 m³,数量 100,单价 2.5 USD,汇率 3.7
    // 单件海运 = 1000/100 × 3.7 = 37.0
    // 单件本地份额 = (500+200+100)/100 = 8.0
    // 本币单价 = 9.25 → 合计 54.25,含税 ×1.17 = 63.4725 → 63.47
    let params = forty_foot_params();
    let products = [product("A100", 100.0, 2.5, 4.0)];

    let result = CostAllocator::new().allocate(&products, &params).unwrap();
    let line = &result.lines[0];
    assert_eq!(line.unit_price_local, 9.25);
    assert_eq!(line.shipping_cost_per_unit_local, 37.0);
    assert_eq!(line.final_cost_per_unit, 54.25);
    assert_eq!(line.final_cost_per_unit_with_vat, 63.47);
}
