// ==========================================
// 进口货柜到岸成本核算系统 - 表头定位器
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 2.2 表头定位策略链
// 职责: 在无固定模板的表格中定位最可能的表头行
// 红线: 策略实现为有序独立谓词函数,逐个尝试,首个命中即返回;
//       禁止嵌套条件分支堆叠,保证每个策略可独立测试
// ==========================================

use crate::extractor::cell;
use crate::extractor::grid::Grid;
use serde::{Deserialize, Serialize};

// 策略 1 扫描上限（表头总在文件顶部区域）
pub const HEADER_SCAN_LIMIT: usize = 15;

// 策略 1: 首列表头模式集（小写比对）
const FIRST_COLUMN_PATTERNS: [&str; 6] = [
    "item no",
    "item number",
    "item",
    "no.",
    "product",
    "description",
];

// 策略 1: 公司信息拒绝词（抬头/联系方式行不是表头）
const COMPANY_DENYLIST: [&str; 6] = ["company", "ltd", "tel", "email", "website", "contact"];

// 策略 2: 宽表头关键词集（大写比对,覆盖货号/数量/价格/体积/合计词汇）
pub(crate) const HEADER_KEYWORDS: [&str; 26] = [
    "ITEM",
    "NO",
    "NUMBER",
    "PRODUCT",
    "DESCRIPTION",
    "NAME",
    "QTY",
    "QUANTITY",
    "PCS",
    "PIECES",
    "UNITS",
    "PRICE",
    "COST",
    "AMOUNT",
    "USD",
    "$",
    "UNIT PRICE",
    "CBM",
    "VOLUME",
    "SIZE",
    "DIMENSION",
    "M3",
    "CUBIC",
    "TOTAL",
    "SUM",
    "GRAND",
];

// ==========================================
// HeaderMatch - 表头定位结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMatch {
    pub row: usize,               // 表头行下标
    pub strategy: &'static str,   // 命中的策略名
}

// 表头定位策略: 命中返回行下标,未命中返回 None
type HeaderStrategy = fn(&Grid) -> Option<usize>;

// 策略链（按优先级排序,首个命中即停止）
const STRATEGIES: [(&str, HeaderStrategy); 3] = [
    ("keyword_in_first_column", by_first_column_keyword),
    ("multi_keyword_scoring", by_multi_keyword_score),
    ("row_before_first_product", by_row_before_first_product),
];

// ==========================================
// HeaderLocator - 表头定位器
// ==========================================
pub struct HeaderLocator;

impl HeaderLocator {
    /// 定位表头行
    ///
    /// # 返回
    /// - Some(HeaderMatch): 命中行与策略名
    /// - None: 全部策略未命中（调用方应返回空结果,不得抛错中断）
    pub fn locate(grid: &Grid) -> Option<HeaderMatch> {
        for (name, strategy) in STRATEGIES {
            if let Some(row) = strategy(grid) {
                tracing::debug!(strategy = name, row, "表头定位命中");
                return Some(HeaderMatch { row, strategy: name });
            }
            tracing::trace!(strategy = name, "表头定位策略未命中");
        }
        None
    }
}

// ==========================================
// 策略 1: 首列关键词
// ==========================================
// 规则: 前 HEADER_SCAN_LIMIT 行内,首单元格文本命中表头模式、
//       长度 < 50 字符、且不含公司信息拒绝词 → 该行为表头
fn by_first_column_keyword(grid: &Grid) -> Option<usize> {
    let limit = grid.row_count().min(HEADER_SCAN_LIMIT);

    for idx in 0..limit {
        let first = cell::to_text(grid.cell(idx, 0));
        if first.is_empty() {
            continue;
        }

        let lower = first.to_lowercase();
        let looks_like_header = FIRST_COLUMN_PATTERNS.iter().any(|p| lower.contains(p));
        let short_enough = first.chars().count() < 50;
        let company_info = COMPANY_DENYLIST.iter().any(|w| lower.contains(w));

        if looks_like_header && short_enough && !company_info {
            return Some(idx);
        }
    }

    None
}

// ==========================================
// 策略 2: 多关键词计分
// ==========================================
// 规则: 一行中命中宽关键词集的单元格 ≥ 2 个 → 该行为表头
fn by_multi_keyword_score(grid: &Grid) -> Option<usize> {
    for idx in 0..grid.row_count() {
        if cell::to_text(grid.cell(idx, 0)).is_empty() {
            continue;
        }

        let row = match grid.row(idx) {
            Some(r) => r,
            None => continue,
        };

        let hits = row
            .iter()
            .filter(|c| {
                let upper = cell::to_text(c).to_uppercase();
                !upper.is_empty() && HEADER_KEYWORDS.iter().any(|k| upper.contains(k))
            })
            .count();

        if hits >= 2 {
            return Some(idx);
        }
    }

    None
}

// ==========================================
// 策略 3: 首个产品行的前一行
// ==========================================
// 规则: 自第 1 行起,首单元格含字母数字且长度 > 2 视为产品行;
//       其前一行首单元格短（< 20 字符）且含字母 → 前一行为表头
fn by_row_before_first_product(grid: &Grid) -> Option<usize> {
    for idx in 1..grid.row_count() {
        let first = cell::to_text(grid.cell(idx, 0));
        if first.is_empty() {
            continue;
        }

        let product_like =
            first.chars().any(|c| c.is_alphanumeric()) && first.chars().count() > 2;
        if !product_like {
            continue;
        }

        let prev = cell::to_text(grid.cell(idx - 1, 0));
        if !prev.is_empty()
            && prev.chars().count() < 20
            && prev.chars().any(|c| c.is_alphabetic())
        {
            return Some(idx - 1);
        }
    }

    None
}
