// ==========================================
// 进口货柜到岸成本核算系统 - 列角色分类器
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 2.3 列角色分类
// 职责: 表头行 → 列角色映射（数量/单价/体积/...）
// 规则: 表头文本匹配优先;未解析角色回退为数据模式推断
// ==========================================

use crate::domain::product::ColumnRoleMap;
use crate::domain::types::Currency;
use crate::extractor::cell;
use crate::extractor::error::{ExtractError, ExtractResult};
use crate::extractor::grid::Grid;

// 数量列表头模式
const QUANTITY_PATTERNS: [&str; 7] = [
    "QTY", "QUANTITY", "(PCS)", "PCS", "UNITS", "PIECES", "NO.",
];

// 价格候选列表头模式
const PRICE_PATTERNS: [&str; 7] = ["PRICE", "COST", "AMOUNT", "USD", "$", "UNIT PRICE", "RATE"];

// 体积列表头模式
const VOLUME_PATTERNS: [&str; 7] = [
    "CBM", "VOLUME", "SIZE", "DIMENSION", "M3", "CUBIC", "SPACE",
];

// 数据推断采样行数（表头行之后）
const INFERENCE_SAMPLE_ROWS: usize = 9;

// 数据推断阈值
const QUANTITY_INTEGER_RATIO: f64 = 0.7; // 正整数占比 > 70% → 数量列
const PRICE_POSITIVE_RATIO: f64 = 0.5;   // 正数占比 > 50% → 价格列
const VOLUME_SMALL_RATIO: f64 = 0.3;     // 10 以下正数占比 > 30% → 体积列
const VOLUME_SMALL_MAX: f64 = 10.0;

// ==========================================
// ColumnClassifier - 列角色分类器
// ==========================================
pub struct ColumnClassifier;

impl ColumnClassifier {
    /// 分类表头行的列角色
    ///
    /// # 参数
    /// - grid: 表格
    /// - header_row: 表头行下标（由表头定位器给出）
    ///
    /// # 返回
    /// - Ok(ColumnRoleMap): 列角色映射（item 隐含默认第 0 列）
    /// - Err(ColumnsUnresolved): 解析角色不足 2 个
    ///
    /// # 规则
    /// - 同一模式多列命中时,后匹配覆盖前匹配（数量/体积）
    /// - 价格候选列取舍: 单价样式（UNIT/PER）优先 → 唯一候选直接采用
    ///   → 最左非合计样式（TOTAL/AMOUNT）→ 最左候选兜底
    /// - 报价货币由选中的价格列表头文本判定
    pub fn classify(grid: &Grid, header_row: usize) -> ExtractResult<ColumnRoleMap> {
        let header = grid.row(header_row).unwrap_or(&[]);

        let mut map = ColumnRoleMap::default();
        let mut price_candidates: Vec<(usize, String)> = Vec::new();
        let mut unit_price_like: Vec<usize> = Vec::new();
        let mut total_like: Vec<usize> = Vec::new();

        for (col, header_cell) in header.iter().enumerate() {
            let text = cell::to_text(header_cell);
            if text.is_empty() {
                continue;
            }
            let upper = text.to_uppercase();

            if QUANTITY_PATTERNS.iter().any(|p| upper.contains(p)) {
                map.quantity = Some(col);
            } else if PRICE_PATTERNS.iter().any(|p| upper.contains(p)) {
                if upper.contains("UNIT") || upper.contains("PER") {
                    unit_price_like.push(col);
                } else if upper.contains("TOTAL") || upper.contains("AMOUNT") {
                    total_like.push(col);
                }
                price_candidates.push((col, upper.clone()));
            } else if VOLUME_PATTERNS.iter().any(|p| upper.contains(p)) {
                map.volume = Some(col);
            }

            // 描述列独立识别,仅用于提取报告
            if map.description.is_none() && upper.contains("DESCRIPTION") {
                map.description = Some(col);
            }
        }

        map.unit_price = Self::select_price_column(&price_candidates, &unit_price_like);

        // 未被选为单价列的合计样式候选,记录为总金额列
        map.total_amount = total_like
            .iter()
            .copied()
            .find(|col| map.unit_price != Some(*col));

        // 报价货币: 选中的价格列表头文本一次性判定
        if let Some(price_col) = map.unit_price {
            if let Some((_, header_text)) =
                price_candidates.iter().find(|(col, _)| *col == price_col)
            {
                map.currency = Currency::from_price_header(header_text);
            }
        }

        // 数据模式推断回填（跳过已占用列）
        if map.quantity.is_none() {
            map.quantity = Self::infer_column(
                grid,
                header_row,
                &map,
                |v| v > 0.0 && v.fract() == 0.0,
                QUANTITY_INTEGER_RATIO,
            );
            if let Some(col) = map.quantity {
                tracing::debug!(col, "数量列由数据模式推断");
            }
        }
        if map.unit_price.is_none() {
            map.unit_price =
                Self::infer_column(grid, header_row, &map, |v| v > 0.0, PRICE_POSITIVE_RATIO);
            if let Some(col) = map.unit_price {
                tracing::debug!(col, "价格列由数据模式推断");
            }
        }
        if map.volume.is_none() {
            map.volume = Self::infer_column(
                grid,
                header_row,
                &map,
                |v| v > 0.0 && v < VOLUME_SMALL_MAX,
                VOLUME_SMALL_RATIO,
            );
            if let Some(col) = map.volume {
                tracing::debug!(col, "体积列由数据模式推断");
            }
        }

        let resolved = map.resolved_core_roles();
        if resolved < 2 {
            return Err(ExtractError::ColumnsUnresolved {
                header_row,
                resolved,
            });
        }

        Ok(map)
    }

    /// 价格列取舍
    fn select_price_column(
        candidates: &[(usize, String)],
        unit_price_like: &[usize],
    ) -> Option<usize> {
        if let Some(&col) = unit_price_like.first() {
            return Some(col);
        }

        match candidates {
            [] => None,
            [(col, _)] => Some(*col),
            _ => candidates
                .iter()
                .find(|(_, text)| !text.contains("TOTAL") && !text.contains("AMOUNT"))
                .map(|(col, _)| *col)
                .or_else(|| Some(candidates[0].0)),
        }
    }

    /// 数据模式推断: 表头后最多采样 INFERENCE_SAMPLE_ROWS 行,
    /// 返回首个满足（命中占比 > 阈值）的未占用列（自左向右）
    ///
    /// # 说明
    /// - 仅对有表头文本的列推断
    /// - 占比分母为该列非空采样数;文本按严格浮点解析
    fn infer_column(
        grid: &Grid,
        header_row: usize,
        map: &ColumnRoleMap,
        predicate: fn(f64) -> bool,
        threshold: f64,
    ) -> Option<usize> {
        let header = grid.row(header_row)?;
        let sample_end = (header_row + 1 + INFERENCE_SAMPLE_ROWS).min(grid.row_count());

        for (col, header_cell) in header.iter().enumerate() {
            if cell::to_text(header_cell).is_empty() {
                continue;
            }
            if map.is_assigned(col) {
                continue;
            }

            let mut sampled = 0usize;
            let mut hits = 0usize;

            for row in (header_row + 1)..sample_end {
                let c = grid.cell(row, col);
                if c.is_empty() {
                    continue;
                }
                sampled += 1;
                if let Some(value) = cell::strict_number(c) {
                    if predicate(value) {
                        hits += 1;
                    }
                }
            }

            if sampled > 0 && (hits as f64 / sampled as f64) > threshold {
                return Some(col);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::grid::Cell;

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::text(*c)).collect()
    }

    #[test]
    fn test_classify_standard_header() {
        let grid = Grid::from_rows(vec![text_row(&[
            "Item NO.",
            "DESCRIPTION",
            "QTY(PCS)",
            "PRICE(USD)",
            "CBM",
        ])]);

        let map = ColumnClassifier::classify(&grid, 0).unwrap();
        assert_eq!(map.item, 0);
        assert_eq!(map.description, Some(1));
        // "Item NO." 命中 NO. 后被 QTY(PCS) 覆盖
        assert_eq!(map.quantity, Some(2));
        assert_eq!(map.unit_price, Some(3));
        assert_eq!(map.volume, Some(4));
        assert_eq!(map.currency, Currency::Usd);
    }

    #[test]
    fn test_classify_rmb_price_header() {
        let grid = Grid::from_rows(vec![text_row(&["Item", "QTY", "UNIT PRICE (RMB)"])]);
        let map = ColumnClassifier::classify(&grid, 0).unwrap();
        assert_eq!(map.unit_price, Some(2));
        assert_eq!(map.currency, Currency::Rmb);
    }

    #[test]
    fn test_price_tiebreak_unit_price_first() {
        let grid = Grid::from_rows(vec![text_row(&[
            "Item",
            "QTY",
            "TOTAL AMOUNT",
            "UNIT PRICE",
        ])]);
        let map = ColumnClassifier::classify(&grid, 0).unwrap();
        assert_eq!(map.unit_price, Some(3));
        assert_eq!(map.total_amount, Some(2));
    }

    #[test]
    fn test_price_tiebreak_prefers_non_total() {
        let grid = Grid::from_rows(vec![text_row(&[
            "Item",
            "QTY",
            "TOTAL AMOUNT",
            "FOB PRICE",
        ])]);
        let map = ColumnClassifier::classify(&grid, 0).unwrap();
        assert_eq!(map.unit_price, Some(3));
    }

    #[test]
    fn test_price_tiebreak_single_candidate() {
        let grid = Grid::from_rows(vec![text_row(&["Item", "QTY", "AMOUNT"])]);
        let map = ColumnClassifier::classify(&grid, 0).unwrap();
        // 唯一候选直接采用（兼容只有总额列的旧格式）
        assert_eq!(map.unit_price, Some(2));
        assert_eq!(map.total_amount, None);
    }

    #[test]
    fn test_price_tiebreak_all_total_like_uses_leftmost() {
        let grid = Grid::from_rows(vec![text_row(&[
            "Item",
            "QTY",
            "TOTAL AMOUNT",
            "AMOUNT(USD)",
        ])]);
        let map = ColumnClassifier::classify(&grid, 0).unwrap();
        assert_eq!(map.unit_price, Some(2));
        assert_eq!(map.total_amount, Some(3));
    }

    #[test]
    fn test_infer_quantity_from_data() {
        // 表头无数量模式,第 2 列数据为正整数 → 推断为数量列
        let grid = Grid::from_rows(vec![
            text_row(&["Item", "颗粒数", "PRICE"]),
            vec![Cell::text("A1"), Cell::number(100.0), Cell::number(2.5)],
            vec![Cell::text("A2"), Cell::number(50.0), Cell::number(3.0)],
            vec![Cell::text("A3"), Cell::number(80.0), Cell::number(1.2)],
        ]);
        let map = ColumnClassifier::classify(&grid, 0).unwrap();
        assert_eq!(map.quantity, Some(1));
        assert_eq!(map.unit_price, Some(2));
    }

    #[test]
    fn test_infer_skips_assigned_columns() {
        // 价格列已由表头解析,体积推断不得复用该列
        let grid = Grid::from_rows(vec![
            text_row(&["Item", "PRICE", "容积"]),
            vec![Cell::text("A1"), Cell::number(2.5), Cell::number(0.05)],
            vec![Cell::text("A2"), Cell::number(3.0), Cell::number(0.11)],
        ]);
        let map = ColumnClassifier::classify(&grid, 0).unwrap();
        assert_eq!(map.unit_price, Some(1));
        assert_eq!(map.volume, Some(2));
    }

    #[test]
    fn test_classify_rejects_when_too_few_roles() {
        let grid = Grid::from_rows(vec![text_row(&["随便", "文本"])]);
        let result = ColumnClassifier::classify(&grid, 0);
        assert_eq!(
            result,
            Err(ExtractError::ColumnsUnresolved {
                header_row: 0,
                resolved: 1
            })
        );
    }
}
