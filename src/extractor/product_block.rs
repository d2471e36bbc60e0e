// ==========================================
// 进口货柜到岸成本核算系统 - 产品区提取器
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 2.4 产品区边界与行解析
// 职责: 确定产品数据行范围,逐行解析为 ProductRecord
// 红线: 行级失败只记诊断并跳过,不中断整体提取
// ==========================================

use crate::domain::product::{ColumnRoleMap, ProductRecord, RowSkip, RowSkipReason};
use crate::extractor::cell;
use crate::extractor::error::{ExtractError, ExtractResult};
use crate::extractor::grid::Grid;
use crate::extractor::observer::{ExtractionEvent, ExtractionObserver};
use crate::extractor::text_decomposer;
use serde::{Deserialize, Serialize};

// 汇总行关键词（首单元格大写比对,命中即产品区结束）
const SUMMARY_KEYWORDS: [&str; 5] = ["TOTAL", "SUM", "GRAND TOTAL", "SUBTOTAL", "TOTALS"];

// ==========================================
// ProductBlock - 产品区范围
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBlock {
    pub start_row: usize, // 起始行（表头行 + 1）
    pub end_row: usize,   // 结束行（含）
}

// ==========================================
// ProductBlockExtractor - 产品区提取器
// ==========================================
pub struct ProductBlockExtractor;

impl ProductBlockExtractor {
    /// 确定产品区行范围
    ///
    /// # 规则（有序策略,首个命中即停止）
    /// 1. 首个无货号行（首单元格无字母数字内容）的前一行
    /// 2. 首个汇总行（TOTAL/SUM/...）的前一行
    /// 3. 数值突降行（本行无数值而前一行有数值）的前一行
    /// 4. 兜底: 最后一个非空行
    ///
    /// # 返回
    /// - Err(NoProductRows): 范围为空或无法确定
    pub fn find_block(grid: &Grid, header_row: usize) -> ExtractResult<ProductBlock> {
        let start_row = header_row + 1;
        if start_row >= grid.row_count() {
            return Err(ExtractError::NoProductRows { header_row });
        }

        let end_row = end_by_missing_code(grid, start_row)
            .or_else(|| end_by_summary_row(grid, start_row))
            .or_else(|| end_by_numeric_dropoff(grid, start_row))
            .or_else(|| end_by_last_non_empty(grid, start_row));

        match end_row {
            Some(end_row) if end_row >= start_row => Ok(ProductBlock { start_row, end_row }),
            _ => Err(ExtractError::NoProductRows { header_row }),
        }
    }

    /// 逐行解析产品区
    ///
    /// # 参数
    /// - columns: 列角色映射（缺失角色按 0 取值）
    /// - observer: 提取事件观察者（诊断用,不影响结果）
    ///
    /// # 返回
    /// - (产品记录列表, 行跳过诊断列表),记录与输入行同序
    pub fn parse_rows(
        grid: &Grid,
        block: &ProductBlock,
        columns: &ColumnRoleMap,
        observer: &dyn ExtractionObserver,
    ) -> (Vec<ProductRecord>, Vec<RowSkip>) {
        let mut products = Vec::new();
        let mut skips = Vec::new();

        let skip_row = |skips: &mut Vec<RowSkip>, skip: RowSkip| {
            observer.notify(&ExtractionEvent::RowSkipped { skip: skip.clone() });
            skips.push(skip);
        };

        for row in block.start_row..=block.end_row {
            if grid.is_row_empty(row) {
                continue;
            }

            let first_text = cell::to_text(grid.cell(row, 0));
            if !first_text.chars().any(|c| c.is_alphanumeric()) {
                skip_row(
                    &mut skips,
                    RowSkip {
                        row_number: row,
                        code: None,
                        reason: RowSkipReason::NoProductCode,
                        message: "首单元格无字母数字内容,无法取得货号".to_string(),
                    },
                );
                continue;
            }

            let decomposed = match text_decomposer::decompose(&first_text) {
                Some(d) if !d.code.is_empty() => d,
                _ => {
                    // 行级解析失败: 吞掉并跳过,不产出残缺记录
                    skip_row(
                        &mut skips,
                        RowSkip {
                            row_number: row,
                            code: None,
                            reason: RowSkipReason::ParseFailure,
                            message: "货号单元格文本分解失败".to_string(),
                        },
                    );
                    continue;
                }
            };

            let value_at = |role_col: Option<usize>| {
                role_col
                    .map(|col| cell::to_number(grid.cell(row, col)))
                    .unwrap_or(0.0)
            };
            let quantity = value_at(columns.quantity);
            let unit_price = value_at(columns.unit_price);
            let total_volume = value_at(columns.volume);

            let total_price = if quantity > 0.0 && unit_price > 0.0 {
                quantity * unit_price
            } else {
                0.0
            };

            let record = ProductRecord {
                code: decomposed.code,
                item_number: decomposed.item_number,
                description: decomposed.description,
                quantity,
                unit_price,
                total_volume,
                currency: columns.currency,
                total_price,
            };

            if !record.is_retainable() {
                skip_row(
                    &mut skips,
                    RowSkip {
                        row_number: row,
                        code: Some(record.code),
                        reason: RowSkipReason::NotRetained,
                        message: "数量与单价均为 0,不保留".to_string(),
                    },
                );
                continue;
            }

            observer.notify(&ExtractionEvent::ProductParsed {
                row,
                code: record.code.clone(),
            });
            products.push(record);
        }

        (products, skips)
    }
}

// ==========================================
// 结束行策略 1: 首个无货号行
// ==========================================
fn end_by_missing_code(grid: &Grid, start_row: usize) -> Option<usize> {
    for row in start_row..grid.row_count() {
        if grid.is_row_empty(row) {
            continue;
        }
        let first = cell::to_text(grid.cell(row, 0));
        if first.is_empty() || !first.chars().any(|c| c.is_alphanumeric()) {
            return Some(row.saturating_sub(1));
        }
    }
    None
}

// ==========================================
// 结束行策略 2: 汇总行
// ==========================================
fn end_by_summary_row(grid: &Grid, start_row: usize) -> Option<usize> {
    for row in start_row..grid.row_count() {
        let first = cell::to_text(grid.cell(row, 0));
        if first.is_empty() {
            continue;
        }
        let upper = first.to_uppercase();
        if SUMMARY_KEYWORDS.iter().any(|k| upper.contains(k)) {
            return Some(row.saturating_sub(1));
        }
    }
    None
}

// ==========================================
// 结束行策略 3: 数值突降
// ==========================================
// 规则: 本行有内容但无任何数值,且前一行至少有一个数值 → 前一行为结束行
fn end_by_numeric_dropoff(grid: &Grid, start_row: usize) -> Option<usize> {
    for row in start_row..grid.row_count() {
        if cell::to_text(grid.cell(row, 0)).is_empty() {
            continue;
        }

        let (cells, numeric) = count_numeric_cells(grid, row);
        if cells > 0 && numeric == 0 {
            let (prev_cells, prev_numeric) = count_numeric_cells(grid, row.saturating_sub(1));
            if prev_cells > 0 && prev_numeric > 0 {
                return Some(row - 1);
            }
        }
    }
    None
}

// ==========================================
// 结束行策略 4: 兜底 - 最后一个非空行
// ==========================================
fn end_by_last_non_empty(grid: &Grid, start_row: usize) -> Option<usize> {
    (start_row..grid.row_count())
        .rev()
        .find(|&row| !grid.is_row_empty(row))
}

/// 统计一行中的（非空单元格数, 数值单元格数）;文本按严格浮点解析
fn count_numeric_cells(grid: &Grid, row: usize) -> (usize, usize) {
    let cells = match grid.row(row) {
        Some(r) => r,
        None => return (0, 0),
    };

    let mut non_empty = 0usize;
    let mut numeric = 0usize;
    for c in cells {
        if c.is_empty() {
            continue;
        }
        non_empty += 1;
        if cell::strict_number(c).is_some() {
            numeric += 1;
        }
    }
    (non_empty, numeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Currency;
    use crate::extractor::grid::Cell;
    use crate::extractor::observer::NoOpObserver;

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::text(*c)).collect()
    }

    fn product_row(code: &str, qty: f64, price: f64, volume: f64) -> Vec<Cell> {
        vec![
            Cell::text(code),
            Cell::number(qty),
            Cell::number(price),
            Cell::number(volume),
        ]
    }

    fn test_columns() -> ColumnRoleMap {
        ColumnRoleMap {
            quantity: Some(1),
            unit_price: Some(2),
            volume: Some(3),
            currency: Currency::Usd,
            ..ColumnRoleMap::default()
        }
    }

    #[test]
    fn test_find_block_ends_before_summary_row() {
        let grid = Grid::from_rows(vec![
            text_row(&["Item NO.", "QTY", "PRICE", "CBM"]),
            product_row("A100", 100.0, 2.5, 0.05),
            product_row("A200", 50.0, 3.0, 0.11),
            text_row(&["TOTAL", "150"]),
        ]);
        let block = ProductBlockExtractor::find_block(&grid, 0).unwrap();
        assert_eq!(block.start_row, 1);
        assert_eq!(block.end_row, 2);
    }

    #[test]
    fn test_find_block_ends_before_codeless_row() {
        let grid = Grid::from_rows(vec![
            text_row(&["Item NO.", "QTY"]),
            product_row("A100", 100.0, 2.5, 0.05),
            vec![Cell::text("***"), Cell::Empty],
        ]);
        let block = ProductBlockExtractor::find_block(&grid, 0).unwrap();
        assert_eq!(block.end_row, 1);
    }

    #[test]
    fn test_find_block_numeric_dropoff() {
        let grid = Grid::from_rows(vec![
            text_row(&["Item NO.", "QTY"]),
            product_row("A100", 100.0, 2.5, 0.05),
            text_row(&["thanks for your order", "see remarks"]),
        ]);
        let block = ProductBlockExtractor::find_block(&grid, 0).unwrap();
        assert_eq!(block.end_row, 1);
    }

    #[test]
    fn test_find_block_falls_back_to_last_non_empty() {
        let grid = Grid::from_rows(vec![
            text_row(&["Item NO.", "QTY"]),
            product_row("A100", 100.0, 2.5, 0.05),
            product_row("A200", 50.0, 3.0, 0.11),
            vec![Cell::Empty, Cell::Empty],
        ]);
        let block = ProductBlockExtractor::find_block(&grid, 0).unwrap();
        assert_eq!(block.end_row, 2);
    }

    #[test]
    fn test_find_block_no_rows_after_header() {
        let grid = Grid::from_rows(vec![text_row(&["Item NO.", "QTY"])]);
        assert_eq!(
            ProductBlockExtractor::find_block(&grid, 0),
            Err(ExtractError::NoProductRows { header_row: 0 })
        );
    }

    #[test]
    fn test_parse_rows_builds_records_in_order() {
        let grid = Grid::from_rows(vec![
            text_row(&["Item NO.", "QTY", "PRICE", "CBM"]),
            product_row("A100", 100.0, 2.5, 0.05),
            product_row("A200", 50.0, 3.0, 0.11),
        ]);
        let block = ProductBlock {
            start_row: 1,
            end_row: 2,
        };
        let (products, skips) =
            ProductBlockExtractor::parse_rows(&grid, &block, &test_columns(), &NoOpObserver);

        assert_eq!(products.len(), 2);
        assert!(skips.is_empty());
        assert_eq!(products[0].code, "A100");
        assert_eq!(products[0].total_price, 250.0);
        assert_eq!(products[1].code, "A200");
        assert_eq!(products[1].total_price, 150.0);
    }

    #[test]
    fn test_parse_rows_skips_codeless_row() {
        let grid = Grid::from_rows(vec![
            product_row("A100", 100.0, 2.5, 0.05),
            vec![Cell::text("---"), Cell::number(1.0)],
        ]);
        let block = ProductBlock {
            start_row: 0,
            end_row: 1,
        };
        let (products, skips) =
            ProductBlockExtractor::parse_rows(&grid, &block, &test_columns(), &NoOpObserver);

        assert_eq!(products.len(), 1);
        assert_eq!(skips.len(), 1);
        assert_eq!(skips[0].row_number, 1);
        assert_eq!(skips[0].reason, RowSkipReason::NoProductCode);
    }

    #[test]
    fn test_parse_rows_drops_zero_value_record() {
        let grid = Grid::from_rows(vec![product_row("A100", 0.0, 0.0, 0.05)]);
        let block = ProductBlock {
            start_row: 0,
            end_row: 0,
        };
        let (products, skips) =
            ProductBlockExtractor::parse_rows(&grid, &block, &test_columns(), &NoOpObserver);

        assert!(products.is_empty());
        assert_eq!(skips[0].reason, RowSkipReason::NotRetained);
        assert_eq!(skips[0].code.as_deref(), Some("A100"));
    }

    #[test]
    fn test_parse_rows_total_price_zero_when_price_missing() {
        let grid = Grid::from_rows(vec![product_row("A100", 100.0, 0.0, 0.05)]);
        let block = ProductBlock {
            start_row: 0,
            end_row: 0,
        };
        let (products, _) =
            ProductBlockExtractor::parse_rows(&grid, &block, &test_columns(), &NoOpObserver);

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].total_price, 0.0);
    }

    #[test]
    fn test_parse_rows_missing_role_reads_zero() {
        let columns = ColumnRoleMap {
            quantity: Some(1),
            unit_price: Some(2),
            volume: None, // 体积列未解析 → 0
            currency: Currency::Usd,
            ..ColumnRoleMap::default()
        };
        let grid = Grid::from_rows(vec![product_row("A100", 10.0, 1.5, 0.05)]);
        let block = ProductBlock {
            start_row: 0,
            end_row: 0,
        };
        let (products, _) = ProductBlockExtractor::parse_rows(&grid, &block, &columns, &NoOpObserver);

        assert_eq!(products[0].total_volume, 0.0);
        assert_eq!(products[0].total_price, 15.0);
    }
}
