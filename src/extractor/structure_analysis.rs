// ==========================================
// 进口货柜到岸成本核算系统 - 表格结构分析器
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 4. 结构诊断
// 职责: 产出只读结构诊断（表头候选/列数值画像/疑似产品行）,
//       供日志与未识别版式排查使用
// 红线: 纯诊断,不参与提取决策
// ==========================================

use crate::extractor::cell;
use crate::extractor::grid::Grid;
use crate::extractor::header_locator::HEADER_KEYWORDS;
use serde::{Deserialize, Serialize};

// 表头候选扫描行数
const CANDIDATE_SCAN_ROWS: usize = 15;
// 数据画像采样行数
const PROFILE_SAMPLE_ROWS: usize = 20;
// 数据画像列数上限
const PROFILE_COLUMN_LIMIT: usize = 7;
// 画像样本值保留个数
const PROFILE_SAMPLE_VALUES: usize = 5;
// 表头候选最低关键词命中数
const CANDIDATE_MIN_SCORE: usize = 2;

// ==========================================
// HeaderCandidate - 表头候选行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCandidate {
    pub row: usize,
    pub score: usize,        // 关键词命中单元格数
    pub cells: Vec<String>,  // 命中单元格（"Col{n}: {文本}"）
}

// ==========================================
// ColumnProfile - 列数值画像
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub column: usize,
    pub sampled: usize,       // 非空采样单元格数
    pub numeric: usize,       // 数值单元格数
    pub integers: usize,      // 整数值个数
    pub decimals: usize,      // 小数值个数
    pub numeric_ratio: f64,   // 数值占比（0..1）
    pub samples: Vec<f64>,    // 样本值（最多 5 个）
}

// ==========================================
// ProductRowCandidate - 疑似产品行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRowCandidate {
    pub row: usize,
    pub first_cell: String,      // 首单元格文本
    pub numeric_columns: usize,  // 行内数值单元格数（首列之外）
}

// ==========================================
// StructureReport - 结构诊断报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureReport {
    pub row_count: usize,
    pub column_count: usize,
    pub header_candidates: Vec<HeaderCandidate>,
    pub column_profiles: Vec<ColumnProfile>,
    pub product_candidates: Vec<ProductRowCandidate>,
}

// ==========================================
// StructureAnalyzer - 结构分析器
// ==========================================
pub struct StructureAnalyzer;

impl StructureAnalyzer {
    /// 分析表格结构
    pub fn analyze(grid: &Grid) -> StructureReport {
        let report = StructureReport {
            row_count: grid.row_count(),
            column_count: grid.column_count(),
            header_candidates: Self::scan_header_candidates(grid),
            column_profiles: Self::profile_columns(grid),
            product_candidates: Self::scan_product_candidates(grid),
        };

        tracing::debug!(
            rows = report.row_count,
            cols = report.column_count,
            header_candidates = report.header_candidates.len(),
            product_candidates = report.product_candidates.len(),
            "表格结构分析完成"
        );

        report
    }

    /// 扫描表头候选行（前 15 行,关键词命中 ≥ 2）
    fn scan_header_candidates(grid: &Grid) -> Vec<HeaderCandidate> {
        let mut candidates = Vec::new();
        let limit = grid.row_count().min(CANDIDATE_SCAN_ROWS);

        for row in 0..limit {
            if cell::to_text(grid.cell(row, 0)).is_empty() {
                continue;
            }
            let cells = match grid.row(row) {
                Some(r) => r,
                None => continue,
            };

            let mut matched = Vec::new();
            for (col, c) in cells.iter().enumerate() {
                let upper = cell::to_text(c).to_uppercase();
                if upper.is_empty() {
                    continue;
                }
                if HEADER_KEYWORDS.iter().any(|k| upper.contains(k)) {
                    matched.push(format!("Col{}: {}", col, upper));
                }
            }

            if matched.len() >= CANDIDATE_MIN_SCORE {
                candidates.push(HeaderCandidate {
                    row,
                    score: matched.len(),
                    cells: matched,
                });
            }
        }

        candidates
    }

    /// 列数值画像（前 7 列,第 1 行起采样 19 行）
    fn profile_columns(grid: &Grid) -> Vec<ColumnProfile> {
        let mut profiles = Vec::new();
        let col_limit = grid.column_count().min(PROFILE_COLUMN_LIMIT);
        let row_limit = grid.row_count().min(PROFILE_SAMPLE_ROWS);

        for col in 0..col_limit {
            let mut sampled = 0usize;
            let mut numeric = 0usize;
            let mut integers = 0usize;
            let mut decimals = 0usize;
            let mut samples = Vec::new();

            for row in 1..row_limit {
                let c = grid.cell(row, col);
                if c.is_empty() {
                    continue;
                }
                sampled += 1;

                if let Some(value) = cell::strict_number(c) {
                    numeric += 1;
                    if samples.len() < PROFILE_SAMPLE_VALUES {
                        samples.push(value);
                    }
                    if value.fract() == 0.0 {
                        integers += 1;
                    } else {
                        decimals += 1;
                    }
                }
            }

            if sampled > 0 {
                profiles.push(ColumnProfile {
                    column: col,
                    sampled,
                    numeric,
                    integers,
                    decimals,
                    numeric_ratio: numeric as f64 / sampled as f64,
                    samples,
                });
            }
        }

        profiles
    }

    /// 扫描疑似产品行（第 1 行起,首单元格含字母数字且行内有数值）
    fn scan_product_candidates(grid: &Grid) -> Vec<ProductRowCandidate> {
        let mut candidates = Vec::new();
        let limit = grid.row_count().min(PROFILE_SAMPLE_ROWS);

        for row in 1..limit {
            let first = cell::to_text(grid.cell(row, 0));
            if first.is_empty() {
                continue;
            }
            if !first.chars().any(|c| c.is_alphanumeric()) || first.chars().count() <= 2 {
                continue;
            }

            let cells = match grid.row(row) {
                Some(r) => r,
                None => continue,
            };
            let numeric_columns = cells
                .iter()
                .skip(1)
                .filter(|c| cell::strict_number(c).is_some())
                .count();

            if numeric_columns > 0 {
                candidates.push(ProductRowCandidate {
                    row,
                    first_cell: first,
                    numeric_columns,
                });
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::grid::Cell;

    fn sample_grid() -> Grid {
        Grid::from_rows(vec![
            vec![Cell::text("Shanghai Gifts Factory")],
            vec![
                Cell::text("Item NO."),
                Cell::text("QTY(PCS)"),
                Cell::text("PRICE(USD)"),
                Cell::text("CBM"),
            ],
            vec![
                Cell::text("A100 scooter"),
                Cell::number(100.0),
                Cell::number(2.5),
                Cell::number(0.05),
            ],
            vec![
                Cell::text("A200 kick board"),
                Cell::number(50.0),
                Cell::number(3.0),
                Cell::number(0.11),
            ],
        ])
    }

    #[test]
    fn test_header_candidates_scored() {
        let report = StructureAnalyzer::analyze(&sample_grid());
        assert_eq!(report.header_candidates.len(), 1);

        let candidate = &report.header_candidates[0];
        assert_eq!(candidate.row, 1);
        assert_eq!(candidate.score, 4);
    }

    #[test]
    fn test_column_profiles_detect_numeric_columns() {
        let report = StructureAnalyzer::analyze(&sample_grid());

        let qty = report
            .column_profiles
            .iter()
            .find(|p| p.column == 1)
            .unwrap();
        assert_eq!(qty.sampled, 3); // 表头文本 + 两个数值
        assert_eq!(qty.numeric, 2);
        assert_eq!(qty.integers, 2);

        let price = report
            .column_profiles
            .iter()
            .find(|p| p.column == 2)
            .unwrap();
        assert_eq!(price.decimals, 1); // 2.5 为小数,3.0 计入整数
        assert_eq!(price.samples, vec![2.5, 3.0]);
    }

    #[test]
    fn test_product_candidates() {
        let report = StructureAnalyzer::analyze(&sample_grid());
        assert_eq!(report.product_candidates.len(), 2);
        assert_eq!(report.product_candidates[0].row, 2);
        assert_eq!(report.product_candidates[0].numeric_columns, 3);
    }

    #[test]
    fn test_empty_grid_report() {
        let report = StructureAnalyzer::analyze(&Grid::default());
        assert_eq!(report.row_count, 0);
        assert!(report.header_candidates.is_empty());
        assert!(report.column_profiles.is_empty());
        assert!(report.product_candidates.is_empty());
    }
}
