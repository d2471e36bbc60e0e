// ==========================================
// 进口货柜到岸成本核算系统 - 提取管道
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 2.1 提取主流程
// 流程: 表头定位 → 列角色分类 → 产品区边界 → 逐行解析
// 红线: 无状态、可重入;批次级失败返回空列表 + 诊断原因,永不 panic
// ==========================================

use crate::domain::product::{ExtractionReport, ProductRecord};
use crate::extractor::column_classifier::ColumnClassifier;
use crate::extractor::error::ExtractError;
use crate::extractor::grid::Grid;
use crate::extractor::header_locator::HeaderLocator;
use crate::extractor::observer::{ExtractionEvent, ExtractionObserver, NoOpObserver};
use crate::extractor::product_block::ProductBlockExtractor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// ExtractionOutcome - 提取结果
// ==========================================
// 约定: error 为批次级诊断;行级诊断在 report.skips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub products: Vec<ProductRecord>,
    pub report: ExtractionReport,
    pub error: Option<ExtractError>,
}

// ==========================================
// GridExtractor - 表格提取器
// ==========================================
pub struct GridExtractor {
    observer: Arc<dyn ExtractionObserver>,
}

impl GridExtractor {
    /// 创建提取器（无事件上报）
    pub fn new() -> Self {
        Self {
            observer: Arc::new(NoOpObserver),
        }
    }

    /// 创建带观察者的提取器
    pub fn with_observer(observer: Arc<dyn ExtractionObserver>) -> Self {
        Self { observer }
    }

    /// 提取产品记录
    ///
    /// # 参数
    /// - grid: 原始表格（只读）
    ///
    /// # 返回
    /// - ExtractionOutcome: 产品列表 + 提取报告 + 批次级诊断
    ///
    /// # 提取流程（4 个阶段）
    /// 1. 表头定位（策略链）
    /// 2. 列角色分类（表头匹配 + 数据推断回填）
    /// 3. 产品区边界确定
    /// 4. 逐行解析（单元格标准化 + 货号文本分解）
    pub fn extract(&self, grid: &Grid) -> ExtractionOutcome {
        let mut report = ExtractionReport::empty(grid.row_count());
        tracing::info!(rows = grid.row_count(), "开始表格提取");

        // 阶段 1: 表头定位
        let header = match HeaderLocator::locate(grid) {
            Some(matched) => matched,
            None => {
                return self.fail(
                    report,
                    ExtractError::HeaderNotFound {
                        total_rows: grid.row_count(),
                    },
                );
            }
        };
        report.header_row = Some(header.row);
        report.header_strategy = Some(header.strategy.to_string());
        self.observer.notify(&ExtractionEvent::HeaderLocated {
            row: header.row,
            strategy: header.strategy.to_string(),
        });

        // 阶段 2: 列角色分类
        let columns = match ColumnClassifier::classify(grid, header.row) {
            Ok(columns) => columns,
            Err(err) => return self.fail(report, err),
        };
        report.columns = Some(columns.clone());
        self.observer.notify(&ExtractionEvent::ColumnsClassified {
            columns: columns.clone(),
        });

        // 阶段 3: 产品区边界
        let block = match ProductBlockExtractor::find_block(grid, header.row) {
            Ok(block) => block,
            Err(err) => return self.fail(report, err),
        };
        report.product_start_row = Some(block.start_row);
        report.product_end_row = Some(block.end_row);
        self.observer.notify(&ExtractionEvent::ProductRangeResolved {
            start_row: block.start_row,
            end_row: block.end_row,
        });

        // 阶段 4: 逐行解析
        let (products, skips) =
            ProductBlockExtractor::parse_rows(grid, &block, &columns, self.observer.as_ref());
        report.parsed_rows = products.len();
        report.skips = skips;

        // 有效行全部被跳过时,按批次级诊断上报
        let error = if products.is_empty() {
            Some(ExtractError::NoProductRows {
                header_row: header.row,
            })
        } else {
            None
        };
        if let Some(err) = &error {
            self.observer.notify(&ExtractionEvent::ExtractionFailed {
                reason: err.to_string(),
            });
        }

        tracing::info!(
            products = products.len(),
            skipped = report.skips.len(),
            "表格提取完成"
        );

        ExtractionOutcome {
            products,
            report,
            error,
        }
    }

    /// 批次级失败: 空产品列表 + 诊断原因
    fn fail(&self, report: ExtractionReport, err: ExtractError) -> ExtractionOutcome {
        tracing::warn!(error = %err, "表格提取失败");
        self.observer.notify(&ExtractionEvent::ExtractionFailed {
            reason: err.to_string(),
        });
        ExtractionOutcome {
            products: Vec::new(),
            report,
            error: Some(err),
        }
    }
}

impl Default for GridExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷入口: 以默认提取器提取产品记录
pub fn extract(grid: &Grid) -> ExtractionOutcome {
    GridExtractor::new().extract(grid)
}
