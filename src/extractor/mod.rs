// ==========================================
// 进口货柜到岸成本核算系统 - 提取层
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 提取管道
// ==========================================
// 职责: 无固定模板表格 → 结构化产品记录
// 红线: 尽力而为的启发式分类,优雅降级;失败输出结构化诊断,永不 panic
// ==========================================

// 模块声明
pub mod cell;
pub mod column_classifier;
pub mod error;
pub mod grid;
pub mod header_locator;
pub mod observer;
pub mod pipeline;
pub mod product_block;
pub mod structure_analysis;
pub mod text_decomposer;

// 重导出核心类型
pub use column_classifier::ColumnClassifier;
pub use error::{ExtractError, ExtractResult};
pub use grid::{Cell, Grid};
pub use header_locator::{HeaderLocator, HeaderMatch, HEADER_SCAN_LIMIT};
pub use observer::{ExtractionEvent, ExtractionObserver, NoOpObserver, TracingObserver};
pub use pipeline::{extract, ExtractionOutcome, GridExtractor};
pub use product_block::{ProductBlock, ProductBlockExtractor};
pub use structure_analysis::{StructureAnalyzer, StructureReport};
pub use text_decomposer::{decompose, DecomposedText};
