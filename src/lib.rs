// ==========================================
// 进口货柜到岸成本核算系统 - 核心库
// ==========================================
// 依据: Import_Cost_Master_Spec.md - 系统宪法
// 系统定位: 供应商发票/装箱单提取 + 到岸成本分摊（尽力而为的启发式,人工最终确认）
// 红线: 核心无状态、可重入;单线程同步,无跨调用共享可变状态
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 提取层 - 表格结构推断
pub mod extractor;

// 引擎层 - 成本分摊
pub mod engine;

// 读取层 - 外部文件
pub mod reader;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ColumnRole, Currency};

// 领域实体
pub use domain::{
    AllocationResult, AllocationSummary, ColumnRoleMap, CostLine, ExtractionReport,
    ProductRecord, RowSkip, RowSkipReason, ShipmentParameters,
};

// 提取层
pub use extractor::{
    extract, Cell, ExtractError, ExtractionObserver, ExtractionOutcome, Grid, GridExtractor,
    NoOpObserver, StructureAnalyzer, StructureReport, TracingObserver,
};

// 引擎层
pub use engine::{AllocationError, CostAllocator};

// 读取层
pub use reader::{ReadError, UniversalGridReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "进口货柜到岸成本核算系统";

// ==========================================
// 预编译检查
// ==========================================
