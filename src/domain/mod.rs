// ==========================================
// 进口货柜到岸成本核算系统 - 领域层
// ==========================================
// 依据: Import_Cost_Master_Spec.md - PART B 数据模型
// 职责: 实体与值类型定义,不含业务规则
// ==========================================

pub mod product;
pub mod shipment;
pub mod types;

// 重导出核心类型
pub use product::{ColumnRoleMap, ExtractionReport, ProductRecord, RowSkip, RowSkipReason};
pub use shipment::{AllocationResult, AllocationSummary, CostLine, ShipmentParameters};
pub use types::{ColumnRole, Currency};
