// ==========================================
// 进口货柜到岸成本核算系统 - 引擎层
// ==========================================
// 依据: Cost_Allocation_Rules_v0.2.md - 分摊引擎
// ==========================================
// 职责: 实现成本分摊业务规则
// 红线: 引擎无状态,纯函数;失败对整次请求致命,不输出部分成本表
// ==========================================

pub mod allocator;
pub mod error;

// 重导出核心引擎
pub use allocator::{round2, CostAllocator};
pub use error::{AllocateResult, AllocationError};
