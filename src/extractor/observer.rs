// ==========================================
// 进口货柜到岸成本核算系统 - 提取事件观察者
// ==========================================
// 职责: 定义提取过程事件通知 trait,实现依赖倒置
// 说明: 提取管道只依赖 trait,宿主服务注入具体实现
// 红线: 观察者失败不得影响提取结果;管道保持纯函数、无 stdout 耦合
// ==========================================

use crate::domain::product::{ColumnRoleMap, RowSkip};
use serde::Serialize;

// ==========================================
// 提取事件
// ==========================================

/// 提取过程事件
///
/// 管道在各阶段产出的结构化诊断事件,用于日志、调试与宿主上报
#[derive(Debug, Clone, Serialize)]
pub enum ExtractionEvent {
    /// 表头定位命中
    HeaderLocated { row: usize, strategy: String },
    /// 列角色分类完成
    ColumnsClassified { columns: ColumnRoleMap },
    /// 产品区范围确定
    ProductRangeResolved { start_row: usize, end_row: usize },
    /// 单行解析成功
    ProductParsed { row: usize, code: String },
    /// 单行跳过（非致命）
    RowSkipped { skip: RowSkip },
    /// 批次级提取失败
    ExtractionFailed { reason: String },
}

impl ExtractionEvent {
    /// 转换为字符串标识
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionEvent::HeaderLocated { .. } => "HeaderLocated",
            ExtractionEvent::ColumnsClassified { .. } => "ColumnsClassified",
            ExtractionEvent::ProductRangeResolved { .. } => "ProductRangeResolved",
            ExtractionEvent::ProductParsed { .. } => "ProductParsed",
            ExtractionEvent::RowSkipped { .. } => "RowSkipped",
            ExtractionEvent::ExtractionFailed { .. } => "ExtractionFailed",
        }
    }
}

// ==========================================
// 观察者 Trait
// ==========================================

/// 提取事件观察者 Trait
///
/// 管道定义,宿主实现;通知为单向、不可失败
pub trait ExtractionObserver: Send + Sync {
    /// 接收提取事件
    fn notify(&self, event: &ExtractionEvent);
}

/// 空操作观察者
///
/// 用于不需要事件上报的场景（如单元测试、批处理）
#[derive(Debug, Clone, Default)]
pub struct NoOpObserver;

impl ExtractionObserver for NoOpObserver {
    fn notify(&self, _event: &ExtractionEvent) {}
}

/// tracing 日志观察者
///
/// 将提取事件写入结构化日志;行级事件用 debug,批次失败用 warn
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn notify(&self, event: &ExtractionEvent) {
        match event {
            ExtractionEvent::HeaderLocated { row, strategy } => {
                tracing::info!(row, strategy, "表头定位命中");
            }
            ExtractionEvent::ColumnsClassified { columns } => {
                tracing::info!(
                    quantity = ?columns.quantity,
                    unit_price = ?columns.unit_price,
                    volume = ?columns.volume,
                    currency = %columns.currency,
                    "列角色分类完成"
                );
            }
            ExtractionEvent::ProductRangeResolved { start_row, end_row } => {
                tracing::info!(start_row, end_row, "产品区范围确定");
            }
            ExtractionEvent::ProductParsed { row, code } => {
                tracing::debug!(row, code, "产品行解析成功");
            }
            ExtractionEvent::RowSkipped { skip } => {
                tracing::debug!(
                    row = skip.row_number,
                    reason = %skip.reason,
                    message = %skip.message,
                    "产品行跳过"
                );
            }
            ExtractionEvent::ExtractionFailed { reason } => {
                tracing::warn!(reason, "批次级提取失败");
            }
        }
    }
}
