// ==========================================
// 进口货柜到岸成本核算系统 - 提取模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 批次级失败（表头/列角色/产品区）返回空产品列表 + 诊断原因,
//       行级失败记入 RowSkip 诊断,永不中断整体提取
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 提取模块错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractError {
    // ===== 表头定位 =====
    #[error("表头定位失败: 全部 {total_rows} 行中未找到表头行")]
    HeaderNotFound { total_rows: usize },

    // ===== 列角色分类 =====
    #[error("列角色解析不足 (表头行 {header_row}): 仅解析 {resolved} 个角色,至少需要 2 个")]
    ColumnsUnresolved { header_row: usize, resolved: usize },

    // ===== 产品区边界 =====
    #[error("未找到有效产品数据行 (表头行 {header_row})")]
    NoProductRows { header_row: usize },
}

/// Result 类型别名
pub type ExtractResult<T> = Result<T, ExtractError>;
