// ==========================================
// 进口货柜到岸成本核算系统 - 分摊引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 分摊失败对整次请求致命,不输出部分成本表
// ==========================================

use crate::domain::types::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 分摊引擎错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationError {
    // ===== 货柜参数校验 =====
    #[error("货柜参数校验失败: {message}")]
    InvalidShipment { message: String },

    // ===== 汇率配置 =====
    #[error("缺少汇率配置: {currency} 报价无法折算本币")]
    MissingExchangeRate { currency: Currency },
}

impl AllocationError {
    pub fn invalid_shipment(message: impl Into<String>) -> Self {
        Self::InvalidShipment {
            message: message.into(),
        }
    }

    pub fn missing_rate(currency: Currency) -> Self {
        Self::MissingExchangeRate { currency }
    }
}

/// Result 类型别名
pub type AllocateResult<T> = Result<T, AllocationError>;
