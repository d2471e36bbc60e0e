// ==========================================
// 进口货柜到岸成本核算系统 - 单元格标准化
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 1.2 单元格标准化规则
// 职责: 任意单元格内容 → 数字 / 修剪文本
// 红线: 全函数,任何输入都有返回值,永不失败
// ==========================================

use crate::extractor::grid::Cell;

/// 单元格 → 数字（宽松解析）
///
/// # 规则
/// - 空/空白/"nan" → 0
/// - 数字单元格 → 透传（NaN 按 0 处理）
/// - 文本: 去除货币符号（$）、千分位（,）及其他非数字非小数点字符后解析
/// - 无法解析 → 0
pub fn to_number(cell: &Cell) -> f64 {
    match cell {
        Cell::Empty => 0.0,
        Cell::Number(n) => {
            if n.is_nan() {
                0.0
            } else {
                *n
            }
        }
        Cell::Text(s) => parse_loose(s),
    }
}

/// 单元格 → 修剪文本
///
/// # 规则
/// - 空 → ""
/// - 数字 → 十进制字符串
/// - 文本 → 去首尾空白
pub fn to_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Number(n) => format_number(*n),
        Cell::Text(s) => s.trim().to_string(),
    }
}

/// 单元格 → 数字（严格解析,用于数据模式判定）
///
/// # 说明
/// - 数字单元格直接返回
/// - 文本仅接受标准浮点字面量（"2.5"）,不做字符剥离
/// - 其他 → None
pub fn strict_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
    }
}

/// 宽松数字解析（"$1,234.50" → 1234.5）
fn parse_loose(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return 0.0;
    }

    // 仅保留数字与小数点,其余字符（$ , 单位后缀等）一律剥离
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// 数字格式化（整数值不带小数位）
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
