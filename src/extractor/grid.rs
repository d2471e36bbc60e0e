// ==========================================
// 进口货柜到岸成本核算系统 - 表格抽象
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 1. 表格模型
// 职责: 行优先二维单元格网格,无任何表头假设
// 红线: 提取阶段只读;构建后不可变
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Cell - 单元格
// ==========================================
// 序列化格式: 无标签（空 → null,数字 → number,文本 → string）
// 与宿主服务传递的 JSON 二维数组一一对应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// 文本单元格构造
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// 数字单元格构造
    pub fn number(value: f64) -> Self {
        Cell::Number(value)
    }

    /// 是否为空（空单元格或纯空白文本）
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

// 越界访问统一返回的空单元格
static EMPTY_CELL: Cell = Cell::Empty;

// ==========================================
// Grid - 表格
// ==========================================
// 用途: 提取管道唯一输入;行与行之间长度允许不一致
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// 从行数据构建表格
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// 表格总行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 最大列数（行长度不一致时取最大值）
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// 按下标取行
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// 按下标取单元格（行/列越界返回空单元格,调用方无需边界判断）
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 整行是否为空（不存在的行视为空行）
    pub fn is_row_empty(&self, index: usize) -> bool {
        match self.rows.get(index) {
            Some(row) => row.iter().all(|c| c.is_empty()),
            None => true,
        }
    }
}
