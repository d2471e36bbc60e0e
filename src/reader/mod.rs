// ==========================================
// 进口货柜到岸成本核算系统 - 读取层
// ==========================================
// 职责: 外部文件 → 无表头表格
// 支持: Excel, CSV
// 红线: 纯 I/O 胶水;格式启发式一律不在此层
// ==========================================

pub mod error;
pub mod file_reader;

// 重导出核心类型
pub use error::{ReadError, ReadResult};
pub use file_reader::{CsvGridReader, ExcelGridReader, GridSource, UniversalGridReader};
