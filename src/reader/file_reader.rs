// ==========================================
// 进口货柜到岸成本核算系统 - 文件读取器实现
// ==========================================
// 依据: Import_Cost_Master_Spec.md - 阶段 0: 文件读取
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 红线: 纯 I/O 胶水,无任何启发式;整表按无表头读入,
//       表头推断完全交给提取层
// ==========================================

use crate::extractor::grid::{Cell, Grid};
use crate::reader::error::{ReadError, ReadResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// GridSource Trait
// ==========================================
// 用途: 文件 → 表格读取接口（按格式分实现）
pub trait GridSource: Send + Sync {
    /// 读取文件为无表头表格
    fn read_grid(&self, file_path: &Path) -> ReadResult<Grid>;
}

// ==========================================
// CSV 读取器实现
// ==========================================
pub struct CsvGridReader;

impl GridSource for CsvGridReader {
    fn read_grid(&self, file_path: &Path) -> ReadResult<Grid> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ReadError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = file_path.extension() {
            if ext != "csv" {
                return Err(ReadError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        // 打开 CSV 文件（无表头模式:首行位置未知,交给提取层判定）
        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取所有行;空行保留,参与提取层的行号与边界判定
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(field_to_cell).collect());
        }

        Ok(Grid::from_rows(rows))
    }
}

// ==========================================
// Excel 读取器实现
// ==========================================
pub struct ExcelGridReader;

impl GridSource for ExcelGridReader {
    fn read_grid(&self, file_path: &Path) -> ReadResult<Grid> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ReadError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if ext != "xlsx" && ext != "xls" {
            return Err(ReadError::UnsupportedFormat(ext.to_string()));
        }

        // 打开工作簿（自动识别 xls/xlsx 引擎）
        let mut workbook = open_workbook_auto(file_path)
            .map_err(|e| ReadError::ExcelParseError(e.to_string()))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ReadError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ReadError::ExcelParseError(e.to_string()))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(data_to_cell).collect())
            .collect();

        Ok(Grid::from_rows(rows))
    }
}

// ==========================================
// 通用读取器（根据扩展名自动选择）
// ==========================================
pub struct UniversalGridReader;

impl UniversalGridReader {
    pub fn read<P: AsRef<Path>>(&self, file_path: P) -> ReadResult<Grid> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvGridReader.read_grid(path),
            "xlsx" | "xls" => ExcelGridReader.read_grid(path),
            _ => Err(ReadError::UnsupportedFormat(ext)),
        }
    }
}

/// CSV 字段 → 单元格（数值字面量转为数字,保留宽松文本给提取层）
fn field_to_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        Cell::Empty
    } else if let Ok(value) = trimmed.parse::<f64>() {
        Cell::Number(value)
    } else {
        Cell::Text(trimmed.to_string())
    }
}

/// calamine 单元格 → 单元格
fn data_to_cell(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_reader_full_grid() {
        // 创建临时 CSV 文件（含抬头行,无表头假设）
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Golden Wheel Trading,,,").unwrap();
        writeln!(temp_file, "Item NO.,QTY(PCS),PRICE(USD),CBM").unwrap();
        writeln!(temp_file, "A100,100,2.50,0.05").unwrap();

        let grid = CsvGridReader.read_grid(temp_file.path()).unwrap();

        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.cell(1, 0), &Cell::text("Item NO."));
        // 数值字面量转为数字
        assert_eq!(grid.cell(2, 1), &Cell::number(100.0));
        assert_eq!(grid.cell(2, 2), &Cell::number(2.5));
    }

    #[test]
    fn test_csv_reader_keeps_empty_cells() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "A100,,2.50").unwrap();

        let grid = CsvGridReader.read_grid(temp_file.path()).unwrap();
        assert_eq!(grid.cell(0, 1), &Cell::Empty);
    }

    #[test]
    fn test_csv_reader_file_not_found() {
        let result = CsvGridReader.read_grid(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ReadError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_reader_rejects_unknown_extension() {
        let result = UniversalGridReader.read("invoice.pdf");
        assert!(matches!(result, Err(ReadError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_field_to_cell() {
        assert_eq!(field_to_cell("  "), Cell::Empty);
        assert_eq!(field_to_cell("2.5"), Cell::number(2.5));
        assert_eq!(field_to_cell("A100"), Cell::text("A100"));
    }
}
