// ==========================================
// 进口货柜到岸成本核算系统 - 货号单元格文本分解器
// ==========================================
// 依据: Extraction_Heuristics_v0.2.md - 2.5 货号单元格分解
// 职责: 多行打包文本 → 货号 / 供应商货号 / 规格描述
// 支持: ASCII ':' 与全角 '：' 两种标签分隔符
// ==========================================

use serde::{Deserialize, Serialize};

// 规格行关键词（命中即原样并入描述）
const SPEC_KEYWORDS: [&str; 7] = [
    "wheel",
    "handle",
    "deck",
    "size",
    "color",
    "product size",
    "y bar",
];

// ==========================================
// DecomposedText - 分解结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecomposedText {
    pub code: String,        // 货号（首个非空行的首个空白分隔词）
    pub item_number: String, // 供应商货号（"Item No." 标签行）
    pub description: String, // 规格描述（材质 + 规格行 + 包装,换行拼接）
}

/// 分解货号单元格文本
///
/// # 规则
/// - 无非空行 → None
/// - code = 首个非空行的首个空白分隔词
/// - "Item No." 标签行 → item_number（取最后一个冒号之后）
/// - "Material:" / "Packing:" 标签行 → 材质 / 包装
/// - 含规格关键词的行原样并入描述
/// - 描述 = 材质行 + 规格行 + 包装行;全部缺失且输入多于一行时,
///   回退为首行之后所有行的拼接
pub fn decompose(text: &str) -> Option<DecomposedText> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return None;
    }

    let code = lines[0]
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string();

    let mut item_number = String::new();
    let mut material = String::new();
    let mut packing = String::new();
    let mut specs: Vec<&str> = Vec::new();

    for &line in &lines {
        if line.contains("Item No.") {
            item_number = after_last_colon(line);
            continue;
        }

        if let Some(value) = labeled_suffix(line, "Material") {
            material = value;
            continue;
        }

        if let Some(value) = labeled_suffix(line, "Packing") {
            packing = value;
            continue;
        }

        let lower = line.to_lowercase();
        if SPEC_KEYWORDS.iter().any(|k| lower.contains(k)) {
            specs.push(line);
        }
    }

    // 描述拼装
    let mut parts: Vec<String> = Vec::new();
    if !material.is_empty() {
        parts.push(format!("Material: {}", material));
    }
    parts.extend(specs.iter().map(|s| s.to_string()));
    if !packing.is_empty() {
        parts.push(format!("Packing: {}", packing));
    }

    // 无标签行与规格行时回退: 首行之外的全部行
    if parts.is_empty() && lines.len() > 1 {
        parts.extend(lines[1..].iter().map(|s| s.to_string()));
    }

    Some(DecomposedText {
        code,
        item_number,
        description: parts.join("\n"),
    })
}

/// 取最后一个冒号（全角优先）之后的内容;无冒号时返回整行
fn after_last_colon(line: &str) -> String {
    if let Some(pos) = line.rfind('：') {
        line[pos + '：'.len_utf8()..].trim().to_string()
    } else if let Some(pos) = line.rfind(':') {
        line[pos + 1..].trim().to_string()
    } else {
        line.trim().to_string()
    }
}

/// 取 "Label:" / "Label：" 之后的内容;行内无该标签时返回 None
fn labeled_suffix(line: &str, label: &str) -> Option<String> {
    let ascii = format!("{}:", label);
    if let Some(pos) = line.rfind(&ascii) {
        return Some(line[pos + ascii.len()..].trim().to_string());
    }

    let fullwidth = format!("{}：", label);
    if let Some(pos) = line.rfind(&fullwidth) {
        return Some(line[pos + fullwidth.len()..].trim().to_string());
    }

    None
}
