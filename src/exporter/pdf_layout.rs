// ==========================================
// 考勤表客户端 - PDF 版面计算
// ==========================================
// 纯几何计算，不依赖 PDF 库:
// - 页面尺寸 / 边距 / 字号分级
// - 列宽（按最小宽度，超宽时等比缩放，缩放下限 0.6）
// - 行高与纵向分页
// - 缩放后仍超宽时横向分页，每个横向分页重复首列（Sr No）
// - 单元格配色
// 坐标单位: mm，原点在页面左上角
// ==========================================

use crate::domain::types::{AttendanceMark, StatusTier};
use crate::exporter::report_builder::{ColumnKind, ReportTable};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const PAGE_MARGIN: f32 = 8.0;
pub const TABLE_START_Y: f32 = 24.0;
pub const FOOTER_SPACE: f32 = 10.0;
pub const HEADER_ROW_HEIGHT: f32 = 6.0;
pub const MIN_ROW_HEIGHT: f32 = 3.5;
pub const MAX_ROW_HEIGHT: f32 = 8.0;
/// 列宽缩放下限，低于此值改为横向分页
pub const MIN_SCALE: f32 = 0.6;

pub const TITLE_FONT_SIZE: f32 = 16.0;
pub const SUBTITLE_FONT_SIZE: f32 = 10.0;
pub const META_FONT_SIZE: f32 = 7.0;
pub const CONTINUATION_FONT_SIZE: f32 = 12.0;
pub const FOOTER_FONT_SIZE: f32 = 7.0;

pub const TITLE_Y: f32 = 10.0;
pub const SUBTITLE_Y: f32 = 16.0;
pub const META_Y: f32 = 21.0;
/// 页脚基线距页面底边
pub const FOOTER_OFFSET: f32 = 5.0;

/// pt → mm
const PT_TO_MM: f32 = 0.352_778;
/// Helvetica 平均字宽（em）
const AVG_CHAR_EM: f32 = 0.5;

// ==========================================
// 颜色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const HEADER_FILL: Rgb = Rgb(16, 185, 129);
pub const HEADER_TEXT: Rgb = Rgb(255, 255, 255);
pub const ALT_ROW_FILL: Rgb = Rgb(248, 250, 252);
pub const GRID_LINE: Rgb = Rgb(200, 200, 200);
pub const BODY_TEXT: Rgb = Rgb(0, 0, 0);
pub const FOOTER_TEXT: Rgb = Rgb(100, 100, 100);

// ==========================================
// 页面方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl Orientation {
    /// A4 尺寸 (宽, 高)
    pub fn page_size(&self) -> (f32, f32) {
        match self {
            Orientation::Portrait => (210.0, 297.0),
            Orientation::Landscape => (297.0, 210.0),
        }
    }

    fn pick(&self, portrait: f32, landscape: f32) -> f32 {
        match self {
            Orientation::Portrait => portrait,
            Orientation::Landscape => landscape,
        }
    }

    /// 表头字号
    pub fn head_font_size(&self) -> f32 {
        self.pick(6.0, 7.0)
    }

    /// 各列正文字号
    pub fn body_font_size(&self, kind: &ColumnKind) -> f32 {
        match kind {
            ColumnKind::SerialNo | ColumnKind::Name | ColumnKind::RollNo => self.pick(6.0, 7.0),
            ColumnKind::Custom(_) => self.pick(5.5, 6.5),
            ColumnKind::Day(_) => self.pick(5.0, 6.0),
            _ => self.pick(5.5, 6.5),
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            other => Err(format!("未知页面方向: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// 列最小宽度（mm）
pub fn min_column_width(kind: &ColumnKind) -> f32 {
    match kind {
        ColumnKind::SerialNo => 7.0,
        ColumnKind::Name => 25.0,
        ColumnKind::RollNo => 12.0,
        ColumnKind::Custom(_) => 12.0,
        ColumnKind::Day(_) => 4.0,
        ColumnKind::Percentage | ColumnKind::Status => 12.0,
        ColumnKind::TotalPresent | ColumnKind::TotalAbsent | ColumnKind::TotalLate => 10.0,
    }
}

pub fn column_align(kind: &ColumnKind) -> Align {
    match kind {
        ColumnKind::Name | ColumnKind::Custom(_) => Align::Left,
        _ => Align::Center,
    }
}

/// 单元格样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fill: Option<Rgb>,
    pub text: Rgb,
    pub bold: bool,
}

impl CellStyle {
    const PLAIN: CellStyle = CellStyle {
        fill: None,
        text: BODY_TEXT,
        bold: false,
    };
}

/// 日期列按标记着色
pub fn mark_style(mark: Option<AttendanceMark>) -> CellStyle {
    match mark {
        Some(AttendanceMark::Present) => CellStyle {
            fill: Some(Rgb(209, 250, 229)),
            text: Rgb(6, 95, 70),
            bold: true,
        },
        Some(AttendanceMark::Absent) => CellStyle {
            fill: Some(Rgb(254, 226, 226)),
            text: Rgb(153, 27, 27),
            bold: true,
        },
        Some(AttendanceMark::Late) => CellStyle {
            fill: Some(Rgb(254, 243, 199)),
            text: Rgb(146, 64, 14),
            bold: true,
        },
        None => CellStyle::PLAIN,
    }
}

/// 状态列按分级着色文字
pub fn status_style(tier: StatusTier) -> CellStyle {
    let text = match tier {
        StatusTier::Excellent => Rgb(6, 95, 70),
        StatusTier::Good => Rgb(30, 64, 175),
        StatusTier::Moderate => Rgb(146, 64, 14),
        StatusTier::AtRisk => Rgb(153, 27, 27),
    };
    CellStyle {
        fill: None,
        text,
        bold: true,
    }
}

pub fn plain_style() -> CellStyle {
    CellStyle::PLAIN
}

/// 估算 Helvetica 文本宽度（mm）
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVG_CHAR_EM * PT_TO_MM
}

/// 截断到给定宽度，超出部分以 ".." 结尾
pub fn fit_text(text: &str, width: f32, font_size: f32) -> String {
    if text_width(text, font_size) <= width {
        return text.to_string();
    }
    let per_char = font_size * AVG_CHAR_EM * PT_TO_MM;
    let max_chars = (width / per_char).floor() as usize;
    if max_chars <= 2 {
        return text.chars().take(max_chars).collect();
    }
    let mut fitted: String = text.chars().take(max_chars - 2).collect();
    fitted.push_str("..");
    fitted
}

// ==========================================
// PdfLayout - 版面计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    /// 1 起
    pub number: usize,
    pub columns: Vec<usize>,
    pub rows: Range<usize>,
}

impl PageSpec {
    pub fn is_first(&self) -> bool {
        self.number == 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub orientation: Orientation,
    pub page_width: f32,
    pub page_height: f32,
    pub scale: f32,
    pub column_widths: Vec<f32>,
    pub row_height: f32,
    pub rows_per_page: usize,
    /// 横向分页的列组（每组为列下标）
    pub column_groups: Vec<Vec<usize>>,
    pub pages: Vec<PageSpec>,
}

impl PdfLayout {
    pub fn compute(table: &ReportTable, orientation: Orientation) -> Self {
        let (page_width, page_height) = orientation.page_size();
        let available_width = page_width - PAGE_MARGIN * 2.0;

        let min_widths: Vec<f32> = table
            .columns
            .iter()
            .map(|c| min_column_width(&c.kind))
            .collect();
        let required: f32 = min_widths.iter().sum();

        let scale = if required > available_width {
            (available_width / required).max(MIN_SCALE)
        } else {
            1.0
        };
        let column_widths: Vec<f32> = min_widths.iter().map(|w| w * scale).collect();
        let column_groups = split_columns(&column_widths, available_width);

        let available_height = page_height - TABLE_START_Y - FOOTER_SPACE;
        let student_count = table.rows.len().max(1) as f32;
        let row_height = ((available_height - HEADER_ROW_HEIGHT) / student_count)
            .clamp(MIN_ROW_HEIGHT, MAX_ROW_HEIGHT);
        let rows_per_page =
            (((available_height - HEADER_ROW_HEIGHT) / row_height).floor() as usize).max(1);

        let row_chunks = chunk_rows(table.rows.len(), rows_per_page);
        let mut pages = Vec::new();
        for group in &column_groups {
            for rows in &row_chunks {
                pages.push(PageSpec {
                    number: pages.len() + 1,
                    columns: group.clone(),
                    rows: rows.clone(),
                });
            }
        }

        Self {
            orientation,
            page_width,
            page_height,
            scale,
            column_widths,
            row_height,
            rows_per_page,
            column_groups,
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 某列组的总宽
    pub fn group_width(&self, columns: &[usize]) -> f32 {
        columns.iter().map(|&c| self.column_widths[c]).sum()
    }
}

/// 横向分组；第 2 组起重复第 0 列
fn split_columns(widths: &[f32], available: f32) -> Vec<Vec<usize>> {
    if widths.is_empty() {
        return vec![Vec::new()];
    }
    // 浮点误差容忍
    let limit = available + 0.01;

    let mut groups = Vec::new();
    let mut current = vec![0];
    let mut used = widths[0];
    for (index, &width) in widths.iter().enumerate().skip(1) {
        if used + width > limit && current.len() > 1 {
            groups.push(std::mem::take(&mut current));
            current.push(0);
            used = widths[0];
        }
        current.push(index);
        used += width;
    }
    groups.push(current);
    groups
}

fn chunk_rows(total: usize, per_page: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return vec![0..0];
    }
    (0..total)
        .step_by(per_page)
        .map(|start| start..(start + per_page).min(total))
        .collect()
}
