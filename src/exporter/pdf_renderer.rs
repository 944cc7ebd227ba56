// ==========================================
// 考勤表客户端 - PDF 渲染
// ==========================================
// 按 PdfLayout 的分页结果绘制:
// - 第 1 页: 标题 / 副标题 / 元信息
// - 后续页: "<班级> - Continued"
// - 每页: 表头 + 正文 + "Page i of n" 页脚
// printpdf 坐标原点在左下角，绘制时统一换算
// ==========================================

use crate::exporter::error::ExportResult;
use crate::exporter::pdf_layout::{
    column_align, fit_text, mark_style, plain_style, status_style, text_width, Align, CellStyle,
    Orientation, PageSpec, PdfLayout, Rgb, ALT_ROW_FILL, CONTINUATION_FONT_SIZE, FOOTER_FONT_SIZE,
    FOOTER_OFFSET, FOOTER_TEXT, GRID_LINE, HEADER_FILL, HEADER_ROW_HEIGHT, HEADER_TEXT,
    META_FONT_SIZE, META_Y, PAGE_MARGIN, SUBTITLE_FONT_SIZE, SUBTITLE_Y, TABLE_START_Y,
    TITLE_FONT_SIZE, TITLE_Y,
};
use crate::exporter::report_builder::{mark_of, ColumnKind, ReportTable};
use chrono::NaiveDate;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect,
    Rgb as PdfRgb,
};
use tracing::{debug, instrument};

const PT_TO_MM: f32 = 0.352_778;
const CELL_PADDING: f32 = 0.5;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        rgb.0 as f32 / 255.0,
        rgb.1 as f32 / 255.0,
        rgb.2 as f32 / 255.0,
        None,
    ))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    /// 渲染为 PDF 字节
    ///
    /// # 参数
    /// - generated_on: 元信息中的生成日期
    #[instrument(skip(self, table), fields(class_id = %table.class_id, rows = table.rows.len()))]
    pub fn render(
        &self,
        table: &ReportTable,
        orientation: Orientation,
        generated_on: NaiveDate,
    ) -> ExportResult<Vec<u8>> {
        let layout = PdfLayout::compute(table, orientation);
        let (width, height) = (layout.page_width, layout.page_height);

        let (doc, first_page, first_layer) =
            PdfDocument::new(&table.class_name, Mm(width), Mm(height), "Layer 1");
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        };

        let total = layout.page_count();
        for page in &layout.pages {
            let layer = if page.is_first() {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (p, l) = doc.add_page(Mm(width), Mm(height), "Layer 1");
                doc.get_page(p).get_layer(l)
            };

            let canvas = Canvas {
                layer,
                page_height: height,
                fonts: &fonts,
            };
            self.draw_page_header(&canvas, table, &layout, page, generated_on);
            self.draw_table(&canvas, table, &layout, page);
            canvas.text_centered(
                &format!("Page {} of {}", page.number, total),
                FOOTER_FONT_SIZE,
                width / 2.0,
                height - FOOTER_OFFSET,
                false,
                FOOTER_TEXT,
            );
        }

        debug!(pages = total, scale = layout.scale, "PDF 渲染完成");
        Ok(doc.save_to_bytes()?)
    }

    fn draw_page_header(
        &self,
        canvas: &Canvas<'_>,
        table: &ReportTable,
        layout: &PdfLayout,
        page: &PageSpec,
        generated_on: NaiveDate,
    ) {
        let center = layout.page_width / 2.0;
        if page.is_first() {
            canvas.text_centered(&table.class_name, TITLE_FONT_SIZE, center, TITLE_Y, true, Rgb(0, 0, 0));
            canvas.text_centered(
                &format!("Attendance Sheet - {}", table.month_title()),
                SUBTITLE_FONT_SIZE,
                center,
                SUBTITLE_Y,
                false,
                Rgb(0, 0, 0),
            );
            canvas.text_centered(
                &format!(
                    "Class ID: {}  |  Total Students: {}  |  Generated: {}",
                    table.class_id,
                    table.rows.len(),
                    generated_on.format("%-m/%-d/%Y")
                ),
                META_FONT_SIZE,
                center,
                META_Y,
                false,
                Rgb(0, 0, 0),
            );
        } else {
            canvas.text_centered(
                &format!("{} - Continued", table.class_name),
                CONTINUATION_FONT_SIZE,
                center,
                TITLE_Y,
                true,
                Rgb(0, 0, 0),
            );
        }
    }

    fn draw_table(
        &self,
        canvas: &Canvas<'_>,
        table: &ReportTable,
        layout: &PdfLayout,
        page: &PageSpec,
    ) {
        let head_size = layout.orientation.head_font_size();

        // 表头
        let mut x = PAGE_MARGIN;
        for &col in &page.columns {
            let w = layout.column_widths[col];
            canvas.fill_rect(x, TABLE_START_Y, w, HEADER_ROW_HEIGHT, HEADER_FILL);
            let label = fit_text(&table.columns[col].header, w - CELL_PADDING * 2.0, head_size);
            canvas.text_in_cell(&label, head_size, x, TABLE_START_Y, w, HEADER_ROW_HEIGHT, Align::Center, true, HEADER_TEXT);
            x += w;
        }

        // 正文
        let mut y = TABLE_START_Y + HEADER_ROW_HEIGHT;
        for (offset, row_idx) in page.rows.clone().enumerate() {
            let row = &table.rows[row_idx];
            let mut x = PAGE_MARGIN;
            for &col in &page.columns {
                let w = layout.column_widths[col];
                let column = &table.columns[col];
                let cell = &row.cells[col];

                let style: CellStyle = match column.kind {
                    ColumnKind::Day(_) => mark_style(mark_of(cell)),
                    ColumnKind::Status => status_style(row.status),
                    _ => plain_style(),
                };
                let fill = style
                    .fill
                    .or(if offset % 2 == 1 { Some(ALT_ROW_FILL) } else { None });
                if let Some(fill) = fill {
                    canvas.fill_rect(x, y, w, layout.row_height, fill);
                }
                canvas.stroke_rect(x, y, w, layout.row_height, GRID_LINE);

                let size = layout.orientation.body_font_size(&column.kind);
                let text = fit_text(&cell.as_text(), w - CELL_PADDING * 2.0, size);
                canvas.text_in_cell(
                    &text,
                    size,
                    x,
                    y,
                    w,
                    layout.row_height,
                    column_align(&column.kind),
                    style.bold,
                    style.text,
                );
                x += w;
            }
            y += layout.row_height;
        }
    }
}

// ==========================================
// Canvas - 左上原点的绘制封装
// ==========================================
struct Canvas<'a> {
    layer: PdfLayerReference,
    page_height: f32,
    fonts: &'a Fonts,
}

impl Canvas<'_> {
    fn flip(&self, y_top: f32) -> f32 {
        self.page_height - y_top
    }

    fn fill_rect(&self, x: f32, y_top: f32, w: f32, h: f32, fill: Rgb) {
        self.layer.set_fill_color(color(fill));
        let rect = Rect::new(
            Mm(x),
            Mm(self.flip(y_top + h)),
            Mm(x + w),
            Mm(self.flip(y_top)),
        )
        .with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
    }

    fn stroke_rect(&self, x: f32, y_top: f32, w: f32, h: f32, line: Rgb) {
        self.layer.set_outline_color(color(line));
        self.layer.set_outline_thickness(0.1);
        let rect = Rect::new(
            Mm(x),
            Mm(self.flip(y_top + h)),
            Mm(x + w),
            Mm(self.flip(y_top)),
        )
        .with_mode(PaintMode::Stroke);
        self.layer.add_rect(rect);
    }

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.fonts.bold
        } else {
            &self.fonts.regular
        }
    }

    /// y_baseline 为自顶向下的基线位置
    fn text_at(&self, text: &str, size: f32, x: f32, y_baseline: f32, bold: bool, rgb: Rgb) {
        if text.is_empty() {
            return;
        }
        self.layer.set_fill_color(color(rgb));
        self.layer
            .use_text(text, size, Mm(x), Mm(self.flip(y_baseline)), self.font(bold));
    }

    fn text_centered(&self, text: &str, size: f32, center_x: f32, y_baseline: f32, bold: bool, rgb: Rgb) {
        let x = center_x - text_width(text, size) / 2.0;
        self.text_at(text, size, x, y_baseline, bold, rgb);
    }

    #[allow(clippy::too_many_arguments)]
    fn text_in_cell(
        &self,
        text: &str,
        size: f32,
        x: f32,
        y_top: f32,
        w: f32,
        h: f32,
        align: Align,
        bold: bool,
        rgb: Rgb,
    ) {
        // 基线: 单元格垂直居中，字高约 0.7em
        let baseline = y_top + h / 2.0 + size * PT_TO_MM * 0.35;
        let text_x = match align {
            Align::Left => x + CELL_PADDING,
            Align::Center => x + (w - text_width(text, size)) / 2.0,
        };
        self.text_at(text, size, text_x, baseline, bold, rgb);
    }
}
