//! The local PDF layout engine: a deterministic A4 paginator built on
//! printpdf's builtin fonts. Lower fidelity than the HTML path, but
//! fully offline — this is the fallback backend.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocumentReference, PdfLayerReference, Point,
    Polygon, Rgb,
};

use quantica_analytics::tiers::{ScoreTier, ValueTier};

use crate::backend::RenderBackend;
use crate::error::ExportError;
use crate::layout::{
    column_split, critical_chunks, row_rule_width, table_page_plan, wrap_text, zebra_row,
};
use crate::model::{CriticalCard, ReportBody, ReportModel};
use crate::styles::{DocumentStyles, tier_color};

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const ROW_HEIGHT: f64 = 7.0;
const HEADER_ROW_HEIGHT: f64 = 8.0;
const LINE_HEIGHT: f64 = 5.0;
/// Vertical room the running header occupies on pages 2+.
const RUNNING_HEADER_BLOCK: f64 = 10.0;
/// Cards per page in the critical-fields section before a labeled
/// continuation page starts.
const CRITICAL_PAGE_LIMIT: usize = 8;

pub struct LocalPdfBackend;

impl RenderBackend for LocalPdfBackend {
    fn id(&self) -> &'static str {
        "local-pdf"
    }

    fn render(
        &self,
        report: &ReportModel,
        styles: &DocumentStyles,
    ) -> Result<Vec<u8>, ExportError> {
        Composer::new(report, styles)?.compose()
    }
}

fn rgb(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(color.0) / 255.0,
        f32::from(color.1) / 255.0,
        f32::from(color.2) / 255.0,
        None,
    ))
}

/// One table cell: text plus an optional value color.
struct Cell {
    text: String,
    color: Option<(u8, u8, u8)>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), color: None }
    }

    fn tinted(text: impl Into<String>, tier: ValueTier) -> Self {
        Self { text: text.into(), color: Some(tier_color(tier)) }
    }
}

struct Composer<'a> {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    report: &'a ReportModel,
    styles: &'a DocumentStyles,
    y: f64,
    page_number: u32,
}

impl<'a> Composer<'a> {
    fn new(report: &'a ReportModel, styles: &'a DocumentStyles) -> Result<Self, ExportError> {
        let (doc, page, layer) = printpdf::PdfDocument::new(
            "Relatório Quântico de Evolução Terapêutica",
            Mm(PAGE_WIDTH as f32),
            Mm(PAGE_HEIGHT as f32),
            "Capa",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            font,
            font_bold,
            report,
            styles,
            y: PAGE_HEIGHT - 20.0,
            page_number: 1,
        })
    }

    fn margin(&self) -> f64 {
        self.styles.margin_mm
    }

    fn content_width(&self) -> f64 {
        PAGE_WIDTH - 2.0 * self.margin()
    }

    fn bottom_limit(&self) -> f64 {
        self.margin() + 5.0
    }

    /// Where the cursor lands after a page break, below the running
    /// header.
    fn content_top(&self) -> f64 {
        PAGE_HEIGHT - 20.0 - RUNNING_HEADER_BLOCK
    }

    fn compose(mut self) -> Result<Vec<u8>, ExportError> {
        self.cover();
        match self.report.body.as_ref() {
            None => self.no_data_page(),
            Some(body) => {
                self.summary_page(body);
                self.insights_page(body);
                self.field_table_page(body);
                self.history_page(body);
                self.critical_pages(body);
                self.recommendations_page(body);
            }
        }
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(e.to_string()))
    }

    // --- primitives -----------------------------------------------------

    fn text(&self, content: &str, x: f64, y: f64, size: f64, color: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb(color));
        self.layer
            .use_text(content, size as f32, Mm(x as f32), Mm(y as f32), &self.font);
    }

    fn text_bold(&self, content: &str, x: f64, y: f64, size: f64, color: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb(color));
        self.layer
            .use_text(content, size as f32, Mm(x as f32), Mm(y as f32), &self.font_bold);
    }

    fn hline(&self, x1: f64, x2: f64, y: f64, color: (u8, u8, u8), width: f64) {
        self.layer.set_outline_color(rgb(color));
        self.layer.set_outline_thickness(width as f32);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1 as f32), Mm(y as f32)), false),
                (Point::new(Mm(x2 as f32), Mm(y as f32)), false),
            ],
            is_closed: false,
        });
    }

    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64, color: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb(color));
        self.layer.add_polygon(Polygon {
            rings: vec![vec![
                (Point::new(Mm(x as f32), Mm(y as f32)), false),
                (Point::new(Mm((x + w) as f32), Mm(y as f32)), false),
                (Point::new(Mm((x + w) as f32), Mm((y + h) as f32)), false),
                (Point::new(Mm(x as f32), Mm((y + h) as f32)), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Start a new page with the running header and footer. The cover
    /// (page 1) never goes through here, which is what keeps it exempt.
    fn break_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(
                Mm(PAGE_WIDTH as f32),
                Mm(PAGE_HEIGHT as f32),
                format!("Página {}", self.page_number + 1),
            );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_number += 1;

        let margin = self.margin();
        let right = PAGE_WIDTH - margin;
        self.text(
            &format!("Relatório Quântico — {}", self.report.cover.patient_name),
            margin,
            PAGE_HEIGHT - 12.0,
            8.0,
            self.styles.muted,
        );
        self.text(
            &format!("Página {}", self.page_number),
            right - 18.0,
            PAGE_HEIGHT - 12.0,
            8.0,
            self.styles.muted,
        );
        self.hline(margin, right, PAGE_HEIGHT - 14.5, self.styles.muted, 0.3);

        self.hline(margin, right, 13.0, self.styles.muted, 0.3);
        self.text(
            "Documento confidencial — uso exclusivo do paciente e do terapeuta.",
            margin,
            9.0,
            7.5,
            self.styles.muted,
        );
        self.text(
            &self.report.cover.generated_on,
            right - 20.0,
            9.0,
            7.5,
            self.styles.muted,
        );

        self.y = self.content_top();
    }

    /// Break the page if `needed` millimeters no longer fit.
    fn ensure(&mut self, needed: f64) {
        if self.y - needed < self.bottom_limit() {
            self.break_page();
        }
    }

    fn section_title(&mut self, title: &str) {
        self.text_bold(title, self.margin(), self.y, self.styles.heading_size, self.styles.primary);
        self.y -= 2.5;
        self.hline(
            self.margin(),
            PAGE_WIDTH - self.margin(),
            self.y,
            self.styles.primary,
            0.5,
        );
        self.y -= 7.0;
    }

    fn paragraph(&mut self, content: &str, size: f64, color: (u8, u8, u8)) {
        for line in wrap_text(content, 95) {
            self.ensure(LINE_HEIGHT);
            self.text(&line, self.margin(), self.y, size, color);
            self.y -= LINE_HEIGHT;
        }
    }

    fn bullet(&mut self, content: &str, color: (u8, u8, u8)) {
        let lines = wrap_text(content, 90);
        for (i, line) in lines.iter().enumerate() {
            self.ensure(LINE_HEIGHT);
            if i == 0 {
                self.text("•", self.margin(), self.y, self.styles.body_size, color);
            }
            self.text(line, self.margin() + 5.0, self.y, self.styles.body_size, color);
            self.y -= LINE_HEIGHT;
        }
    }

    // --- tables ---------------------------------------------------------

    /// Draw a zebra-striped table with a filled header row. Tables that
    /// overflow the page split across pages, repeating the header row on
    /// each continuation; the closing bottom border is special-cased to
    /// the true last row.
    fn table(&mut self, headers: &[&str], widths: &[f64], rows: &[Vec<Cell>]) {
        if rows.is_empty() {
            return;
        }
        self.ensure(HEADER_ROW_HEIGHT + ROW_HEIGHT);

        let first_capacity =
            ((self.y - self.bottom_limit() - HEADER_ROW_HEIGHT) / ROW_HEIGHT).floor() as usize;
        let cont_capacity = ((self.content_top() - self.bottom_limit() - HEADER_ROW_HEIGHT)
            / ROW_HEIGHT)
            .floor() as usize;
        let plan = table_page_plan(rows.len(), first_capacity, cont_capacity);
        let last_index = rows.len() - 1;

        for (chunk_index, (start, end)) in plan.into_iter().enumerate() {
            if chunk_index > 0 {
                self.break_page();
            }
            self.table_header(headers, widths);
            for index in start..end {
                self.table_row(index, last_index, widths, &rows[index]);
            }
        }
    }

    fn table_header(&mut self, headers: &[&str], widths: &[f64]) {
        let margin = self.margin();
        self.fill_rect(
            margin,
            self.y - HEADER_ROW_HEIGHT,
            self.content_width(),
            HEADER_ROW_HEIGHT,
            self.styles.primary,
        );
        let mut x = margin + 2.0;
        for (header, width) in headers.iter().zip(widths) {
            self.text_bold(
                header,
                x,
                self.y - HEADER_ROW_HEIGHT + 2.5,
                self.styles.body_size,
                (255, 255, 255),
            );
            x += width;
        }
        self.y -= HEADER_ROW_HEIGHT;
    }

    fn table_row(&mut self, index: usize, last_index: usize, widths: &[f64], cells: &[Cell]) {
        let margin = self.margin();
        if zebra_row(index) {
            self.fill_rect(
                margin,
                self.y - ROW_HEIGHT,
                self.content_width(),
                ROW_HEIGHT,
                self.styles.zebra,
            );
        }
        let mut x = margin + 2.0;
        for (cell, width) in cells.iter().zip(widths) {
            let color = cell.color.unwrap_or(self.styles.text);
            self.text(&cell.text, x, self.y - ROW_HEIGHT + 2.0, self.styles.body_size, color);
            x += width;
        }
        self.y -= ROW_HEIGHT;
        self.hline(
            margin,
            PAGE_WIDTH - margin,
            self.y,
            self.styles.muted,
            row_rule_width(index, last_index),
        );
    }

    // --- sections -------------------------------------------------------

    fn cover(&mut self) {
        let margin = self.margin();
        let cover = &self.report.cover;

        self.text_bold("Relatório Quântico", margin, 240.0, self.styles.title_size, self.styles.primary);
        self.text(
            "Evolução Terapêutica Integrada",
            margin,
            230.0,
            12.0,
            self.styles.muted,
        );
        self.hline(margin, PAGE_WIDTH - margin, 224.0, self.styles.primary, 0.8);

        self.text("Paciente", margin, 190.0, 9.0, self.styles.muted);
        self.text_bold(&cover.patient_name, margin, 182.0, 18.0, self.styles.text);

        self.text(
            &format!("Terapeuta: {} ({})", cover.therapist_name, cover.therapist_email),
            margin,
            160.0,
            11.0,
            self.styles.text,
        );
        self.text(
            &format!("Emitido em: {}", cover.generated_on),
            margin,
            152.0,
            11.0,
            self.styles.text,
        );

        match cover.overall_score {
            Some(score) => {
                let tier = ScoreTier::from_score(score);
                self.text("Pontuação geral", margin, 120.0, 9.0, self.styles.muted);
                self.text_bold(
                    &format!("{score} / 100"),
                    margin,
                    108.0,
                    30.0,
                    tier_color(tier.value_tier()),
                );
                self.text(tier.label(), margin, 100.0, 11.0, self.styles.muted);
            }
            None => {
                self.text(
                    "Sem dados suficientes para análise.",
                    margin,
                    120.0,
                    11.0,
                    self.styles.muted,
                );
            }
        }
    }

    fn no_data_page(&mut self) {
        self.break_page();
        self.section_title("Análise indisponível");
        self.paragraph(
            "Nenhuma sessão registrada até o momento para este paciente. \
             Registre a primeira sessão para gerar a análise de evolução e o \
             relatório completo.",
            self.styles.body_size,
            self.styles.text,
        );
    }

    fn summary_page(&mut self, body: &ReportBody) {
        self.break_page();
        self.section_title("Resumo executivo");

        let summary = &body.summary;
        let score_color = tier_color(summary.tier.value_tier());
        self.text_bold(
            &format!("{} / 100", summary.score),
            self.margin(),
            self.y,
            20.0,
            score_color,
        );
        self.text(
            &summary.tier_label,
            self.margin() + 42.0,
            self.y,
            11.0,
            score_color,
        );
        self.y -= 10.0;
        self.paragraph(&summary.interpretation, self.styles.body_size, self.styles.text);
        self.y -= 4.0;

        // Metric cards: sessions, velocity, critical fields.
        let card_width = (self.content_width() - 10.0) / 3.0;
        let card_height = 18.0;
        self.ensure(card_height + 4.0);
        let cards = [
            ("Sessões registradas", summary.total_sessions.to_string()),
            ("Velocidade de evolução", summary.velocity_label.clone()),
            ("Campos críticos", summary.critical_count.to_string()),
        ];
        let top = self.y;
        for (i, (label, value)) in cards.iter().enumerate() {
            let x = self.margin() + i as f64 * (card_width + 5.0);
            self.fill_rect(x, top - card_height, card_width, card_height, self.styles.zebra);
            self.text(label, x + 3.0, top - 6.0, 8.0, self.styles.muted);
            self.text_bold(value, x + 3.0, top - 14.0, 12.0, self.styles.text);
        }
        self.y = top - card_height - 6.0;
    }

    fn insights_page(&mut self, body: &ReportBody) {
        self.break_page();
        self.section_title("Insights do período");
        for insight in &body.insights {
            self.bullet(insight, self.styles.text);
            self.y -= 1.5;
        }
    }

    fn field_table_page(&mut self, body: &ReportBody) {
        self.break_page();
        self.section_title("Índice por campo avaliado");
        if body.field_rows.is_empty() {
            self.paragraph(
                "Sem dados de escala no período analisado.",
                self.styles.body_size,
                self.styles.muted,
            );
            return;
        }
        let widths = [70.0, 30.0, 35.0, 45.0];
        let rows: Vec<Vec<Cell>> = body
            .field_rows
            .iter()
            .map(|row| {
                vec![
                    Cell::plain(row.dimension.clone()),
                    Cell::tinted(row.average_label.clone(), row.tier),
                    Cell::plain(format!("{}%", row.percentile)),
                    Cell::tinted(row.level_label.clone(), row.tier),
                ]
            })
            .collect();
        self.table(&["Campo", "Média", "Percentil", "Nível"], &widths, &rows);
    }

    fn history_page(&mut self, body: &ReportBody) {
        self.break_page();
        self.section_title("Histórico de sessões");
        let widths = [35.0, 75.0, 30.0, 40.0];
        let rows: Vec<Vec<Cell>> = body
            .history
            .iter()
            .map(|row| {
                let mean = match row.tier {
                    Some(tier) => Cell::tinted(row.mean_label.clone(), tier),
                    None => Cell::plain(row.mean_label.clone()),
                };
                let status = match row.tier {
                    Some(tier) => Cell::tinted(row.status_label.clone(), tier),
                    None => Cell::plain(row.status_label.clone()),
                };
                vec![
                    Cell::plain(row.date.clone()),
                    Cell::plain(row.therapy_name.clone()),
                    mean,
                    status,
                ]
            })
            .collect();
        self.table(&["Data", "Terapia", "Média", "Status"], &widths, &rows);
    }

    fn critical_pages(&mut self, body: &ReportBody) {
        self.break_page();
        self.section_title("Campos críticos");

        if body.critical.is_empty() {
            self.text(
                "Nenhum campo crítico — todas as dimensões na meta ou acima.",
                self.margin(),
                self.y,
                self.styles.body_size,
                tier_color(ValueTier::Success),
            );
            self.y -= LINE_HEIGHT;
            return;
        }

        let two_columns = body.critical.len() > 2;
        let chunks = critical_chunks(body.critical.len(), CRITICAL_PAGE_LIMIT);
        for (chunk_index, (start, end)) in chunks.into_iter().enumerate() {
            if chunk_index > 0 {
                self.break_page();
                self.section_title("Campos críticos (continuação)");
            }
            let cards = &body.critical[start..end];
            if two_columns {
                self.critical_two_columns(cards);
            } else {
                for card in cards {
                    self.critical_card(card, self.margin(), self.content_width());
                }
            }
        }
    }

    fn critical_two_columns(&mut self, cards: &[CriticalCard]) {
        let gutter = 8.0;
        let col_width = (self.content_width() - gutter) / 2.0;
        let split = column_split(cards.len());
        let (left, right) = cards.split_at(split);

        let left_height: f64 = left.iter().map(|c| self.card_height(c, col_width)).sum();
        let right_height: f64 = right.iter().map(|c| self.card_height(c, col_width)).sum();
        self.ensure(left_height.max(right_height));

        let top = self.y;
        let mut y = top;
        for card in left {
            y = self.critical_card_at(card, self.margin(), y, col_width);
        }
        let left_bottom = y;
        let mut y = top;
        for card in right {
            y = self.critical_card_at(card, self.margin() + col_width + gutter, y, col_width);
        }
        self.y = left_bottom.min(y) - 2.0;
    }

    fn card_height(&self, card: &CriticalCard, width: f64) -> f64 {
        let chars = (width / 1.8) as usize;
        let lines = wrap_text(&card.recommendation, chars).len() as f64;
        16.0 + lines * 4.5 + 4.0
    }

    fn critical_card(&mut self, card: &CriticalCard, x: f64, width: f64) {
        self.ensure(self.card_height(card, width));
        self.y = self.critical_card_at(card, x, self.y, width);
    }

    fn critical_card_at(&self, card: &CriticalCard, x: f64, top: f64, width: f64) -> f64 {
        let mut y = top;
        self.text_bold(&card.field, x, y, 11.0, tier_color(ValueTier::Critical));
        y -= 5.5;
        self.text(
            &format!("Média atual: {}", card.value),
            x,
            y,
            self.styles.body_size,
            self.styles.text,
        );
        y -= 5.0;
        self.text(&card.gap_label, x, y, self.styles.body_size, self.styles.muted);
        y -= 5.5;
        let chars = (width / 1.8) as usize;
        for line in wrap_text(&card.recommendation, chars) {
            self.text(&line, x, y, 8.5, self.styles.text);
            y -= 4.5;
        }
        y - 4.0
    }

    fn recommendations_page(&mut self, body: &ReportBody) {
        self.break_page();
        self.section_title("Recomendações");
        for item in &body.recommendations.items {
            self.bullet(item, self.styles.text);
            self.y -= 1.0;
        }
        self.y -= 4.0;
        self.ensure(LINE_HEIGHT * 2.0);
        self.text_bold(
            "Próximos passos",
            self.margin(),
            self.y,
            11.0,
            self.styles.primary,
        );
        self.y -= 7.0;
        for (i, step) in body.recommendations.next_steps.iter().enumerate() {
            let numbered = format!("{}. {}", i + 1, step);
            self.paragraph(&numbered, self.styles.body_size, self.styles.text);
            self.y -= 1.0;
        }
    }
}
