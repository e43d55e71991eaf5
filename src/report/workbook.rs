use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};
use serde_json::Value;
use thiserror::Error;

use super::{CellKind, ReportKind, ReportParams};

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("Failed to render workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Money(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    Title,
    Period,
    Unit,
    Header,
    Data,
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow {
    pub role: RowRole,
    pub cells: Vec<Cell>,
}

/// Cell-by-cell content of a recap sheet, independent of the xlsx encoder
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub sheet_name: &'static str,
    pub widths: Vec<u16>,
    pub rows: Vec<LayoutRow>,
    pub total: Decimal,
}

const NUMBER_WIDTH: u16 = 6;

impl SheetLayout {
    pub fn build(kind: ReportKind, params: &ReportParams, unit: &str, records: &[Value]) -> Self {
        let columns = kind.columns();
        let mut rows = Vec::with_capacity(records.len() + 5);

        rows.push(LayoutRow { role: RowRole::Title, cells: vec![Cell::Text(kind.title().to_string())] });
        rows.push(LayoutRow {
            role: RowRole::Period,
            cells: vec![Cell::Text(format!(
                "Periode: {} s.d. {}",
                params.tgl_awal.format("%d-%m-%Y"),
                params.tgl_akhir.format("%d-%m-%Y")
            ))],
        });
        rows.push(LayoutRow { role: RowRole::Unit, cells: vec![Cell::Text(format!("Unit: {}", unit))] });

        let mut header = vec![Cell::Text("No".to_string())];
        header.extend(columns.iter().map(|c| Cell::Text(c.header.to_string())));
        rows.push(LayoutRow { role: RowRole::Header, cells: header });

        let mut total = Decimal::ZERO;
        for (i, record) in records.iter().enumerate() {
            let mut cells = vec![Cell::Number((i + 1) as f64)];
            for column in columns {
                let value = record.get(column.key).unwrap_or(&Value::Null);
                let cell = match column.kind {
                    CellKind::Text => text_cell(value),
                    CellKind::Number => number_of(value).map(Cell::Number).unwrap_or(Cell::Empty),
                    CellKind::Money => {
                        let amount = decimal_of(value).unwrap_or_else(|| {
                            tracing::warn!(
                                report = kind.slug(),
                                column = column.key,
                                row = i + 1,
                                value = %value,
                                "Unreadable money value counted as zero"
                            );
                            Decimal::ZERO
                        });
                        if column.key == kind.total_column() {
                            match total.checked_add(amount) {
                                Some(sum) => total = sum,
                                None => tracing::warn!(report = kind.slug(), row = i + 1, "Report total overflowed; row left out"),
                            }
                        }
                        Cell::Money(amount)
                    }
                };
                cells.push(cell);
            }
            rows.push(LayoutRow { role: RowRole::Data, cells });
        }

        let mut total_row = vec![Cell::Text("TOTAL".to_string())];
        total_row.extend(columns.iter().map(|c| {
            if c.key == kind.total_column() { Cell::Money(total) } else { Cell::Empty }
        }));
        rows.push(LayoutRow { role: RowRole::Total, cells: total_row });

        let mut widths = vec![NUMBER_WIDTH];
        widths.extend(columns.iter().map(|c| c.width));

        Self { sheet_name: "Rekap", widths, rows, total }
    }

    pub fn column_count(&self) -> u16 {
        self.widths.len() as u16
    }

    /// Encode as an `.xlsx` document
    pub fn render(&self) -> Result<Vec<u8>, WorkbookError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name)?;

        let title_format = Format::new().set_bold().set_font_size(14).set_align(FormatAlign::Center);
        let caption_format = Format::new().set_align(FormatAlign::Center);
        let header_format = Format::new()
            .set_bold()
            .set_border(FormatBorder::Thin)
            .set_background_color(Color::RGB(0x4472C4))
            .set_font_color(Color::RGB(0xFFFFFF));
        let body_format = Format::new().set_border(FormatBorder::Thin);
        let money_format = Format::new().set_border(FormatBorder::Thin).set_num_format("#,##0.00");
        let total_format = Format::new().set_bold().set_border_top(FormatBorder::Double);
        let total_money_format = Format::new()
            .set_bold()
            .set_border_top(FormatBorder::Double)
            .set_num_format("#,##0.00");

        for (col, width) in self.widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }

        let last_col = self.column_count().saturating_sub(1);
        for (row_idx, row) in self.rows.iter().enumerate() {
            let r = row_idx as u32;
            match row.role {
                RowRole::Title | RowRole::Period | RowRole::Unit => {
                    let text = match row.cells.first() {
                        Some(Cell::Text(t)) => t.as_str(),
                        _ => "",
                    };
                    let format = if row.role == RowRole::Title { &title_format } else { &caption_format };
                    worksheet.merge_range(r, 0, r, last_col, text, format)?;
                }
                RowRole::Header | RowRole::Data | RowRole::Total => {
                    let (plain, money) = match row.role {
                        RowRole::Header => (&header_format, &header_format),
                        RowRole::Total => (&total_format, &total_money_format),
                        _ => (&body_format, &money_format),
                    };
                    for (col, cell) in row.cells.iter().enumerate() {
                        let c = col as u16;
                        match cell {
                            Cell::Empty => {
                                worksheet.write_blank(r, c, plain)?;
                            }
                            Cell::Text(t) => {
                                worksheet.write_string_with_format(r, c, t, plain)?;
                            }
                            Cell::Number(n) => {
                                worksheet.write_number_with_format(r, c, *n, plain)?;
                            }
                            Cell::Money(d) => {
                                worksheet.write_number_with_format(r, c, d.to_f64().unwrap_or(0.0), money)?;
                            }
                        }
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn text_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Money arrives as a JSON number (`numeric` through `to_jsonb`) or a numeric string; null is zero
fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::Null => Some(Decimal::ZERO),
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)).ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn params() -> ReportParams {
        ReportParams {
            tgl_awal: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            tgl_akhir: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            id_bidang: None,
        }
    }

    #[test]
    fn empty_report_keeps_headers_and_zero_total() {
        let layout = SheetLayout::build(ReportKind::RekapBidang, &params(), "Semua Bidang", &[]);
        let roles: Vec<RowRole> = layout.rows.iter().map(|r| r.role).collect();
        assert_eq!(roles, vec![RowRole::Title, RowRole::Period, RowRole::Unit, RowRole::Header, RowRole::Total]);
        assert_eq!(layout.total, Decimal::ZERO);

        let total_row = layout.rows.last().unwrap();
        assert_eq!(total_row.cells[0], Cell::Text("TOTAL".into()));
        assert_eq!(total_row.cells[4], Cell::Money(Decimal::ZERO));
        assert_eq!(layout.rows[1].cells[0], Cell::Text("Periode: 01-01-2024 s.d. 31-01-2024".into()));

        let bytes = layout.render().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn data_rows_are_numbered_and_summed() {
        let records = vec![
            json!({ "nama_jenis_biaya": "Uang Harian", "jumlah_item": 4, "total_biaya": 1500000.5 }),
            json!({ "nama_jenis_biaya": "Penginapan", "jumlah_item": "2", "total_biaya": "2250000.25" }),
            json!({ "nama_jenis_biaya": null, "jumlah_item": null, "total_biaya": null }),
        ];
        let layout = SheetLayout::build(ReportKind::RekapBiaya, &params(), "Bidang Keuangan", &records);

        let data: Vec<&LayoutRow> = layout.rows.iter().filter(|r| r.role == RowRole::Data).collect();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0].cells[0], Cell::Number(1.0));
        assert_eq!(data[1].cells[2], Cell::Number(2.0));
        assert_eq!(data[2].cells[1], Cell::Empty);
        assert_eq!(layout.total, Decimal::from_str("3750000.75").unwrap());
        assert_eq!(layout.widths.len(), 4);
        assert!(layout.render().unwrap().starts_with(b"PK"));
    }

    #[test]
    fn unreadable_money_counts_as_zero() {
        let records = vec![
            json!({ "nama_jenis_biaya": "Transport", "jumlah_item": 1, "total_biaya": "satu juta" }),
            json!({ "nama_jenis_biaya": "Hotel", "jumlah_item": 1, "total_biaya": 750000 }),
        ];
        let layout = SheetLayout::build(ReportKind::RekapBiaya, &params(), "Bidang Umum", &records);
        assert_eq!(layout.rows[4].cells[3], Cell::Money(Decimal::ZERO));
        assert_eq!(layout.total, Decimal::from(750_000));
        assert_eq!(decimal_of(&json!("satu juta")), None);
        assert_eq!(decimal_of(&json!(null)), Some(Decimal::ZERO));
        assert_eq!(decimal_of(&json!(" 12.50 ")), Some(Decimal::new(1250, 2)));
    }
}
