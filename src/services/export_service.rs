use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::*;

use crate::error::Result;
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::services::report_service::{
    in_period, periods, postcode_area, screening_score, RangePreset,
};
use crate::utils::time::{uk_date, uk_date_time};

pub const EXPORT_COLUMNS: [(&str, f64); 10] = [
    ("ID", 38.0),
    ("Name", 28.0),
    ("Email", 32.0),
    ("Status", 18.0),
    ("Date Added", 16.0),
    ("Hired Date", 16.0),
    ("Source", 16.0),
    ("Total Cost", 14.0),
    ("Screening Score", 16.0),
    ("Postcode Area", 16.0),
];

pub struct ExportService;

impl ExportService {
    fn status_color(status: CandidateStatus) -> Color {
        match status {
            CandidateStatus::New => Color::RGB(0x3B82F6),
            CandidateStatus::Screening => Color::RGB(0xF59E0B),
            CandidateStatus::VideoInterview => Color::RGB(0x8B5CF6),
            CandidateStatus::Induction => Color::RGB(0x06B6D4),
            CandidateStatus::Hired => Color::RGB(0x10B981),
            CandidateStatus::Rejected | CandidateStatus::Terminated => Color::RGB(0xEF4444),
            CandidateStatus::Withdrawn | CandidateStatus::Legacy => Color::RGB(0x64748B),
        }
    }

    /// Styled workbook of every candidate added inside the report period.
    pub fn generate_report_xlsx(
        candidates: &[Candidate],
        preset: RangePreset,
        now: DateTime<Utc>,
    ) -> Result<Vec<u8>> {
        let (period, _) = periods(preset, now);
        let rows = in_period(candidates, &period);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Recruitment Report")?;

        // ── Color palette ──
        let primary_color = Color::RGB(0x1E293B);
        let header_bg = Color::RGB(0x0F172A);
        let alt_row_1 = Color::RGB(0xF8FAFC);
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0);

        for (i, (_, width)) in EXPORT_COLUMNS.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }
        let last_col = (EXPORT_COLUMNS.len() - 1) as u16;

        // ── Title rows ──
        let title_format = Format::new()
            .set_font_size(16)
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(0, 40)?;
        worksheet.merge_range(0, 0, 0, last_col, "Recruitment Report", &title_format)?;

        let subtitle_format = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(Color::RGB(0x94A3B8))
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(1, 22)?;
        let since = period
            .start
            .map(uk_date)
            .unwrap_or_else(|| "the beginning".to_string());
        let subtitle = format!(
            "Exported {}  •  {} to {}  •  {} candidates",
            uk_date_time(now),
            since,
            uk_date(period.end),
            rows.len()
        );
        worksheet.merge_range(1, 0, 1, last_col, &subtitle, &subtitle_format)?;

        // ── Header row ──
        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(Color::White)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let header_row = 2;
        worksheet.set_row_height(header_row, 28)?;
        for (i, (name, _)) in EXPORT_COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }

        // ── Data rows ──
        let data_start_row = header_row + 1;
        for (idx, candidate) in rows.iter().enumerate() {
            let row = data_start_row + idx as u32;
            let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };
            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);
            let money_fmt = center_fmt.clone().set_num_format("£#,##0.00");

            worksheet.set_row_height(row, 20)?;
            worksheet.write_string_with_format(row, 0, candidate.id.to_string(), &base_fmt)?;
            let name_fmt = base_fmt.clone().set_bold();
            worksheet.write_string_with_format(row, 1, &candidate.name, &name_fmt)?;
            worksheet.write_string_with_format(row, 2, &candidate.email, &base_fmt)?;

            let status_fmt = Format::new()
                .set_font_size(10)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Self::status_color(candidate.status))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            worksheet.write_string_with_format(row, 3, candidate.status.label(), &status_fmt)?;

            worksheet.write_string_with_format(row, 4, uk_date(candidate.created_at), &center_fmt)?;
            let hired = candidate.hired_at.map(uk_date).unwrap_or_default();
            worksheet.write_string_with_format(row, 5, &hired, &center_fmt)?;
            let source = candidate
                .referral_source
                .as_ref()
                .map(|s| s.source_type.to_string())
                .unwrap_or_default();
            worksheet.write_string_with_format(row, 6, &source, &center_fmt)?;

            let cost = candidate.total_provider_cost().to_f64().unwrap_or(0.0);
            worksheet.write_number_with_format(row, 7, cost, &money_fmt)?;

            match screening_score(candidate) {
                Some(score) => {
                    worksheet.write_number_with_format(row, 8, score as f64, &center_fmt)?;
                }
                None => {
                    worksheet.write_string_with_format(row, 8, "", &center_fmt)?;
                }
            }
            let area = postcode_area(&candidate.postcode);
            worksheet.write_string_with_format(row, 9, area, &center_fmt)?;
        }

        // ── Summary row ──
        let total_row = data_start_row + rows.len() as u32 + 1;
        let summary_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(primary_color)
            .set_background_color(Color::RGB(0xE0E7FF))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let hired_count = rows
            .iter()
            .filter(|c| c.status == CandidateStatus::Hired)
            .count();
        let total_cost: f64 = rows
            .iter()
            .map(|c| c.total_provider_cost().to_f64().unwrap_or(0.0))
            .sum();
        worksheet.set_row_height(total_row, 26)?;
        worksheet.merge_range(
            total_row,
            0,
            total_row,
            3,
            &format!("Total: {} candidates | Hired: {}", rows.len(), hired_count),
            &summary_fmt,
        )?;
        worksheet.merge_range(
            total_row,
            4,
            total_row,
            last_col,
            &format!("Provider cost: £{:.2}", total_cost),
            &summary_fmt,
        )?;

        worksheet.set_freeze_panes(data_start_row, 0)?;
        worksheet.autofilter(
            header_row,
            0,
            (data_start_row + rows.len() as u32).saturating_sub(1).max(header_row),
            last_col,
        )?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}
