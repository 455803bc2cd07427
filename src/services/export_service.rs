use rust_xlsxwriter::*;

use crate::error::Result;
use crate::models::attendance::{attendance_rate, AttendanceRecord};

pub struct ExportService;

impl ExportService {
    /// Styled attendance workbook: title, header, one row per record and a
    /// summary row with the status totals.
    pub fn generate_attendance_xlsx(records: &[AttendanceRecord], period: &str) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Attendance")?;

        let primary_color = Color::RGB(0x1E293B);
        let header_bg = Color::RGB(0x0F172A);
        let alt_row_1 = Color::RGB(0xF8FAFC);
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0);

        let status_present = Color::RGB(0x10B981);
        let status_absent = Color::RGB(0xEF4444);
        let status_leave = Color::RGB(0xF59E0B);

        let columns = [
            ("#", 6.0),
            ("Employee", 28.0),
            ("Email", 30.0),
            ("Department", 18.0),
            ("Date", 14.0),
            ("Status", 12.0),
            ("Check-in", 12.0),
            ("Check-out", 12.0),
            ("Hours", 10.0),
        ];
        let last_col = (columns.len() - 1) as u16;

        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        let title_format = Format::new()
            .set_font_size(16)
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(0, 36)?;
        worksheet.merge_range(0, 0, 0, last_col, "Attendance report", &title_format)?;

        let subtitle_format = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(Color::RGB(0x94A3B8))
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(1, 22)?;
        let exported = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
        let subtitle = format!("Period: {}  |  Exported: {}  |  Records: {}", period, exported, records.len());
        worksheet.merge_range(1, 0, 1, last_col, &subtitle, &subtitle_format)?;

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
        worksheet.set_row_height(header_row, 26)?;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }

        let data_start_row = 3;
        for (idx, record) in records.iter().enumerate() {
            let row = data_start_row + idx as u32;
            let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };

            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);

            worksheet.write_number_with_format(row, 0, (idx + 1) as f64, &center_fmt)?;
            worksheet.write_string_with_format(row, 1, &record.employee_name, &base_fmt.clone().set_bold())?;
            worksheet.write_string_with_format(row, 2, &record.employee_email, &base_fmt)?;
            worksheet.write_string_with_format(row, 3, record.department.as_deref().unwrap_or("-"), &base_fmt)?;
            worksheet.write_string_with_format(row, 4, record.date.format("%Y-%m-%d").to_string(), &center_fmt)?;

            let status_color = match record.status.as_str() {
                "present" => status_present,
                "absent" => status_absent,
                "leave" => status_leave,
                _ => Color::RGB(0x64748B),
            };
            let status_fmt = Format::new()
                .set_font_size(10)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(status_color)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            worksheet.write_string_with_format(row, 5, &record.status, &status_fmt)?;

            let punch = |t: Option<chrono::NaiveTime>| {
                t.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| "-".to_string())
            };
            worksheet.write_string_with_format(row, 6, punch(record.check_in), &center_fmt)?;
            worksheet.write_string_with_format(row, 7, punch(record.check_out), &center_fmt)?;
            match record.hours_worked() {
                Some(hours) => worksheet.write_number_with_format(row, 8, hours, &center_fmt)?,
                None => worksheet.write_string_with_format(row, 8, "-", &center_fmt)?,
            };
        }

        let present = records.iter().filter(|r| r.status == "present").count();
        let absent = records.iter().filter(|r| r.status == "absent").count();
        let leave = records.iter().filter(|r| r.status == "leave").count();

        let total_row = data_start_row + records.len() as u32 + 1;
        let summary_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(primary_color)
            .set_background_color(Color::RGB(0xE0E7FF))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        worksheet.set_row_height(total_row, 24)?;
        worksheet.merge_range(total_row, 0, total_row, 2, &format!("Total: {} records", records.len()), &summary_fmt)?;
        let summary = format!(
            "Present: {} | Absent: {} | Leave: {} | Rate: {:.1}%",
            present,
            absent,
            leave,
            attendance_rate(present as i64, records.len() as i64)
        );
        worksheet.merge_range(total_row, 3, total_row, last_col, &summary, &summary_fmt)?;

        worksheet.set_freeze_panes(3, 0)?;
        if !records.is_empty() {
            worksheet.autofilter(header_row, 0, data_start_row + records.len() as u32 - 1, last_col)?;
        }

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    #[test]
    fn workbook_is_a_zip_archive() {
        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_email: "amina@corp.io".into(),
            employee_name: "Amina Yusuf".into(),
            department: Some("Sales".into()),
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            status: "present".into(),
            check_in: NaiveTime::from_hms_opt(9, 0, 0),
            check_out: NaiveTime::from_hms_opt(17, 0, 0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let bytes = ExportService::generate_attendance_xlsx(&[record], "2026-10").unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let empty = ExportService::generate_attendance_xlsx(&[], "2026-10").unwrap();
        assert!(!empty.is_empty());
    }
}
