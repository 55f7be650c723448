use crate::domain::model::{CalculationResponse, DatasetContent, DatasetFileInfo, ExcelImportReport};
use std::collections::BTreeSet;

fn format_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(0);
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.extend(rows.iter().map(|row| line(row.as_slice())));
    out.join("\n")
}

pub fn render_file_list(title: &str, files: &[DatasetFileInfo]) -> String {
    if files.is_empty() {
        return format!("{}\n(no files)", title);
    }

    let headers = ["filename", "size", "modified"].map(String::from);
    let rows: Vec<Vec<String>> = files
        .iter()
        .map(|f| {
            vec![
                f.filename.clone(),
                f.size.to_string(),
                f.modified_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    format!("{}\n{}", title, render_table(&headers, &rows))
}

/// 年份為列、國家為欄；單值檔案只顯示一行
pub fn render_dataset(content: &DatasetContent) -> String {
    if let Some(value) = content.single_value() {
        return format!("{}\nvalue: {}", content.filename, format_cell(value));
    }
    if content.data.is_empty() {
        return format!("{}\n(empty)", content.filename);
    }

    let countries: BTreeSet<&str> = content
        .data
        .values()
        .filter_map(|v| v.as_object())
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();

    let mut years: Vec<&String> = content.data.keys().collect();
    years.sort();

    let scalar_years = content.data.values().any(|v| !v.is_object());

    let mut headers = vec!["year".to_string()];
    headers.extend(countries.iter().map(|c| c.to_string()));
    if scalar_years {
        headers.push("value".to_string());
    }

    let rows: Vec<Vec<String>> = years
        .into_iter()
        .map(|year| {
            let entry = &content.data[year.as_str()];
            let mut row = vec![year.clone()];
            for country in &countries {
                row.push(
                    entry
                        .get(*country)
                        .map(format_cell)
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            if scalar_years {
                row.push(if entry.is_object() {
                    "-".to_string()
                } else {
                    format_cell(entry)
                });
            }
            row
        })
        .collect();

    format!("{}\n{}", content.filename, render_table(&headers, &rows))
}

pub fn render_import_report(report: &ExcelImportReport) -> String {
    let mut lines = vec![format!("{}: {}", report.status, report.message)];
    if !report.added_years.is_empty() {
        lines.push(format!("added years: {}", report.added_years.join(", ")));
    }
    if !report.added_countries.is_empty() {
        lines.push(format!("added countries: {}", report.added_countries.join(", ")));
    }
    lines.push(format!("updated cells: {}", report.updated_cells));
    for error in &report.errors {
        lines.push(format!("  ! {}", error));
    }
    lines.join("\n")
}

pub fn render_calculation(response: &CalculationResponse) -> String {
    if response.message.is_empty() {
        format!("status: {}", response.status)
    } else {
        format!("status: {} ({})", response.status, response.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(value: serde_json::Value) -> DatasetContent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_grid_rendering() {
        let rendered = render_dataset(&content(json!({
            "filename": "gdp.json",
            "data": {
                "2021": {"US": 2.0, "CN": 1.5},
                "2020": {"CN": 1.2}
            }
        })));

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "gdp.json");
        assert_eq!(lines[1], "year  CN   US");
        assert_eq!(lines[3], "2020  1.2  -");
        assert_eq!(lines[4], "2021  1.5  2.0");
    }

    #[test]
    fn test_single_value_rendering() {
        let rendered = render_dataset(&content(json!({
            "filename": "r_open_t1.json",
            "data": {"value": 0.4036}
        })));
        assert_eq!(rendered, "r_open_t1.json\nvalue: 0.4036");
    }

    #[test]
    fn test_file_list_rendering() {
        let files = vec![DatasetFileInfo {
            filename: "gdp.json".to_string(),
            size: 128,
            modified: 0.0,
        }];
        let rendered = render_file_list("数据管理", &files);
        assert!(rendered.starts_with("数据管理\nfilename"));
        assert!(rendered.contains("gdp.json  128   1970-01-01 00:00:00"));

        assert_eq!(render_file_list("计算结果", &[]), "计算结果\n(no files)");
    }

    #[test]
    fn test_import_report_rendering() {
        let report = ExcelImportReport {
            status: "success".to_string(),
            message: "added 1 year".to_string(),
            added_years: vec!["2024".to_string()],
            updated_cells: 3,
            errors: vec!["row 5: not a number".to_string()],
            ..Default::default()
        };
        let rendered = render_import_report(&report);
        assert!(rendered.contains("added years: 2024"));
        assert!(rendered.contains("updated cells: 3"));
        assert!(rendered.contains("  ! row 5: not a number"));
        assert!(!rendered.contains("added countries"));
    }
}
