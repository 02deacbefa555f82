//! Report renderers and output file naming.

mod csv;
mod xlsx;

pub use self::csv::{format_number, table_to_csv};
pub use self::xlsx::{sanitize_sheet_name, workbook_bytes};

use crate::error::Result;
use crate::report::{ReportHeader, ReportSet, Table};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("unknown output format '{}' (expected xlsx or csv)", s)),
        }
    }
}

/// The four report files of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Glass,
    AggCutOnly,
    TagDetails,
    Table,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Glass,
        ReportKind::AggCutOnly,
        ReportKind::TagDetails,
        ReportKind::Table,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Glass => "Glass",
            ReportKind::AggCutOnly => "AggCutOnly",
            ReportKind::TagDetails => "TagDetails",
            ReportKind::Table => "Table",
        }
    }
}

/// Output file name: `INO_{project_number}_SWR_{ReportName}.{ext}`.
pub fn report_file_name(project_number: &str, report: &str, format: OutputFormat) -> String {
    format!(
        "INO_{}_SWR_{}.{}",
        sanitize_file_component(project_number),
        report,
        format.extension()
    )
}

/// Replace characters that are unsafe in file names.
pub fn sanitize_file_component(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

/// `base`, or `base~2`, `base~3`, ... if already in `used`, compared
/// case-insensitively. Truncates `base` so the result fits in `max_chars`.
pub(crate) fn unique_name(base: &str, max_chars: usize, used: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut n = 2;

    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!("~{}", n);
        let keep = max_chars.saturating_sub(suffix.chars().count());
        candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        n += 1;
    }

    used.insert(candidate.to_lowercase());
    candidate
}

/// A rendered output file held in memory.
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Render every report to memory.
pub fn render_reports(
    reports: &ReportSet,
    project_number: &str,
    format: OutputFormat,
) -> Result<Vec<RenderedFile>> {
    let mut files = Vec::new();

    for kind in ReportKind::ALL {
        match (format, kind) {
            (OutputFormat::Csv, ReportKind::TagDetails) => {
                let mut used_names = HashSet::new();
                for table in &reports.tag_details {
                    let tag = unique_name(
                        &sanitize_file_component(&table.name),
                        usize::MAX,
                        &mut used_names,
                    );
                    let report = format!("{}_{}", kind.name(), tag);
                    files.push(RenderedFile {
                        file_name: report_file_name(project_number, &report, format),
                        bytes: table_to_csv(table, Some(&reports.header)).into_bytes(),
                    });
                }
            }
            (OutputFormat::Csv, _) => {
                let table = single_table(reports, kind);
                files.push(RenderedFile {
                    file_name: report_file_name(project_number, kind.name(), format),
                    bytes: table_to_csv(table, Some(&reports.header)).into_bytes(),
                });
            }
            (OutputFormat::Xlsx, _) => {
                let tables: Vec<&Table> = match kind {
                    ReportKind::TagDetails => reports.tag_details.iter().collect(),
                    _ => vec![single_table(reports, kind)],
                };
                files.push(RenderedFile {
                    file_name: report_file_name(project_number, kind.name(), format),
                    bytes: workbook_bytes(&tables, &reports.header)?,
                });
            }
        }
    }

    Ok(files)
}

/// Render all reports, then write them into `dir`. Nothing is written if rendering fails.
pub fn write_reports(
    reports: &ReportSet,
    project_number: &str,
    dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let files = render_reports(reports, project_number, format)?;

    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.file_name);
        std::fs::write(&path, &file.bytes)?;
        info!("Generated: {}", path.display());
        written.push(path);
    }

    Ok(written)
}

fn single_table(reports: &ReportSet, kind: ReportKind) -> &Table {
    match kind {
        ReportKind::Glass => &reports.glass,
        ReportKind::AggCutOnly => &reports.agg_cut_only,
        ReportKind::Table | ReportKind::TagDetails => &reports.swr_table,
    }
}

/// Header block as rows of `(label, value)`; shared by the renderers.
pub(crate) fn header_rows(header: &ReportHeader) -> impl Iterator<Item = (&str, &str)> + '_ {
    header
        .entries
        .iter()
        .map(|(label, value)| (label.as_str(), value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigInput, Configuration};
    use crate::model::UnitRow;
    use crate::report::build_reports;
    use crate::transform::derive_rows;

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name("24-118", "Glass", OutputFormat::Xlsx),
            "INO_24-118_SWR_Glass.xlsx"
        );
        assert_eq!(
            report_file_name("A/B 7", "AggCutOnly", OutputFormat::Csv),
            "INO_A-B_7_SWR_AggCutOnly.csv"
        );
    }

    #[test]
    fn test_unique_name_case_insensitive() {
        let mut used = HashSet::new();
        assert_eq!(unique_name("A-B", usize::MAX, &mut used), "A-B");
        assert_eq!(unique_name("a-b", usize::MAX, &mut used), "a-b~2");
        assert_eq!(unique_name("A-B", usize::MAX, &mut used), "A-B~3");
        assert_eq!(unique_name("ABCDE", 4, &mut used), "ABCDE");
        assert_eq!(unique_name("ABCDE", 4, &mut used), "AB~2");
    }

    #[test]
    fn test_csv_tag_files_are_unique() {
        let input = ConfigInput {
            project_number: "P".into(),
            ..Default::default()
        };
        let config = Configuration::resolve(&input).unwrap();
        let rows = [
            UnitRow::new(1, 40.0, 60.0, 1, "A/B"),
            UnitRow::new(2, 30.0, 50.0, 1, "A:B"),
            UnitRow::new(3, 30.0, 50.0, 1, "a b"),
            UnitRow::new(4, 30.0, 50.0, 1, "a_b"),
        ];
        let reports = build_reports(&derive_rows(&rows, &config).unwrap(), &config);

        let files = render_reports(&reports, "P", OutputFormat::Csv).unwrap();
        let tag_files: Vec<&str> = files
            .iter()
            .map(|f| f.file_name.as_str())
            .filter(|n| n.contains("_TagDetails_"))
            .collect();

        assert_eq!(
            tag_files,
            vec![
                "INO_P_SWR_TagDetails_A-B.csv",
                "INO_P_SWR_TagDetails_A-B~2.csv",
                "INO_P_SWR_TagDetails_a_b.csv",
                "INO_P_SWR_TagDetails_a_b~2.csv",
            ]
        );
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("XLSX".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }
}
