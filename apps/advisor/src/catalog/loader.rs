//! CSV loading for the three reference sources.
//!
//! Every source fails independently: a missing file, an undecodable file or a
//! missing required column empties that source and records a diagnostic, while
//! the other sources still load. Columns are looked up by (trimmed) header name.

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::catalog::encoding::{read_source, SourceError};
use crate::catalog::models::{
    CaseRecord, CatalogSnapshot, CourseCatalog, CurriculumTrack, DataSource, LoadDiagnostic,
};
use crate::config::DataSources;

/// Canonical course label column, shared by the master list and the case base.
pub const COURSE_LABEL_COLUMN: &str = "훈련과정명(정답라벨)";

pub const TRACK_ID_COLUMN: &str = "트랙ID";
pub const TRACK_NAME_COLUMN: &str = "트랙명";
pub const TRACK_DESCRIPTION_COLUMN: &str = "트랙설명";
pub const TRACK_ORDER_COLUMN: &str = "과정순서";
pub const TRACK_COURSE_COLUMN: &str = "과정명";

pub const CASE_PAIN_COLUMN: &str = "DT 에로사항";
pub const CASE_ISSUE_COLUMN: &str = "기업현황 및 DT이슈";
pub const CASE_AS_IS_COLUMN: &str = "AS-IS";
pub const CASE_TO_BE_COLUMN: &str = "To_Be";
pub const CASE_GOAL_COLUMN: &str = "목표";
pub const CASE_JOB_COLUMN: &str = "훈련 직무";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("missing column '{expected}'; columns found: {found:?}")]
    MissingColumn { expected: String, found: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Snapshot assembly
// ────────────────────────────────────────────────────────────────────────────

/// Loads all three sources into a snapshot. Never fails; problems become diagnostics.
pub fn load_snapshot(sources: &DataSources) -> CatalogSnapshot {
    let mut diagnostics = Vec::new();

    if !sources.data_dir.is_dir() {
        let message = format!("data directory not found: {}", sources.data_dir.display());
        error!("{message}");
        diagnostics.push(LoadDiagnostic::error(DataSource::DataDir, message));
        return CatalogSnapshot::new(CourseCatalog::default(), vec![], vec![], diagnostics);
    }

    let catalog = load_course_catalog(&sources.master_path(), &mut diagnostics)
        .unwrap_or_else(|e| degrade(DataSource::Master, e, &mut diagnostics));
    info!("Course catalog loaded: {} courses", catalog.len());

    let tracks = load_curriculum_tracks(&sources.curriculum_path(), &mut diagnostics)
        .unwrap_or_else(|e| degrade(DataSource::Curriculum, e, &mut diagnostics));
    info!("Curriculum loaded: {} tracks", tracks.len());

    let cases = load_case_records(&sources.cases_path(), &mut diagnostics)
        .unwrap_or_else(|e| degrade(DataSource::Cases, e, &mut diagnostics));
    info!("Case knowledge base loaded: {} cases", cases.len());

    CatalogSnapshot::new(catalog, cases, tracks, diagnostics)
}

fn degrade<T: Default>(
    source: DataSource,
    err: LoadError,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> T {
    error!("Failed to load {source:?}: {err}");
    diagnostics.push(LoadDiagnostic::error(source, err.to_string()));
    T::default()
}

// ────────────────────────────────────────────────────────────────────────────
// Individual sources
// ────────────────────────────────────────────────────────────────────────────

/// Master course list: unique, non-empty values of `훈련과정명(정답라벨)`.
pub fn load_course_catalog(
    path: &Path,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> Result<CourseCatalog, LoadError> {
    let table = Table::read(path, DataSource::Master, diagnostics)?;
    let column = table.require(COURSE_LABEL_COLUMN)?;
    Ok(CourseCatalog::from_names(
        table.rows.iter().map(|row| row.get(column).unwrap_or("")),
    ))
}

/// Curriculum tracks grouped by (ID, name, description), courses ordered by `과정순서`.
pub fn load_curriculum_tracks(
    path: &Path,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> Result<Vec<CurriculumTrack>, LoadError> {
    let table = Table::read(path, DataSource::Curriculum, diagnostics)?;
    let id_col = table.require(TRACK_ID_COLUMN)?;
    let name_col = table.require(TRACK_NAME_COLUMN)?;
    let desc_col = table.require(TRACK_DESCRIPTION_COLUMN)?;
    let order_col = table.require(TRACK_ORDER_COLUMN)?;
    let course_col = table.require(TRACK_COURSE_COLUMN)?;

    type TrackKey = (String, String, String);
    let mut index: HashMap<TrackKey, usize> = HashMap::new();
    let mut groups: Vec<(TrackKey, Vec<(i64, String)>)> = Vec::new();

    for (line, row) in table.numbered_rows() {
        let course = cell(row, Some(course_col)).trim().to_string();
        if course.is_empty() {
            diagnostics.push(LoadDiagnostic::warning(
                DataSource::Curriculum,
                format!("line {line}: empty '{TRACK_COURSE_COLUMN}', row skipped"),
            ));
            continue;
        }
        let raw_order = cell(row, Some(order_col));
        let Some(order) = parse_order(&raw_order) else {
            diagnostics.push(LoadDiagnostic::warning(
                DataSource::Curriculum,
                format!("line {line}: '{TRACK_ORDER_COLUMN}' is not an integer ({raw_order:?}), row skipped"),
            ));
            continue;
        };

        let key = (
            cell(row, Some(id_col)).trim().to_string(),
            cell(row, Some(name_col)).trim().to_string(),
            cell(row, Some(desc_col)).trim().to_string(),
        );
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push((order, course));
    }

    let mut tracks: Vec<CurriculumTrack> = groups
        .into_iter()
        .map(|((track_id, name, description), mut courses)| {
            courses.sort_by_key(|(order, _)| *order);
            CurriculumTrack {
                track_id,
                name,
                description,
                courses: courses.into_iter().map(|(_, c)| c).collect(),
            }
        })
        .collect();

    tracks.sort_by(|a, b| {
        track_id_key(&a.track_id)
            .cmp(&track_id_key(&b.track_id))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.description.cmp(&b.description))
    });

    Ok(tracks)
}

/// Case knowledge base. Absent columns and cells become empty strings.
pub fn load_case_records(
    path: &Path,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> Result<Vec<CaseRecord>, LoadError> {
    let table = Table::read(path, DataSource::Cases, diagnostics)?;
    let columns = CaseColumns::resolve(&table.headers);

    let absent = columns.absent();
    if !absent.is_empty() {
        warn!("Case base is missing columns {absent:?}; those fields default to empty");
        diagnostics.push(LoadDiagnostic::warning(
            DataSource::Cases,
            format!(
                "missing columns {absent:?} default to empty; columns found: {:?}",
                table.headers
            ),
        ));
    }

    Ok(table
        .rows
        .iter()
        .map(|row| CaseRecord::from_record(row, &columns))
        .collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Typed row mapping for cases
// ────────────────────────────────────────────────────────────────────────────

/// Header positions of every `CaseRecord` field, resolved once per file.
#[derive(Debug, Clone, Default)]
pub struct CaseColumns {
    course: Option<usize>,
    pain: Option<usize>,
    issue: Option<usize>,
    as_is: Option<usize>,
    to_be: Option<usize>,
    goal: Option<usize>,
    job: Option<usize>,
}

impl CaseColumns {
    pub fn resolve(headers: &[String]) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            course: find(COURSE_LABEL_COLUMN),
            pain: find(CASE_PAIN_COLUMN),
            issue: find(CASE_ISSUE_COLUMN),
            as_is: find(CASE_AS_IS_COLUMN),
            to_be: find(CASE_TO_BE_COLUMN),
            goal: find(CASE_GOAL_COLUMN),
            job: find(CASE_JOB_COLUMN),
        }
    }

    /// Names of mapped columns not present in the header.
    pub fn absent(&self) -> Vec<&'static str> {
        [
            (self.course, COURSE_LABEL_COLUMN),
            (self.pain, CASE_PAIN_COLUMN),
            (self.issue, CASE_ISSUE_COLUMN),
            (self.as_is, CASE_AS_IS_COLUMN),
            (self.to_be, CASE_TO_BE_COLUMN),
            (self.goal, CASE_GOAL_COLUMN),
            (self.job, CASE_JOB_COLUMN),
        ]
        .into_iter()
        .filter(|(idx, _)| idx.is_none())
        .map(|(_, name)| name)
        .collect()
    }
}

impl CaseRecord {
    pub fn from_record(record: &StringRecord, columns: &CaseColumns) -> Self {
        Self {
            course: cell(record, columns.course),
            pain: cell(record, columns.pain),
            issue: cell(record, columns.issue),
            as_is: cell(record, columns.as_is),
            to_be: cell(record, columns.to_be),
            goal: cell(record, columns.goal),
            job: cell(record, columns.job),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Table helpers
// ────────────────────────────────────────────────────────────────────────────

/// A decoded CSV file with trimmed headers and the rows that parsed.
struct Table {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
    /// Source line of each entry in `rows`.
    lines: Vec<u64>,
}

impl Table {
    fn read(
        path: &Path,
        source: DataSource,
        diagnostics: &mut Vec<LoadDiagnostic>,
    ) -> Result<Self, LoadError> {
        let (text, encoding) = read_source(path)?;
        debug!("Decoded {} as {encoding:?}", path.display());

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        debug!("{source:?} columns: {headers:?}");

        let mut rows = Vec::new();
        let mut lines = Vec::new();
        for record in reader.records() {
            match record {
                Ok(row) => {
                    lines.push(row.position().map(|p| p.line()).unwrap_or_default());
                    rows.push(row);
                }
                Err(e) => {
                    warn!("Skipping malformed row in {}: {e}", path.display());
                    diagnostics.push(LoadDiagnostic::warning(
                        source,
                        format!("malformed row skipped: {e}"),
                    ));
                }
            }
        }

        Ok(Self {
            headers,
            rows,
            lines,
        })
    }

    fn require(&self, column: &str) -> Result<usize, LoadError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| LoadError::MissingColumn {
                expected: column.to_string(),
                found: self.headers.clone(),
            })
    }

    fn numbered_rows(&self) -> impl Iterator<Item = (u64, &StringRecord)> {
        self.lines.iter().copied().zip(self.rows.iter())
    }
}

fn cell(record: &StringRecord, column: Option<usize>) -> String {
    column
        .and_then(|idx| record.get(idx))
        .unwrap_or_default()
        .to_string()
}

/// Accepts "3" and spreadsheet-style "3.0".
fn parse_order(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Numeric IDs sort numerically and before non-numeric IDs, which sort lexically.
fn track_id_key(id: &str) -> (bool, i64, &str) {
    match id.parse::<i64>() {
        Ok(n) => (false, n, id),
        Err(_) => (true, 0, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::DiagnosticSeverity;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_master_catalog_loads_unique_names() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "master.csv",
            "번호, 훈련과정명(정답라벨) \n1,MES 기초\n2,PLC 제어\n3,MES 기초\n4,\n",
        );
        let mut diags = Vec::new();
        let catalog = load_course_catalog(&path, &mut diags).unwrap();
        assert_eq!(catalog.names(), &["MES 기초".to_string(), "PLC 제어".to_string()]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_master_missing_column_names_expected_and_found() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "master.csv", "번호,강의명\n1,MES 기초\n");
        let mut diags = Vec::new();
        let err = load_course_catalog(&path, &mut diags).unwrap_err();
        match &err {
            LoadError::MissingColumn { expected, found } => {
                assert_eq!(expected, COURSE_LABEL_COLUMN);
                assert_eq!(found, &vec!["번호".to_string(), "강의명".to_string()]);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains(COURSE_LABEL_COLUMN));
        assert!(message.contains("강의명"));
    }

    #[test]
    fn test_curriculum_orders_courses_by_order_column() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "curr.csv",
            "트랙ID,트랙명,트랙설명,과정순서,과정명\n\
             T1,Track A,desc,2,CourseY\n\
             T1,Track A,desc,1,CourseX\n",
        );
        let mut diags = Vec::new();
        let tracks = load_curriculum_tracks(&path, &mut diags).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].track_id, "T1");
        assert_eq!(tracks[0].name, "Track A");
        assert_eq!(tracks[0].courses, vec!["CourseX", "CourseY"]);
    }

    #[test]
    fn test_curriculum_groups_and_sorts_tracks_numerically() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "curr.csv",
            "트랙ID,트랙명,트랙설명,과정순서,과정명\n\
             10,B,d,1,B1\n\
             2,A,d,2,A2\n\
             2,A,d,1.0,A1\n\
             2,A,d,x,Broken\n\
             10,B,d,2,\n",
        );
        let mut diags = Vec::new();
        let tracks = load_curriculum_tracks(&path, &mut diags).unwrap();
        let ids: Vec<&str> = tracks.iter().map(|t| t.track_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "10"]);
        assert_eq!(tracks[0].courses, vec!["A1", "A2"]);
        assert_eq!(tracks[1].courses, vec!["B1"]);
        assert_eq!(diags.len(), 2);
        assert!(diags
            .iter()
            .all(|d| d.severity == DiagnosticSeverity::Warning));
    }

    #[test]
    fn test_curriculum_missing_column_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "curr.csv", "트랙ID,트랙명,과정명\nT1,A,X\n");
        let err = load_curriculum_tracks(&path, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains(TRACK_DESCRIPTION_COLUMN));
    }

    #[test]
    fn test_cases_default_missing_columns_and_cells() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "cases.csv",
            "훈련과정명(정답라벨),DT 에로사항,기업현황 및 DT이슈,To_Be\n\
             MES 기초,전산화 미비,MES 도입 필요,재고 가시화\n\
             PLC 제어,설비 노후\n",
        );
        let mut diags = Vec::new();
        let cases = load_case_records(&path, &mut diags).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(
            cases[0],
            CaseRecord {
                course: "MES 기초".to_string(),
                pain: "전산화 미비".to_string(),
                issue: "MES 도입 필요".to_string(),
                to_be: "재고 가시화".to_string(),
                ..CaseRecord::default()
            }
        );
        assert_eq!(cases[1].pain, "설비 노후");
        assert_eq!(cases[1].issue, "");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains(CASE_GOAL_COLUMN));
    }

    #[test]
    fn test_snapshot_degrades_per_source() {
        let dir = TempDir::new().unwrap();
        write(&dir, crate::config::DEFAULT_MASTER_FILE, "강의명\nMES\n");
        write(
            &dir,
            crate::config::DEFAULT_CASES_FILE,
            "훈련과정명(정답라벨),DT 에로사항\nMES 기초,전산화 미비\n",
        );
        // curriculum file intentionally absent

        let snapshot = load_snapshot(&DataSources::in_dir(dir.path()));
        assert!(snapshot.catalog.is_empty());
        assert!(snapshot.tracks.is_empty());
        assert_eq!(snapshot.curriculum_text, "");
        assert_eq!(snapshot.cases.len(), 1);

        let errors: Vec<DataSource> = snapshot
            .diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .map(|d| d.source)
            .collect();
        assert_eq!(errors, vec![DataSource::Master, DataSource::Curriculum]);
    }

    #[test]
    fn test_snapshot_missing_data_dir() {
        let snapshot = load_snapshot(&DataSources::in_dir("/no/such/advisor/data"));
        assert!(snapshot.catalog.is_empty());
        assert_eq!(snapshot.diagnostics.len(), 1);
        assert_eq!(snapshot.diagnostics[0].source, DataSource::DataDir);
    }

    #[test]
    fn test_cp949_file_loads() {
        let dir = TempDir::new().unwrap();
        let (bytes, _, _) = encoding_rs::EUC_KR.encode("훈련과정명(정답라벨)\n스마트공장 구축\n");
        let path = dir.path().join("master.csv");
        fs::write(&path, &bytes[..]).unwrap();
        let catalog = load_course_catalog(&path, &mut Vec::new()).unwrap();
        assert_eq!(catalog.names(), &["스마트공장 구축".to_string()]);
    }

    #[test]
    fn test_track_id_key_puts_numeric_ids_first() {
        assert!(track_id_key("9") < track_id_key("10"));
        assert!(track_id_key("10") < track_id_key("A"));
        assert!(track_id_key("1a") > track_id_key("9"));
    }
}
