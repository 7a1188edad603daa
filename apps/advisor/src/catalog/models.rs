use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::normalize::normalize_course_name;

// ────────────────────────────────────────────────────────────────────────────
// Course catalog
// ────────────────────────────────────────────────────────────────────────────

/// The authoritative list of valid course labels.
///
/// Names are non-empty and unique, in first-appearance order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseCatalog {
    names: Vec<String>,
}

impl CourseCatalog {
    /// Builds a catalog, trimming names and dropping blanks and duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .filter(|n| seen.insert(n.clone()))
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Comma-joined list used inside the generation prompt.
    pub fn as_prompt_list(&self) -> String {
        self.names.join(", ")
    }

    /// Finds the canonical name for a possibly decorated course label.
    ///
    /// Exact match first, then comparison of normalised keys.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let trimmed = name.trim();
        if let Some(exact) = self.names.iter().find(|n| n.as_str() == trimmed) {
            return Some(exact.as_str());
        }

        let key = normalize_course_name(trimmed);
        if key.is_empty() {
            return None;
        }
        self.names
            .iter()
            .find(|n| normalize_course_name(n) == key)
            .map(String::as_str)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Case knowledge base
// ────────────────────────────────────────────────────────────────────────────

/// One historical company-diagnosis case. Missing source values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub course: String,
    pub pain: String,
    pub issue: String,
    pub as_is: String,
    pub to_be: String,
    pub goal: String,
    pub job: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Curriculum tracks
// ────────────────────────────────────────────────────────────────────────────

/// A named, ordered curriculum path. `courses` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumTrack {
    pub track_id: String,
    pub name: String,
    pub description: String,
    pub courses: Vec<String>,
}

impl CurriculumTrack {
    /// Prompt rendering: `[트랙 id: name]`, description, courses joined by `->`.
    pub fn render(&self) -> String {
        format!(
            "\n[트랙 {}: {}]\n- 설명: {}\n- 연계 과정 순서: {}\n",
            self.track_id,
            self.name,
            self.description,
            self.courses.join(" -> ")
        )
    }
}

/// Concatenated rendering of every track, in order.
pub fn render_tracks(tracks: &[CurriculumTrack]) -> String {
    tracks.iter().map(CurriculumTrack::render).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Load diagnostics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    DataDir,
    Master,
    Curriculum,
    Cases,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Warning,
    Error,
}

/// A problem found while loading one source. Never aborts the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadDiagnostic {
    pub source: DataSource,
    pub severity: DiagnosticSeverity,
    pub message: String,
}

impl LoadDiagnostic {
    pub fn error(source: DataSource, message: impl Into<String>) -> Self {
        Self {
            source,
            severity: DiagnosticSeverity::Error,
            message: message.into(),
        }
    }

    pub fn warning(source: DataSource, message: impl Into<String>) -> Self {
        Self {
            source,
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Snapshot
// ────────────────────────────────────────────────────────────────────────────

/// Everything loaded from the reference files, immutable once built.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub catalog: CourseCatalog,
    pub cases: Vec<CaseRecord>,
    pub tracks: Vec<CurriculumTrack>,
    pub curriculum_text: String,
    pub diagnostics: Vec<LoadDiagnostic>,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(
        catalog: CourseCatalog,
        cases: Vec<CaseRecord>,
        tracks: Vec<CurriculumTrack>,
        diagnostics: Vec<LoadDiagnostic>,
    ) -> Self {
        let curriculum_text = render_tracks(&tracks);
        Self {
            catalog,
            cases,
            tracks,
            curriculum_text,
            diagnostics,
            loaded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_dedups_and_drops_blanks() {
        let catalog = CourseCatalog::from_names(["MES 기초", " MES 기초 ", "", "  ", "PLC 제어"]);
        assert_eq!(catalog.names(), &["MES 기초".to_string(), "PLC 제어".to_string()]);
        assert_eq!(catalog.as_prompt_list(), "MES 기초, PLC 제어");
    }

    #[test]
    fn test_resolve_exact_then_normalized() {
        let catalog = CourseCatalog::from_names(["스마트공장 구축 양성과정", "MES 기초"]);
        assert_eq!(catalog.resolve("MES 기초"), Some("MES 기초"));
        assert_eq!(
            catalog.resolve("스마트공장 구축 (2기)"),
            Some("스마트공장 구축 양성과정")
        );
        assert_eq!(catalog.resolve("존재하지 않는 강의"), None);
        assert_eq!(catalog.resolve("(온라인)"), None);
    }

    #[test]
    fn test_track_render_format() {
        let track = CurriculumTrack {
            track_id: "T1".to_string(),
            name: "스마트제조".to_string(),
            description: "제조 DX".to_string(),
            courses: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(
            track.render(),
            "\n[트랙 T1: 스마트제조]\n- 설명: 제조 DX\n- 연계 과정 순서: A -> B\n"
        );
    }

    #[test]
    fn test_empty_tracks_render_empty() {
        assert_eq!(render_tracks(&[]), "");
    }
}
