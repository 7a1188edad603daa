//! Checks the courses named in the model's 3-step answer against the catalog.
//!
//! Advisory only: unknown courses are reported, never rejected.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::catalog::CourseCatalog;

/// `**Step 2 (핵심/해결):** 과정명`, `**Step 2 (핵심/해결)**: 과정명`
/// or `**Step 2 (핵심/해결): 과정명**`.
static STEP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)\*\*\s*Step\s*([123])\b([^*\n]*)\*\*[ \t]*:?[ \t]*(.*)$")
        .expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendedStep {
    pub step: u8,
    /// Course text as written by the model.
    pub course: String,
    /// Catalog name it resolved to, if any.
    pub canonical: Option<String>,
}

impl RecommendedStep {
    pub fn is_known(&self) -> bool {
        self.canonical.is_some()
    }
}

/// Extracts the first course line for each step and resolves it against the catalog.
pub fn ground_steps(response: &str, catalog: &CourseCatalog) -> Vec<RecommendedStep> {
    let mut steps: Vec<RecommendedStep> = Vec::new();

    for caps in STEP_LINE.captures_iter(response) {
        let Ok(step) = caps[1].parse::<u8>() else {
            continue;
        };
        if steps.iter().any(|s| s.step == step) {
            continue;
        }
        // Course inside the bold span wins; otherwise it follows the span.
        let in_bold = caps[2]
            .split_once(':')
            .map(|(_, tail)| clean_course_text(tail))
            .unwrap_or_default();
        let course = if in_bold.is_empty() {
            clean_course_text(&caps[3])
        } else {
            in_bold
        };
        if course.is_empty() {
            debug!("Step {step} line names no course: {:?}", &caps[0]);
            continue;
        }
        let canonical = catalog.resolve(&course).map(str::to_string);
        steps.push(RecommendedStep {
            step,
            course,
            canonical,
        });
    }

    steps.sort_by_key(|s| s.step);
    steps
}

fn clean_course_text(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '*' || c == '[' || c == ']' || c == '`' || c == '"')
        .trim()
        .to_string()
}
