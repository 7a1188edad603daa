//! Course-name normalisation for fuzzy matching.
//!
//! The canonical stored name is never rewritten; this only produces a comparison key.

use std::sync::LazyLock;

use regex::Regex;

/// Generic suffix words. Longer words come first so "양성과정" is not reduced to "양성".
const SUFFIX_WORDS: &[&str] = &["양성과정", "훈련과정", "교육과정", "과정"];

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));

/// "3기", "2차", "1 회", "4단계", "2Step", "Step 2", "3rd".
/// The unit must end the word: "101 기초" is not a marker.
static SESSION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\s*(?:기|차|회|단계|step)\b|step\s*\d+|\b\d+(?:st|nd|rd|th)\b")
        .expect("valid regex")
});

/// Returns the fuzzy-match key for a course name.
///
/// Removes `(...)` and `[...]`, the generic suffix words and session markers,
/// then trims. Runs to a fixpoint, so the result is idempotent.
pub fn normalize_course_name(name: &str) -> String {
    let mut current = name.to_string();
    loop {
        let next = normalize_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn normalize_once(name: &str) -> String {
    let without_parens = PARENTHESIZED.replace_all(name, "");
    let mut stripped = BRACKETED.replace_all(&without_parens, "").into_owned();
    for suffix in SUFFIX_WORDS {
        stripped = stripped.replace(suffix, "");
    }
    SESSION_MARKER
        .replace_all(&stripped, "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_parenthetical_and_bracketed_text() {
        assert_eq!(
            normalize_course_name("스마트공장 구축(온라인) [심화]"),
            "스마트공장 구축"
        );
    }

    #[test]
    fn test_strips_suffix_words() {
        assert_eq!(normalize_course_name("MES 실무 양성과정"), "MES 실무");
        assert_eq!(normalize_course_name("데이터 분석 훈련과정"), "데이터 분석");
        assert_eq!(normalize_course_name("AI 교육과정"), "AI");
        assert_eq!(normalize_course_name("품질관리 과정"), "품질관리");
    }

    #[test]
    fn test_strips_session_markers() {
        assert_eq!(normalize_course_name("스마트공장 3기"), "스마트공장");
        assert_eq!(normalize_course_name("PLC 제어 2차"), "PLC 제어");
        assert_eq!(normalize_course_name("디지털 전환 4단계"), "디지털 전환");
        assert_eq!(normalize_course_name("Python Step 2"), "Python");
        assert_eq!(normalize_course_name("Python 2STEP"), "Python");
        assert_eq!(normalize_course_name("Vision AI 3rd"), "Vision AI");
    }

    #[test]
    fn test_keeps_words_that_merely_start_with_a_unit() {
        assert_eq!(normalize_course_name("AI 101 기초 실습"), "AI 101 기초 실습");
        assert_eq!(normalize_course_name("엑셀 2 차트 활용"), "엑셀 2 차트 활용");
        assert_eq!(normalize_course_name("AI 101 기초 실습 3기"), "AI 101 기초 실습");
    }

    #[test]
    fn test_keeps_plain_names() {
        assert_eq!(normalize_course_name("빅데이터 분석"), "빅데이터 분석");
    }

    #[test]
    fn test_idempotent() {
        let names = [
            "스마트공장 구축(온라인) 양성과정 3기",
            "((중첩)) 과과정정",
            "[A] (B) 과정 2차 [C]",
            "  Step 1 MES 기초 과정  ",
            "",
        ];
        for name in names {
            let once = normalize_course_name(name);
            assert_eq!(normalize_course_name(&once), once, "input: {name:?}");
        }
    }

    #[test]
    fn test_empty_and_decoration_only_names_are_empty() {
        assert_eq!(normalize_course_name(""), "");
        assert_eq!(normalize_course_name("(온라인) 과정"), "");
    }
}
