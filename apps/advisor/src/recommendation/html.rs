//! Server-rendered diagnosis page: the input form, load diagnostics and,
//! after a submission, the recommendation with its two collapsible panels.

use std::fmt::Write;

use crate::catalog::{DiagnosticSeverity, LoadDiagnostic};
use crate::models::{CompanyType, DiagnosisInput};
use crate::recommendation::pipeline::RecommendationOutcome;

const PAGE_TITLE: &str = "K-하이테크 기업 진단 및 강의 추천 (커리큘럼 기반)";

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
label{display:block;margin-top:.8rem;font-weight:600}\
input,select,textarea{width:100%;padding:.4rem;box-sizing:border-box}\
.row{display:flex;gap:1rem}.row>div{flex:1}\
.error{background:#fdecea;padding:.8rem;border-radius:4px}\
.warning{background:#fff8e1;padding:.8rem;border-radius:4px}\
.info{background:#e8f4fd;padding:.8rem;border-radius:4px}\
.output{white-space:pre-wrap;line-height:1.5}\
details{margin-top:1rem}pre{white-space:pre-wrap}";

/// Everything one page render needs.
pub struct PageView<'a> {
    pub input: &'a DiagnosisInput,
    pub diagnostics: &'a [LoadDiagnostic],
    /// False when no valid courses are loaded; the form is then withheld.
    pub catalog_ready: bool,
    pub error: Option<&'a str>,
    pub outcome: Option<&'a RecommendationOutcome>,
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut body = String::new();
    let _ = write!(body, "<h1>🏭 {}</h1>", escape_html(PAGE_TITLE));

    render_diagnostics(&mut body, view.diagnostics);

    if view.catalog_ready {
        render_form(&mut body, view.input);
    } else {
        body.push_str(
            "<p class=\"error\">⚠️ 유효한 강의 목록이 없어 추천을 진행할 수 없습니다. \
             데이터 파일을 확인한 뒤 다시 시도해주세요.</p>",
        );
    }

    if let Some(error) = view.error {
        let _ = write!(body, "<p class=\"error\">{}</p>", escape_html(error));
    }

    if let Some(outcome) = view.outcome {
        render_outcome(&mut body, outcome);
    }

    format!(
        "<!DOCTYPE html><html lang=\"ko\"><head><meta charset=\"utf-8\">\
         <title>{title}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        title = escape_html(PAGE_TITLE),
    )
}

fn render_diagnostics(out: &mut String, diagnostics: &[LoadDiagnostic]) {
    for diagnostic in diagnostics {
        let class = match diagnostic.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        let _ = write!(
            out,
            "<p class=\"{class}\">⚠️ [{:?}] {}</p>",
            diagnostic.source,
            escape_html(&diagnostic.message)
        );
    }
}

fn render_form(out: &mut String, input: &DiagnosisInput) {
    let date = input
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let mut options = String::new();
    for kind in CompanyType::ALL {
        let selected = if kind == input.company_type {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            options,
            "<option value=\"{0}\"{selected}>{0}</option>",
            kind.label()
        );
    }

    let _ = write!(
        out,
        "<p class=\"info\">💡 기업 정보를 입력해주세요.</p>\
         <form method=\"post\" action=\"/recommend\">\
         <div class=\"row\"><div>\
         <label for=\"industry\">주업종</label>\
         <input id=\"industry\" name=\"industry\" placeholder=\"예: 제조업 (자동차 부품)\" value=\"{industry}\">\
         <label for=\"company_type\">기업 유형</label>\
         <select id=\"company_type\" name=\"company_type\">{options}</select>\
         </div><div>\
         <label for=\"company_name\">지원 기업명</label>\
         <input id=\"company_name\" name=\"company_name\" placeholder=\"(주)OOO\" value=\"{company_name}\">\
         <label for=\"date\">수행 일자</label>\
         <input id=\"date\" name=\"date\" type=\"date\" value=\"{date}\">\
         </div></div>\
         <h3>📝 기업 진단 입력</h3>\
         <label for=\"issue\">1. 기업현황 및 DT 이슈</label>\
         <textarea id=\"issue\" name=\"issue\" rows=\"4\" \
         placeholder=\"예: 주요 생산품은 차체용접설비이며, MES 도입 필요성은 인지하나 이해 부족으로 구축하지 못함.\">{issue}</textarea>\
         <label for=\"pain_point\">2. DT 애로사항 (Pain Points)</label>\
         <textarea id=\"pain_point\" name=\"pain_point\" rows=\"4\" \
         placeholder=\"예: 설비 제작 시 물류 관리 전산화가 안 되어 업무 Loss 발생.\">{pain_point}</textarea>\
         <label for=\"other_needs\">3. 기타 의견 (교육 니즈)</label>\
         <textarea id=\"other_needs\" name=\"other_needs\" rows=\"3\" \
         placeholder=\"예: 스마트공장 구축 실무 경험 부족으로 기초 교육 희망.\">{other_needs}</textarea>\
         <p><button type=\"submit\">🚀 AI 맞춤 강의 추천 시작</button></p>\
         </form>",
        industry = escape_html(&input.industry),
        company_name = escape_html(&input.company_name),
        issue = escape_html(&input.issue),
        pain_point = escape_html(&input.pain_point),
        other_needs = escape_html(&input.other_needs),
    );
}

fn render_outcome(out: &mut String, outcome: &RecommendationOutcome) {
    let _ = write!(
        out,
        "<hr><h2>📋 K-하이테크 맞춤형 교육 커리큘럼 제안서</h2>\
         <div class=\"output\">{}</div>",
        escape_html(&outcome.recommendation)
    );

    let unknown: Vec<&str> = outcome
        .recommended_courses
        .iter()
        .filter(|s| !s.is_known())
        .map(|s| s.course.as_str())
        .collect();
    if !unknown.is_empty() {
        let _ = write!(
            out,
            "<p class=\"warning\">⚠️ 강의 목록에 없는 과정명: {}</p>",
            escape_html(&unknown.join(", "))
        );
    }

    let rag = if outcome.rag_context.is_empty() {
        "유사 사례가 없습니다."
    } else {
        outcome.rag_context.as_str()
    };
    let _ = write!(
        out,
        "<details><summary>🔍 AI가 참고한 유사 기업 사례 (RAG)</summary><pre>{}</pre></details>\
         <details><summary>📚 전체 커리큘럼 목록 보기</summary><pre>{}</pre></details>",
        escape_html(rag),
        escape_html(&outcome.curriculum_text)
    );
}

/// Escapes text for both element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
