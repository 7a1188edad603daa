//! Prompt Composer. Turns a diagnosis, the retrieved cases and the catalog into
//! the single instruction sent to the model.
//!
//! Pure and infallible: missing reference data renders as empty sections.

pub mod templates;

use crate::catalog::CaseRecord;
use crate::models::DiagnosisInput;
use templates::{
    CASE_CONTEXT_TEMPLATE, CASE_PREVIEW_CHARS, RECOMMENDATION_PROMPT_TEMPLATE, SECTION_CURRICULUM,
    SECTION_DIAGNOSIS, SECTION_GOAL, SECTION_KEY_CONTENT, SECTION_OUTCOME, STEP_1_MARKER,
    STEP_2_MARKER, STEP_3_MARKER,
};

/// Reference data the prompt is grounded on.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// Comma-joined catalog (`CourseCatalog::as_prompt_list`).
    pub available_courses: &'a str,
    pub curriculum_text: &'a str,
    pub rag_context: &'a str,
}

/// Builds the recommendation prompt.
pub fn compose_recommendation_prompt(input: &DiagnosisInput, context: PromptContext<'_>) -> String {
    let date = input.effective_date().format("%Y-%m-%d").to_string();
    fill_template(
        RECOMMENDATION_PROMPT_TEMPLATE,
        &[
            ("industry", input.industry.as_str()),
            ("company_type", input.company_type.label()),
            ("company_name", input.company_name.as_str()),
            ("date", date.as_str()),
            ("issue", input.issue.as_str()),
            ("pain_point", input.pain_point.as_str()),
            ("other_needs", input.other_needs.as_str()),
            ("curriculum_text", context.curriculum_text),
            ("available_courses", context.available_courses),
            ("rag_context", context.rag_context),
            ("section_diagnosis", SECTION_DIAGNOSIS),
            ("section_curriculum", SECTION_CURRICULUM),
            ("section_goal", SECTION_GOAL),
            ("section_key_content", SECTION_KEY_CONTENT),
            ("section_outcome", SECTION_OUTCOME),
            ("step_1", STEP_1_MARKER),
            ("step_2", STEP_2_MARKER),
            ("step_3", STEP_3_MARKER),
        ],
    )
}

/// Renders retrieved cases as numbered precedent blocks. Empty input renders "".
pub fn render_case_context<'a, I>(cases: I) -> String
where
    I: IntoIterator<Item = &'a CaseRecord>,
{
    cases
        .into_iter()
        .enumerate()
        .map(|(i, case)| {
            let index = (i + 1).to_string();
            let issue = preview(&case.issue, CASE_PREVIEW_CHARS);
            let pain = preview(&case.pain, CASE_PREVIEW_CHARS);
            fill_template(
                CASE_CONTEXT_TEMPLATE,
                &[
                    ("index", index.as_str()),
                    ("issue", issue),
                    ("pain", pain),
                    ("course", case.course.as_str()),
                    ("to_be", case.to_be.as_str()),
                ],
            )
        })
        .collect()
}

/// First `max_chars` characters of `text`, never splitting a character.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Substitutes `{name}` placeholders in one pass.
///
/// Substituted values are never rescanned, so user text containing `{...}`
/// stays literal. Unknown placeholders are left untouched.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 1024);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let replacement = after_open.find('}').and_then(|close| {
            let name = &after_open[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after_open[close + 1..];
            }
            None => {
                out.push('{');
                rest = after_open;
            }
        }
    }
    out.push_str(rest);
    out
}
