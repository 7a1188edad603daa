// All LLM prompt text for curriculum recommendation.
// Placeholders are `{name}` and are filled by `fill_template` in a single pass.

pub const SECTION_DIAGNOSIS: &str = "#### 1. 기업 진단 내용";
pub const SECTION_CURRICULUM: &str = "#### 2. 추천 훈련과정 (3단계 커리큘럼)";
pub const SECTION_GOAL: &str = "#### 3. 훈련 목표";
pub const SECTION_KEY_CONTENT: &str = "#### 4. 훈련 주요 내용";
pub const SECTION_OUTCOME: &str = "#### 5. 기대 효과 (AS-IS -> To-Be)";

/// The five sections every recommendation must contain, in order.
pub const REQUIRED_SECTIONS: [&str; 5] = [
    SECTION_DIAGNOSIS,
    SECTION_CURRICULUM,
    SECTION_GOAL,
    SECTION_KEY_CONTENT,
    SECTION_OUTCOME,
];

/// Step markers the model is asked to emit; also used to read its answer back.
pub const STEP_1_MARKER: &str = "**Step 1 (기초/입문):**";
pub const STEP_2_MARKER: &str = "**Step 2 (핵심/해결):**";
pub const STEP_3_MARKER: &str = "**Step 3 (심화/확장):**";

/// Number of characters of a case's issue/pain text shown in the RAG context.
pub const CASE_PREVIEW_CHARS: usize = 50;

/// One retrieved case. Replace: {index}, {issue}, {pain}, {course}, {to_be}
pub const CASE_CONTEXT_TEMPLATE: &str = "
[유사 사례 {index}]
- 상황: {issue}...
- 애로사항: {pain}...
- -> 해결 강의: {course}
- -> 결과(To-Be): {to_be}
";

/// Curriculum recommendation prompt.
/// Replace: {industry}, {company_type}, {company_name}, {date}, {issue},
///          {pain_point}, {other_needs}, {curriculum_text}, {available_courses},
///          {rag_context}, and the section/step markers.
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"당신은 한국공학대학교 K-하이테크 플랫폼의 교육 컨설턴트입니다.
기업 정보를 분석하여 가장 적합한 **교육 커리큘럼(3단계 코스)**을 설계하세요.

[입력된 기업 정보]
- 주업종: {industry}
- 기업 유형: {company_type}
- 지원 기업명: {company_name}
- 수행 일자: {date}
- 기업현황 및 이슈: {issue}
- DT 애로사항: {pain_point}
- 기타 니즈: {other_needs}

[제공된 커리큘럼 구조 (Curriculum Tracks)]
**반드시 아래 트랙 중에서 하나를 선택하여, 그 안에 포함된 강의들로 3단계 코스를 구성하세요.**
{curriculum_text}

[유효한 강의명 목록]
강의명은 아래 목록에 있는 이름을 그대로 사용하세요.
{available_courses}

[참고 가능한 과거 사례 (RAG)]
{rag_context}

[결과물 작성 양식 (Strict Format)]
제목 크기는 작게(####) 작성하세요.

{section_diagnosis}
(기업의 현황과 애로사항을 분석하여 교육 필요성을 3~4줄로 요약)

{section_curriculum}
선정된 트랙: [트랙명 작성]

- {step_1} [강의명]
  - *선정 이유:* (해당 트랙의 기초 과정으로서의 역할 설명)

- {step_2} [강의명]
  - *선정 이유:* (기업의 애로사항 "{pain_point}"을 직접 해결하는 핵심 강의임)

- {step_3} [강의명]
  - *선정 이유:* (심화 학습 또는 연계 역량 강화 목적)

{section_goal}
(전체 커리큘럼을 통해 달성하고자 하는 목표)

{section_key_content}
(Step 2 핵심 강의를 중심으로 주요 내용 3가지 요약)

{section_outcome}
- **AS-IS (현재):** {pain_point} 요약
- **To-Be (변화):** 교육 이수 후 개선될 모습
"#;
