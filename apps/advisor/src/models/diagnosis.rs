use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanyType {
    #[default]
    #[serde(rename = "법인")]
    Corporation,
    #[serde(rename = "개인사업자")]
    SoleProprietor,
    #[serde(rename = "기타")]
    Other,
}

impl CompanyType {
    pub const ALL: [CompanyType; 3] = [
        CompanyType::Corporation,
        CompanyType::SoleProprietor,
        CompanyType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CompanyType::Corporation => "법인",
            CompanyType::SoleProprietor => "개인사업자",
            CompanyType::Other => "기타",
        }
    }
}

/// One form submission. Request-scoped, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosisInput {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub company_type: CompanyType,
    #[serde(default)]
    pub company_name: String,
    /// HTML date inputs submit "" when left blank.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date: Option<NaiveDate>,
    /// 기업현황 및 DT 이슈
    #[serde(default)]
    pub issue: String,
    /// DT 애로사항 (pain points)
    #[serde(default)]
    pub pain_point: String,
    /// 기타 의견 (교육 니즈)
    #[serde(default)]
    pub other_needs: String,
}

impl DiagnosisInput {
    /// At least one of the two diagnosis texts must be filled in.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.issue.trim().is_empty() && self.pain_point.trim().is_empty() {
            return Err(AppError::Validation(
                "기업현황 및 DT 이슈 또는 DT 애로사항을 입력해주세요.".to_string(),
            ));
        }
        Ok(())
    }

    /// The submitted date, or today when the field was left blank.
    pub fn effective_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Utc::now().date_naive())
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
