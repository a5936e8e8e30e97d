use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoftwareType {
    Gui,
    Backend,
}

impl SoftwareType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoftwareType::Gui => "gui",
            SoftwareType::Backend => "backend",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SoftwareType::Gui => "图形化软件",
            SoftwareType::Backend => "后端软件",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SoftwareType::Gui => "包括APP、Web网站等交互式应用",
            SoftwareType::Backend => "后端服务、算法软件、机器学习等",
        }
    }

    /// Long form used in the planning user prompt.
    pub fn full_label(&self) -> String {
        format!("{}（{}）", self.label(), self.description())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Planning,
    Code,
    Doc,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Planning => "planning",
            StageKind::Code => "code",
            StageKind::Doc => "doc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StageKind::Planning => "项目规划",
            StageKind::Code => "代码文档",
            StageKind::Doc => "说明文档",
        }
    }
}

/// Forward-only: Waiting → Generating → Done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Waiting,
    Generating,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleResponse {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub software_type: SoftwareType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub software_type: SoftwareType,
    pub planning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub software_type: SoftwareType,
    pub planning: String,
    pub code: String,
}

pub const TITLE_MAX_CHARS: usize = 24;

/// CJK ideographs, latin letters and digits only.
pub fn is_title_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Returns the first violated rule as a user-facing message, None for a valid
/// title. An empty title is not an error here, the wizard blocks it separately.
pub fn title_error(title: &str) -> Option<&'static str> {
    if title.chars().count() > TITLE_MAX_CHARS {
        return Some("标题不能超过24个字");
    }
    if title.chars().any(char::is_whitespace) {
        return Some("标题不能包含空格");
    }
    if !title.chars().all(is_title_char) {
        return Some("标题只能包含中文、英文和数字");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_type_serde() {
        assert_eq!(serde_json::to_string(&SoftwareType::Gui).unwrap(), "\"gui\"");
        assert_eq!(
            serde_json::from_str::<SoftwareType>("\"backend\"").unwrap(),
            SoftwareType::Backend
        );
    }

    #[test]
    fn test_stage_request_field_names() {
        let request = CodeRequest {
            title: "基于LSTM的成绩分析系统".to_string(),
            software_type: SoftwareType::Backend,
            planning: "# 规划".to_string(),
        };
        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "backend");
        assert_eq!(json["title"], "基于LSTM的成绩分析系统");
        assert_eq!(json["planning"], "# 规划");
    }

    #[test]
    fn test_title_with_space_rejected() {
        assert_eq!(title_error("AB CD"), Some("标题不能包含空格"));
    }

    #[test]
    fn test_title_over_limit_rejected() {
        let long: String = std::iter::repeat('统').take(25).collect();
        assert_eq!(title_error(&long), Some("标题不能超过24个字"));
    }

    #[test]
    fn test_title_bad_charset_rejected() {
        assert_eq!(title_error("成绩分析-系统"), Some("标题只能包含中文、英文和数字"));
    }

    #[test]
    fn test_valid_titles_pass() {
        assert_eq!(title_error("基于LSTM的成绩分析系统"), None);
        assert_eq!(title_error("DataPlatform2024"), None);
        let exactly_24: String = std::iter::repeat('统').take(24).collect();
        assert_eq!(title_error(&exactly_24), None);
        // empty is handled by the wizard, not the validator
        assert_eq!(title_error(""), None);
    }
}
