use log::debug;

use crate::services::completion::{ChatMessage, CompletionClient, CompletionError, TITLE_MODEL};
use crate::types::{is_title_char, TITLE_MAX_CHARS};

pub const TITLE_SUFFIXES: [&str; 3] = ["系统", "平台", "软件"];
pub const DEFAULT_SUFFIX: &str = "系统";

const NAMING_SYSTEM_PROMPT: &str = "你是一个软件著作权作品命名专家。根据用户的描述，生成一个专业的软件名称，不超过24个字。形如\"基于CNN的页岩孔隙研究系统\"。你需要思考其相关的尖端技术或算法，并在名称中体现具体的技术算法名称。只返回名称，不要其他解释和任何其余符号。";

/// One non-streaming completion, then normalize the result into a valid title.
pub async fn generate_title(
    client: &CompletionClient,
    prompt: &str,
) -> Result<String, CompletionError> {
    let messages = [
        ChatMessage::system(NAMING_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ];
    let raw = client
        .complete(TITLE_MODEL, &messages, Some(0.7), Some(200))
        .await?;
    let title = finalize_title(&raw);
    debug!("generated title {title:?} from raw completion {raw:?}");
    Ok(title)
}

/// Strips everything outside the allowed charset (which also removes markdown
/// punctuation and whitespace) and caps the length.
pub fn sanitize_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| is_title_char(*c))
        .take(TITLE_MAX_CHARS)
        .collect()
}

/// Sanitizes and guarantees an accepted suffix. The default suffix counts
/// against the 24-char cap, so the base is truncated to make room for it.
pub fn finalize_title(raw: &str) -> String {
    let mut title = sanitize_title(raw);
    if TITLE_SUFFIXES.iter().any(|suffix| title.ends_with(suffix)) {
        return title;
    }
    let keep = TITLE_MAX_CHARS - DEFAULT_SUFFIX.chars().count();
    if title.chars().count() > keep {
        title = title.chars().take(keep).collect();
    }
    title.push_str(DEFAULT_SUFFIX);
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::title_error;

    #[test]
    fn test_sanitize_strips_markup_and_punctuation() {
        assert_eq!(sanitize_title("# **基于CNN的识别系统**"), "基于CNN的识别系统");
        assert_eq!(sanitize_title("  智能 医疗、影像！分析平台  "), "智能医疗影像分析平台");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long: String = std::iter::repeat('数').take(40).collect();
        assert_eq!(sanitize_title(&long).chars().count(), 24);
    }

    #[test]
    fn test_finalize_appends_default_suffix() {
        assert_eq!(finalize_title("成绩分析"), "成绩分析系统");
        assert_eq!(finalize_title("财务决策平台"), "财务决策平台");
        assert_eq!(finalize_title("智能合同审查软件"), "智能合同审查软件");
    }

    #[test]
    fn test_finalize_keeps_cap_when_appending() {
        // 24 chars without a suffix: truncated to leave room, still valid
        let long: String = std::iter::repeat('据').take(24).collect();
        let title = finalize_title(&long);
        assert!(title.chars().count() <= 24);
        assert!(title.ends_with(DEFAULT_SUFFIX));
        assert_eq!(title_error(&title), None);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        for raw in ["基于LSTM的成绩分析", "# 页岩孔隙流体力学模拟平台!", "", "x"] {
            let once = finalize_title(raw);
            assert_eq!(finalize_title(&once), once);
        }
    }

    #[test]
    fn test_finalize_satisfies_contract() {
        for raw in ["**智慧*城市#交通调度**", "API网关管理", "一二三四五六七八九十一二三四五六七八九十多余"] {
            let title = finalize_title(raw);
            assert!(title.chars().count() <= 24);
            assert!(TITLE_SUFFIXES.iter().any(|s| title.ends_with(s)));
            assert!(title.chars().all(crate::types::is_title_char));
        }
    }

    #[test]
    fn test_finalize_empty_input_yields_bare_suffix() {
        assert_eq!(finalize_title(""), "系统");
    }
}
