use crate::services::completion::ChatMessage;
use crate::types::SoftwareType;

// Stands in for the previously generated content in continuation calls; the
// upstream model only sees that an assistant turn happened, not its text.
pub const CONTINUATION_PLACEHOLDER: &str = "...";

pub const PLANNING_SYSTEM_PROMPT: &str = "你是一个资深的软件架构师，正在规划一个项目，该项目以申请软著的标准做。你需要为软件项目进行简单的规划。你的规划应该包含：
1. 分析标题可能涉及的具体功能和业务场景；
2. 选择最适合的编程语言和技术栈，图形化软件优先做 nextjs yarn；
3. 确定需要使用的框架和库；
4. 设计系统的主要模块和它们之间的关系；
5. 如果是图形化软件，详细设计UI界面和交互流程；
6. 如果是后端软件，详细设计API接口和数据处理流程；
7. 考虑可能需要的算法或机器学习模型；
8. 优先自己写服务，并且保证代码完整性，不要省略任何代码片段；
9. 设计完整的代码目录结构，比如，在使用 nextjs 时，详细设计 pages 和 components 目录结构，以及next.config.js/tsconfig.json/tailwind.config.js 等所有配置文件；
10. 为了合理的展示前端 demo 并进行 UI 展示，前端需要你自己生成并填充一些数据，后端同理；
请用详细的文段描述你的规划，确保内容充实且专业。使用 Markdown 格式输出，包含适当的标题、列表和代码块。直接开始输出项目规划内容，不用输出其他无关语句。";

pub const PLANNING_CONTINUATION_PROMPT: &str = "继续完善和扩展已生成的项目规划。要求：
1. 补充各模块的功能细节和业务流程
2. 完善技术选型和框架使用的说明
3. 扩展接口设计和数据处理流程
4. 补充目录结构中遗漏的文件和配置
保持行文风格一致，使用 Markdown 格式输出。";

pub const CODE_SYSTEM_PROMPT: &str = "你是一个专业的全栈开发工程师。你需要根据项目规划编写完整的项目代码。为了后续给该项目申请软著，项目代码一定要详细，按照软著标准写。代码要求：
1. 代码结构清晰，包含必要的注释;
2. 实现规划中提到的所有主要功能;
3. 代码行数不少于1000行;
4. 代码符合最佳实践和设计模式;
5. 确保代码可以直接运行;
6. 尽可能多的代码行数，能写的逻辑优先重写完整逻辑，少用现成的包;
7. 使用 Markdown 格式输出，使用代码块包裹代码，代码块第一行说明该文件位置和名称
8. 提供每个文件的完整代码，不要有任何省略;
9. 优先自己写服务，并且保证代码完整性，不要省略任何代码片段；
10. 设计完整的代码目录结构，比如，在使用 nextjs 时，详细设计 pages 和 components 目录结构，以及next.config.js/tsconfig.json/tailwind.config.js 等所有配置文件；
";

pub const CODE_CONTINUATION_PROMPT: &str = "继续完善和扩展已生成的代码。要求：
1. 添加更多的组件和工具函数
2. 增加错误处理和边界情况
3. 添加更多的注释和文档字符串
4. 实现更多的辅助功能
5. 添加单元测试代码
保持代码风格一致，使用 Markdown 格式输出。";

pub const DOC_SYSTEM_PROMPT: &str = "你是一个专业的技术文档撰写专家。你需要为软件项目编写详细的说明文档，用于软件著作权申请。要求：
1. 文档结构清晰，语言专业准确
2. 详细说明软件的功能特点、技术特点、创新点
3. 描述系统架构、模块组成、数据流程
4. 重点突出软件的技术先进性和实用价值
5. 说明所使用的关键技术、算法、框架
6. 在必要的地方使用Mermaid绘制流程图，说明总体和局部代码运行原理
7. 描述用户界面和交互流程（如果是图形化软件）
8. 说明系统的性能、安全性、可扩展性等特点
9. 文档字数不少于6000字
10. 使用自然语言段落描述，避免过多的列表和标题
11. 内容要充实，避免空洞和重复
12. 按照成品项目的方式进行描述，不要说只是 demo 或者未完善；
";

pub const DOC_CONTINUATION_PROMPT: &str = "继续扩展文档内容，补充更多细节。重点关注：
1. 技术实现细节
2. 系统优化措施
3. 安全性设计
4. 扩展性考虑
5. 实际应用场景
请确保行文流畅，与前文自然衔接。以自然语言段落形式输出，避免分点。";

pub fn planning_user_prompt(title: &str, software_type: SoftwareType) -> String {
    format!(
        "项目标题是：\"{title}\"
软件类型是：{}

请为这个项目进行详细规划。",
        software_type.full_label()
    )
}

pub fn code_user_prompt(title: &str, software_type: SoftwareType, planning: &str) -> String {
    let tech_requirements = match software_type {
        SoftwareType::Gui => "技术要求：
- 使用 Next.js 框架, yarn 包管理
- 实现美观的用户界面
- 添加适当的交互动画
- 使用虚拟数据作为演示
- 实现响应式布局
- 为了合理的展示前端 demo 并进行 UI 展示，前端需要你自己生成并填充一些数据",
        SoftwareType::Backend => "技术要求：
- 实现完整的后端服务和算法逻辑
- 包含数据处理和模型训练代码
- 添加必要的测试用例
- 实现错误处理和日志记录",
    };
    format!(
        "项目标题：{title}
软件类型：{}

项目规划内容如下：
{planning}

{tech_requirements}

请根据以上要求编写完整代码。",
        software_type.label()
    )
}

pub fn doc_user_prompt(
    title: &str,
    software_type: SoftwareType,
    planning: &str,
    code: &str,
) -> String {
    format!(
        "项目标题：{title}
软件类型：{}

项目规划内容：
{planning}

项目代码：
{code}

请根据以上内容，编写一份详尽的软件说明文档。",
        software_type.label()
    )
}

fn continuation_messages(
    continuation_prompt: &str,
    user_prompt: String,
    continue_instruction: &str,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(continuation_prompt),
        ChatMessage::user(user_prompt),
        ChatMessage::assistant(CONTINUATION_PLACEHOLDER),
        ChatMessage::user(continue_instruction),
    ]
}

pub fn planning_messages(title: &str, software_type: SoftwareType) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(PLANNING_SYSTEM_PROMPT),
        ChatMessage::user(planning_user_prompt(title, software_type)),
    ]
}

pub fn planning_continuation(title: &str, software_type: SoftwareType) -> Vec<ChatMessage> {
    continuation_messages(
        PLANNING_CONTINUATION_PROMPT,
        planning_user_prompt(title, software_type),
        "请继续完善规划内容",
    )
}

pub fn code_messages(
    title: &str,
    software_type: SoftwareType,
    planning: &str,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(CODE_SYSTEM_PROMPT),
        ChatMessage::user(code_user_prompt(title, software_type, planning)),
    ]
}

pub fn code_continuation(
    title: &str,
    software_type: SoftwareType,
    planning: &str,
) -> Vec<ChatMessage> {
    continuation_messages(
        CODE_CONTINUATION_PROMPT,
        code_user_prompt(title, software_type, planning),
        "请继续完善代码",
    )
}

pub fn doc_messages(
    title: &str,
    software_type: SoftwareType,
    planning: &str,
    code: &str,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(DOC_SYSTEM_PROMPT),
        ChatMessage::user(doc_user_prompt(title, software_type, planning, code)),
    ]
}

pub fn doc_continuation(
    title: &str,
    software_type: SoftwareType,
    planning: &str,
    code: &str,
) -> Vec<ChatMessage> {
    continuation_messages(
        DOC_CONTINUATION_PROMPT,
        doc_user_prompt(title, software_type, planning, code),
        "请继续扩展文档内容,详细描述各部分内容",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::completion::Role;

    #[test]
    fn test_planning_user_prompt_interpolation() {
        let prompt = planning_user_prompt("基于LSTM的成绩分析系统", SoftwareType::Backend);
        assert!(prompt.contains("基于LSTM的成绩分析系统"));
        assert!(prompt.contains("后端软件（后端服务、算法软件、机器学习等）"));
    }

    #[test]
    fn test_code_user_prompt_carries_planning_and_type_requirements() {
        let gui = code_user_prompt("智能医疗影像分析系统", SoftwareType::Gui, "# 总体规划");
        assert!(gui.contains("# 总体规划"));
        assert!(gui.contains("Next.js"));
        assert!(!gui.contains("模型训练"));

        let backend = code_user_prompt("智能医疗影像分析系统", SoftwareType::Backend, "# 总体规划");
        assert!(backend.contains("模型训练"));
        assert!(!backend.contains("Next.js"));
    }

    #[test]
    fn test_doc_user_prompt_carries_planning_and_code() {
        let prompt = doc_user_prompt(
            "工业物联网数据分析平台",
            SoftwareType::Gui,
            "规划正文",
            "```ts\nconst a = 1;\n```",
        );
        assert!(prompt.contains("规划正文"));
        assert!(prompt.contains("const a = 1;"));
        assert!(prompt.contains("图形化软件"));
    }

    #[test]
    fn test_primary_messages_shape() {
        let messages = planning_messages("测试系统", SoftwareType::Gui);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn test_continuation_messages_shape() {
        for messages in [
            planning_continuation("测试系统", SoftwareType::Gui),
            code_continuation("测试系统", SoftwareType::Gui, "规划"),
            doc_continuation("测试系统", SoftwareType::Gui, "规划", "代码"),
        ] {
            assert_eq!(messages.len(), 4);
            assert_eq!(messages[0].role, Role::System);
            assert_eq!(messages[1].role, Role::User);
            assert_eq!(messages[2].role, Role::Assistant);
            assert_eq!(messages[2].content, CONTINUATION_PLACEHOLDER);
            assert_eq!(messages[3].role, Role::User);
        }
    }
}
