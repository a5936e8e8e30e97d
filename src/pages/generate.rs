use leptos::{prelude::*, task::spawn_local};
use leptos_icons::Icon;
use leptos_meta::{Meta, Title};
use log::error;
use wasm_bindgen_futures::JsFuture;

use crate::components::generation::{post_json, run_generation, GenerationRun, StagePanel};
use crate::components::toast::Toast;
use crate::types::{title_error, SoftwareType, StageKind, TitleRequest};

const EXAMPLE_TITLES: [&str; 5] = [
    "基于LSTM的成绩分析系统",
    "基于大数据的财务决策系统",
    "页岩孔隙流体力学模拟系统",
    "智能医疗影像分析系统",
    "工业物联网数据分析平台",
];

#[component]
pub fn GeneratePage() -> impl IntoView {
    let (current_step, set_current_step) = signal(0usize);
    let (title, set_title) = signal(String::new());
    let (title_message, set_title_message) = signal::<Option<&'static str>>(None);
    let (example_index, set_example_index) = signal(0usize);
    let (selected_type, set_selected_type) = signal::<Option<SoftwareType>>(None);

    let (dialog_open, set_dialog_open) = signal(false);
    let (ai_prompt, set_ai_prompt) = signal(String::new());
    let (is_title_generating, set_is_title_generating) = signal(false);
    let (generate_error, set_generate_error) = signal(String::new());
    let (error_detail, set_error_detail) = signal::<Option<String>>(None);
    let (detail_open, set_detail_open) = signal(false);

    let (is_generating, set_is_generating) = signal(false);
    let run = GenerationRun::new();

    let (toast_visible, set_toast_visible) = signal(false);
    let (toast_message, set_toast_message) = signal(String::new());

    let show_toast = move |message: String| {
        set_toast_message.set(message);
        set_toast_visible.set(true);
        set_timeout(
            move || set_toast_visible.set(false),
            std::time::Duration::from_secs(5),
        );
    };

    // placeholder carousel; stops advancing once the user has typed
    Effect::new(move |_| {
        let _ = set_interval_with_handle(
            move || {
                if title.get_untracked().is_empty() {
                    set_example_index.update(|i| *i = (*i + 1) % EXAMPLE_TITLES.len());
                }
            },
            std::time::Duration::from_secs(3),
        );
    });

    let handle_title_input = move |ev| {
        let value = event_target_value(&ev).trim().to_string();
        set_title_message.set(title_error(&value));
        set_title.set(value);
    };

    let handle_generate_title = move || {
        let prompt = ai_prompt.get_untracked();
        if prompt.trim().is_empty() {
            set_generate_error.set("请输入软件描述".to_string());
            return;
        }

        set_is_title_generating.set(true);
        set_generate_error.set(String::new());
        set_error_detail.set(None);

        spawn_local(async move {
            let body = match serde_json::to_string(&TitleRequest { prompt }) {
                Ok(body) => body,
                Err(e) => {
                    error!("failed to encode title request: {e}");
                    set_generate_error.set("生成标题失败，请稍后重试".to_string());
                    set_is_title_generating.set(false);
                    return;
                }
            };

            match post_json("/api/generate-title", &body).await {
                Ok(response) => {
                    let status_ok = response.ok();
                    // keep the raw body around so a parse failure can show it
                    let text = match response.text() {
                        Ok(promise) => JsFuture::from(promise)
                            .await
                            .ok()
                            .and_then(|value| value.as_string())
                            .unwrap_or_default(),
                        Err(_) => String::new(),
                    };

                    match serde_json::from_str::<serde_json::Value>(&text) {
                        Ok(data) => {
                            if !status_ok {
                                let message =
                                    data["error"].as_str().unwrap_or("生成标题失败").to_string();
                                set_generate_error.set(message);
                            } else if let Some(generated) = data["title"].as_str() {
                                if !generated.is_empty() && title_error(generated).is_none() {
                                    set_title.set(generated.to_string());
                                    set_title_message.set(None);
                                    set_dialog_open.set(false);
                                    set_ai_prompt.set(String::new());
                                } else {
                                    set_generate_error
                                        .set("AI 生成的标题不符合要求，请重试".to_string());
                                }
                            } else {
                                set_generate_error.set("未能生成有效的标题".to_string());
                            }
                        }
                        Err(parse_error) => {
                            error!("failed to parse title response: {parse_error}");
                            set_error_detail.set(Some(text));
                            set_generate_error
                                .set("解析响应数据失败，点击详情查看具体错误".to_string());
                        }
                    }
                }
                Err(e) => {
                    error!("title request failed: {e:?}");
                    set_generate_error.set("生成标题失败，请稍后重试".to_string());
                }
            }
            set_is_title_generating.set(false);
        });
    };

    let can_advance = move || match current_step.get() {
        0 => !title.get().is_empty() && title_message.get().is_none(),
        1 => selected_type.get().is_some(),
        _ => false,
    };

    let handle_next = move |_| {
        if can_advance() {
            set_current_step.update(|step| *step += 1);
        }
    };

    let handle_back = move |_| {
        set_current_step.update(|step| *step = step.saturating_sub(1));
    };

    let handle_complete = move |_| {
        let Some(software_type) = selected_type.get_untracked() else {
            return;
        };
        let title_value = title.get_untracked();
        set_is_generating.set(true);
        spawn_local(async move {
            if let Err(message) = run_generation(run, title_value, software_type).await {
                error!("generation halted: {message}");
                show_toast(message);
            }
        });
    };

    view! {
        <Title text="生成软著文档 - 易著AI | 智能软著生成工具" />
        <Meta
            name="description"
            content="使用易著AI智能生成软件著作权文档，只需输入标题和选择软件类型，几分钟内即可获得符合规范的软著文档。支持图形化软件和后端软件类型。"
        />
        <Meta
            name="keywords"
            content="软著生成,软件著作权申请,AI生成软著,软著文档生成,软著申请工具,软著在线生成,软著自动生成"
        />

        <Show
            when=move || is_generating.get()
            fallback=move || {
                view! {
                    <div class="min-h-screen flex flex-col justify-center bg-gray-50">
                        <div class="max-w-2xl w-full mx-auto px-4 py-8">
                            <div class="bg-white border border-gray-200 rounded-2xl shadow-sm p-6 md:p-8">
                                {move || {
                                    (current_step.get() == 0)
                                        .then(|| {
                                            view! {
                                                <div>
                                                    <h2 class="text-2xl md:text-3xl font-bold text-gray-900 mb-1">
                                                        "你的软著题目是？"
                                                    </h2>
                                                    <p class="text-gray-500 mb-8">
                                                        "请输入一个简洁明了的软件名称，不超过24字"
                                                    </p>
                                                    <div class="relative">
                                                        <input
                                                            type="text"
                                                            class="w-full border border-gray-300 rounded-lg px-4 py-3 pr-12 focus:outline-none focus:ring-2 focus:ring-blue-200 focus:border-blue-400"
                                                            prop:value=move || title.get()
                                                            on:input=handle_title_input
                                                            placeholder=move || EXAMPLE_TITLES[example_index.get()]
                                                        />
                                                        <button
                                                            class="absolute right-2 top-1/2 -translate-y-1/2 p-2 text-blue-600 hover:bg-blue-50 rounded-full"
                                                            title="AI智能生成标题"
                                                            on:click=move |_| set_dialog_open.set(true)
                                                        >
                                                            <Icon icon=icondata_bs::BsStars width="20" height="20" />
                                                        </button>
                                                    </div>
                                                    {move || {
                                                        title_message
                                                            .get()
                                                            .map(|message| {
                                                                view! { <p class="text-sm text-red-600 mt-2">{message}</p> }
                                                            })
                                                    }}
                                                    <div class="mt-4 bg-blue-50 text-blue-700 text-sm rounded p-3">
                                                        "不知道如何起名？点击右侧魔法棒图标获取帮助"
                                                    </div>
                                                </div>
                                            }
                                        })
                                }}
                                {move || {
                                    (current_step.get() == 1)
                                        .then(|| {
                                            view! {
                                                <div>
                                                    <h2 class="text-2xl md:text-3xl font-bold text-gray-900 mb-1">
                                                        "选择软件类型"
                                                    </h2>
                                                    <p class="text-gray-500 mb-8">"请选择最符合您软件特点的类型"</p>
                                                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                                        {[SoftwareType::Gui, SoftwareType::Backend]
                                                            .into_iter()
                                                            .map(|option| {
                                                                let icon = match option {
                                                                    SoftwareType::Gui => icondata_bs::BsGrid,
                                                                    SoftwareType::Backend => icondata_bs::BsTerminal,
                                                                };
                                                                view! {
                                                                    <button
                                                                        class=move || {
                                                                            if selected_type.get() == Some(option) {
                                                                                "p-6 rounded-lg border border-blue-300 bg-blue-50 text-center transition-colors"
                                                                            } else {
                                                                                "p-6 rounded-lg border border-gray-200 bg-white hover:bg-blue-50 text-center transition-colors"
                                                                            }
                                                                        }
                                                                        on:click=move |_| set_selected_type.set(Some(option))
                                                                    >
                                                                        <div class="flex justify-center text-blue-600 mb-3">
                                                                            <Icon icon=icon width="40" height="40" />
                                                                        </div>
                                                                        <h3 class="font-semibold text-gray-900 mb-1">
                                                                            {option.label()}
                                                                        </h3>
                                                                        <p class="text-sm text-gray-500">{option.description()}</p>
                                                                    </button>
                                                                }
                                                            })
                                                            .collect_view()}
                                                    </div>
                                                </div>
                                            }
                                        })
                                }}
                                <div class="mt-8 pt-6 border-t border-gray-100 flex justify-between items-center">
                                    <div>
                                        {move || {
                                            (current_step.get() > 0)
                                                .then(|| {
                                                    view! {
                                                        <button
                                                            class="px-4 py-2 text-gray-600 hover:text-gray-900"
                                                            on:click=handle_back
                                                        >
                                                            "← 上一步"
                                                        </button>
                                                    }
                                                })
                                        }}
                                    </div>
                                    {move || {
                                        if current_step.get() == 1 {
                                            view! {
                                                <button
                                                    class="px-6 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg disabled:opacity-50"
                                                    prop:disabled=move || selected_type.get().is_none()
                                                    on:click=handle_complete
                                                >
                                                    "完成"
                                                </button>
                                            }
                                                .into_any()
                                        } else {
                                            view! {
                                                <button
                                                    class="px-6 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-lg disabled:opacity-50"
                                                    prop:disabled=move || !can_advance()
                                                    on:click=handle_next
                                                >
                                                    "下一步 →"
                                                </button>
                                            }
                                                .into_any()
                                        }
                                    }}
                                </div>
                            </div>
                        </div>
                    </div>
                }
            }
        >
            <div class="min-h-screen flex flex-col bg-gray-50 p-4 md:p-8 pt-16">
                <div class="max-w-6xl w-full mx-auto flex-1 flex flex-col justify-center">
                    <div class="bg-white border border-gray-200 rounded-2xl p-4 md:p-6 mb-6 text-center">
                        <h2 class="text-2xl md:text-3xl font-bold text-gray-900 mb-1">
                            {move || if run.is_complete() { "生成完成" } else { "正在生成中" }}
                        </h2>
                        <p class="text-gray-500">
                            {move || {
                                if run.is_complete() {
                                    "您可以查看生成的内容"
                                } else {
                                    "请耐心等待，这可能需要几分钟时间"
                                }
                            }}
                        </p>
                    </div>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4 md:gap-6">
                        <StagePanel kind=StageKind::Planning stage=run.planning />
                        <StagePanel kind=StageKind::Code stage=run.code />
                        <StagePanel kind=StageKind::Doc stage=run.doc />
                    </div>
                </div>
            </div>
        </Show>

        {move || {
            dialog_open
                .get()
                .then(|| {
                    view! {
                        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/40">
                            <div class="bg-white rounded-lg shadow-xl w-full max-w-lg mx-4 p-6">
                                <h3 class="text-lg font-semibold text-gray-900 mb-2">"AI智能生成标题"</h3>
                                <p class="text-gray-500 text-sm mb-4">
                                    "请描述您的软件功能、用途或特点，AI将为您生成合适的标题"
                                </p>
                                <textarea
                                    class="w-full border border-gray-300 rounded p-3 text-sm h-28 focus:outline-none focus:ring-2 focus:ring-blue-200"
                                    placeholder="例如：我想做一个教育相关的系统，主要用于课程管理和学生成绩分析..."
                                    prop:value=move || ai_prompt.get()
                                    on:input=move |ev| set_ai_prompt.set(event_target_value(&ev))
                                ></textarea>
                                {move || {
                                    let message = generate_error.get();
                                    (!message.is_empty())
                                        .then(|| {
                                            view! {
                                                <div class="mt-2 bg-red-50 text-red-700 text-sm rounded p-3 flex justify-between items-center">
                                                    <span>{message}</span>
                                                    {move || {
                                                        error_detail
                                                            .get()
                                                            .map(|_| {
                                                                view! {
                                                                    <button
                                                                        class="underline ml-2"
                                                                        on:click=move |_| set_detail_open.set(true)
                                                                    >
                                                                        "详情"
                                                                    </button>
                                                                }
                                                            })
                                                    }}
                                                </div>
                                            }
                                        })
                                }}
                                <div class="mt-2 bg-blue-50 text-blue-700 text-sm rounded p-3">
                                    "提示：描述越详细，生成的标题越贴合您的需求"
                                </div>
                                <div class="mt-4 flex justify-end space-x-2">
                                    <button
                                        class="px-4 py-2 text-gray-600 hover:text-gray-800"
                                        on:click=move |_| {
                                            set_dialog_open.set(false);
                                            set_generate_error.set(String::new());
                                        }
                                    >
                                        "取消"
                                    </button>
                                    <button
                                        class="px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded disabled:opacity-50"
                                        prop:disabled=move || {
                                            ai_prompt.get().is_empty() || is_title_generating.get()
                                        }
                                        on:click=move |_| handle_generate_title()
                                    >
                                        {move || {
                                            if is_title_generating.get() { "生成中..." } else { "生成标题" }
                                        }}
                                    </button>
                                </div>
                            </div>
                        </div>
                    }
                })
        }}

        {move || {
            detail_open
                .get()
                .then(|| {
                    view! {
                        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/40">
                            <div class="bg-white rounded-lg shadow-xl w-full max-w-2xl mx-4 p-6">
                                <h3 class="text-lg font-semibold text-gray-900 mb-4">"错误详情"</h3>
                                <pre class="bg-red-50 border border-red-100 rounded p-4 max-h-96 overflow-auto text-sm whitespace-pre-wrap break-all">
                                    {move || error_detail.get().unwrap_or_default()}
                                </pre>
                                <div class="mt-4 flex justify-end">
                                    <button
                                        class="px-4 py-2 text-gray-600 hover:text-gray-800"
                                        on:click=move |_| set_detail_open.set(false)
                                    >
                                        "关闭"
                                    </button>
                                </div>
                            </div>
                        </div>
                    }
                })
        }}

        <Toast
            message=toast_message
            visible=toast_visible
            on_close=Callback::new(move |_| set_toast_visible.set(false))
        />
    }
}
