use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Headers, ReadableStreamDefaultReader, RequestInit, Response, TextDecodeOptions, TextDecoder,
};

use crate::components::markdown::MarkdownRenderer;
use crate::types::{
    CodeRequest, DocRequest, PlanningRequest, SoftwareType, StageKind, StageStatus,
};

/// Append-only output buffer for one stage. Every append is an observable
/// signal update, so the panel renders fragments as they arrive.
#[derive(Clone, Copy)]
pub struct StageState {
    pub status: RwSignal<StageStatus>,
    pub text: RwSignal<String>,
}

impl StageState {
    pub fn new() -> Self {
        StageState {
            status: RwSignal::new(StageStatus::Waiting),
            text: RwSignal::new(String::new()),
        }
    }

    fn begin(&self) {
        self.status.set(StageStatus::Generating);
    }

    fn append(&self, chunk: &str) {
        self.text.update(|text| text.push_str(chunk));
    }

    fn finish(&self) {
        self.status.set(StageStatus::Done);
    }
}

impl Default for StageState {
    fn default() -> Self {
        Self::new()
    }
}

/// The three stage buffers of one orchestration run.
#[derive(Clone, Copy)]
pub struct GenerationRun {
    pub planning: StageState,
    pub code: StageState,
    pub doc: StageState,
}

impl GenerationRun {
    pub fn new() -> Self {
        GenerationRun {
            planning: StageState::new(),
            code: StageState::new(),
            doc: StageState::new(),
        }
    }

    pub fn stage(&self, kind: StageKind) -> StageState {
        match kind {
            StageKind::Planning => self.planning,
            StageKind::Code => self.code,
            StageKind::Doc => self.doc,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.doc.status.get() == StageStatus::Done
    }
}

impl Default for GenerationRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the three stages strictly in order. Each request carries the full
/// locally accumulated text of the stages before it, never a possibly-stale
/// signal read. A failed stage halts the run; finished stages keep their text.
pub async fn run_generation(
    run: GenerationRun,
    title: String,
    software_type: SoftwareType,
) -> Result<(), String> {
    run.planning.begin();
    let body = serde_json::to_string(&PlanningRequest {
        title: title.clone(),
        software_type,
    })
    .map_err(|e| e.to_string())?;
    let planning =
        stream_stage("/api/generate-planning", &body, run.planning, "项目规划生成失败").await?;
    run.planning.finish();

    run.code.begin();
    let body = serde_json::to_string(&CodeRequest {
        title: title.clone(),
        software_type,
        planning: planning.clone(),
    })
    .map_err(|e| e.to_string())?;
    let code = stream_stage("/api/generate-code", &body, run.code, "代码生成失败").await?;
    run.code.finish();

    run.doc.begin();
    let body = serde_json::to_string(&DocRequest {
        title,
        software_type,
        planning,
        code,
    })
    .map_err(|e| e.to_string())?;
    stream_stage("/api/generate-doc", &body, run.doc, "文档生成失败").await?;
    run.doc.finish();

    Ok(())
}

async fn stream_stage(
    url: &str,
    body: &str,
    stage: StageState,
    failure_message: &str,
) -> Result<String, String> {
    let response = post_json(url, body)
        .await
        .map_err(|_| failure_message.to_string())?;
    if !response.ok() {
        return Err(failure_message.to_string());
    }

    let mut accumulated = String::new();
    read_text_stream(&response, |chunk| {
        accumulated.push_str(chunk);
        stage.append(chunk);
    })
    .await
    .map_err(|_| "无法读取响应流".to_string())?;

    Ok(accumulated)
}

pub async fn post_json(url: &str, body: &str) -> Result<Response, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(headers.as_ref());
    init.set_body(&JsValue::from_str(body));

    let response = JsFuture::from(window.fetch_with_str_and_init(url, &init)).await?;
    response.dyn_into::<Response>()
}

/// Cooperative chunk loop over the response body. Decoding is streaming so a
/// chunk boundary inside a multi-byte character carries over to the next read.
async fn read_text_stream(
    response: &Response,
    mut on_chunk: impl FnMut(&str),
) -> Result<(), JsValue> {
    let body = response
        .body()
        .ok_or_else(|| JsValue::from_str("response has no body"))?;
    let reader: ReadableStreamDefaultReader = body.get_reader().dyn_into()?;
    let decoder = TextDecoder::new()?;

    loop {
        let result = JsFuture::from(reader.read()).await?;
        let done = js_sys::Reflect::get(&result, &JsValue::from_str("done"))?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }
        let value = js_sys::Reflect::get(&result, &JsValue::from_str("value"))?;
        let mut bytes = js_sys::Uint8Array::new(&value).to_vec();
        let options = TextDecodeOptions::new();
        options.set_stream(true);
        let chunk = decoder.decode_with_u8_array_and_options(&mut bytes, &options)?;
        if !chunk.is_empty() {
            on_chunk(&chunk);
        }
    }

    let tail = decoder.decode()?;
    if !tail.is_empty() {
        on_chunk(&tail);
    }
    Ok(())
}

#[component]
pub fn StagePanel(kind: StageKind, stage: StageState) -> impl IntoView {
    let status = stage.status;
    let text = stage.text;

    view! {
        <div class="h-full max-h-[400px] flex flex-col bg-white border border-gray-200 rounded-lg overflow-hidden">
            <div class="flex items-center p-3 bg-gray-50 border-b border-gray-200">
                <span class="mr-2 text-sm font-semibold text-gray-900">{kind.label()}</span>
                {move || match status.get() {
                    StageStatus::Waiting => view! {
                        <span class="w-3 h-3 rounded-full bg-gray-300 inline-block"></span>
                    }.into_any(),
                    StageStatus::Generating => view! {
                        <span class="w-3 h-3 rounded-full border-2 border-blue-500 border-t-transparent animate-spin inline-block"></span>
                    }.into_any(),
                    StageStatus::Done => view! {
                        <span class="w-3 h-3 rounded-full bg-green-500 inline-block"></span>
                    }.into_any(),
                }}
            </div>
            <div class="flex-1 min-h-0 overflow-auto p-3 text-sm">
                {move || {
                    let content = text.get();
                    (!content.is_empty()).then(|| view! { <MarkdownRenderer content=content /> })
                }}
            </div>
        </div>
    }
}
