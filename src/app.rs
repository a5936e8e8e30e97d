use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Meta, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    path, StaticSegment,
};

use crate::pages::about::AboutPage;
use crate::pages::generate::GeneratePage;
use crate::pages::home::HomePage;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="zh-CN">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        // injects a stylesheet into the document <head>
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/yizhu.css" />
        <Title text="易著AI - 智能软著生成工具" />
        <Meta
            name="description"
            content="易著AI使用人工智能生成软件著作权申请材料：项目规划、项目代码与说明文档一键生成。"
        />
        <Router>
            <main>
                <Routes fallback=|| "页面不存在".into_view()>
                    <Route path=StaticSegment("") view=HomePage />
                    <Route path=path!("generate") view=GeneratePage />
                    <Route path=path!("about") view=AboutPage />
                </Routes>
            </main>
        </Router>
    }
}
