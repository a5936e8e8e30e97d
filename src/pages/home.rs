use leptos::prelude::*;
use leptos_icons::Icon;
use leptos_meta::{Meta, Title};

use crate::components::footer::Footer;
use crate::components::header::Header;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <Title text="易著AI - 智能软著生成工具 | AI一键生成软件著作权文档" />
        <Meta
            name="description"
            content="易著AI是一款智能软著生成工具，输入软件标题并选择类型，AI自动生成项目规划、项目代码和软著说明文档。"
        />
        <Meta name="keywords" content="软著生成,软件著作权,AI生成软著,软著文档,软著申请" />

        <div class="min-h-screen flex flex-col bg-gray-50">
            <Header />
            <div class="flex-1 flex flex-col justify-center items-center text-center px-4 pt-32 pb-16">
                <h1 class="text-4xl md:text-5xl font-bold text-gray-900 mb-4">
                    "AI 一键生成软著文档"
                </h1>
                <p class="text-lg text-gray-600 mb-8 max-w-2xl">
                    "输入软件标题，选择软件类型，几分钟内获得项目规划、项目代码与说明文档"
                </p>
                <a
                    href="/generate"
                    class="bg-blue-600 hover:bg-blue-700 text-white font-bold py-3 px-8 rounded-full transition-colors"
                >
                    "开始生成"
                </a>

                <div class="grid grid-cols-1 md:grid-cols-3 gap-6 mt-16 max-w-4xl w-full">
                    <div class="bg-white rounded-lg border border-gray-200 p-6 text-left">
                        <Icon icon=icondata_bs::BsStars width="28" height="28" />
                        <h3 class="font-semibold text-gray-900 mt-3 mb-1">"智能标题"</h3>
                        <p class="text-sm text-gray-600">
                            "描述你的软件，AI 生成符合规范的软著标题"
                        </p>
                    </div>
                    <div class="bg-white rounded-lg border border-gray-200 p-6 text-left">
                        <Icon icon=icondata_bs::BsLightningCharge width="28" height="28" />
                        <h3 class="font-semibold text-gray-900 mt-3 mb-1">"流式生成"</h3>
                        <p class="text-sm text-gray-600">
                            "规划、代码、文档三个阶段依次生成，内容实时呈现"
                        </p>
                    </div>
                    <div class="bg-white rounded-lg border border-gray-200 p-6 text-left">
                        <Icon icon=icondata_bs::BsFileEarmarkText width="28" height="28" />
                        <h3 class="font-semibold text-gray-900 mt-3 mb-1">"完整材料"</h3>
                        <p class="text-sm text-gray-600">
                            "产出符合软著申请标准的完整项目材料"
                        </p>
                    </div>
                </div>
            </div>
            <Footer />
        </div>
    }
}
