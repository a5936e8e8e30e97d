use leptos::prelude::*;
use leptos_meta::{Meta, Title};

use crate::components::footer::Footer;
use crate::components::header::Header;

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <Title text="关于本站 - 易著AI" />
        <Meta
            name="description"
            content="关于易著AI：我们致力于用人工智能降低软件著作权申请的材料准备成本。"
        />

        <div class="min-h-screen flex flex-col bg-gray-50">
            <Header />
            <div class="flex-1 max-w-3xl mx-auto px-4 pt-32 pb-16">
                <h1 class="text-3xl font-bold text-gray-900 mb-6">"关于易著AI"</h1>
                <div class="space-y-4 text-gray-700 leading-relaxed">
                    <p>
                        "易著AI 致力于用人工智能降低软件著作权申请的材料准备成本。"
                        "传统的软著申请需要准备项目规划、源代码和说明文档，"
                        "整理这些材料往往要花费数天时间。"
                    </p>
                    <p>
                        "在易著AI，你只需要输入软件标题并选择软件类型，"
                        "AI 会依次生成项目规划、项目代码和说明文档，全程只需几分钟。"
                        "生成过程完全流式呈现，每个阶段的内容都实时可见。"
                    </p>
                    <p>
                        "生成的材料仅供参考，请在提交申请前按照实际情况审阅和修改。"
                    </p>
                </div>
            </div>
            <Footer />
        </div>
    }
}
