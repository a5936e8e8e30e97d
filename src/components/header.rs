use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="fixed top-4 left-1/2 -translate-x-1/2 z-50 w-11/12 max-w-5xl">
            <div class="bg-white shadow-lg rounded-full px-4 md:px-6 py-2 md:py-3 flex justify-between items-center">
                <a href="/" class="flex items-center">
                    <span class="font-bold text-base md:text-lg text-gray-900 hover:text-blue-600 transition-colors duration-200">
                        "易著AI"
                    </span>
                </a>
                <nav>
                    <ul class="flex space-x-4 md:space-x-8 items-center text-sm md:text-base">
                        <li>
                            <a href="/" class="hover:text-blue-600 transition-colors duration-200">
                                "首页介绍"
                            </a>
                        </li>
                        <li>
                            <a href="/generate" class="hover:text-blue-600 transition-colors duration-200">
                                "生成软著"
                            </a>
                        </li>
                        <li>
                            <a href="/about" class="hover:text-blue-600 transition-colors duration-200">
                                "关于本站"
                            </a>
                        </li>
                    </ul>
                </nav>
            </div>
        </header>
    }
}
