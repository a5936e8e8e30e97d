use leptos::prelude::*;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="relative overflow-hidden">
            <div class="max-w-7xl mx-auto px-4 md:px-8 py-8">
                <div class="text-center text-gray-500 text-sm">
                    "© 2025 易著AI. All rights reserved."
                </div>
            </div>
        </footer>
    }
}
