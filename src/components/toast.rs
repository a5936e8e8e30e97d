use leptos::prelude::*;

#[component]
pub fn Toast(
    message: ReadSignal<String>,
    visible: ReadSignal<bool>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let opacity_class = move || {
        if visible.get() {
            "opacity-100"
        } else {
            "opacity-0 pointer-events-none"
        }
    };

    view! {
        <div class=move || {
            format!(
                "{} fixed bottom-4 right-4 bg-white text-red-600 border border-red-200 px-4 py-2 rounded shadow-lg transition-opacity duration-300",
                opacity_class(),
            )
        }>
            {message}
            <button
                class="ml-2 text-gray-400 hover:text-gray-600"
                on:click=move |_| on_close.run(())
            >
                "×"
            </button>
        </div>
    }
}
