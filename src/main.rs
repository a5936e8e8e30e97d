#![recursion_limit = "512"]

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use axum::{
            body::Body as AxumBody,
            extract::State,
            http::Request,
            response::IntoResponse,
            routing::{get, post},
            Router,
        };
        use dotenv::dotenv;
        use env_logger::Env;
        use leptos::prelude::*;
        use leptos_axum::{generate_route_list, LeptosRoutes};
        use yizhu::app::*;
        use yizhu::handlers::generate::{
            generate_code, generate_doc, generate_planning, generate_title_handler,
            method_not_allowed,
        };
        use yizhu::state::AppState;

        #[tokio::main]
        async fn main() {
            dotenv().ok();
            env_logger::init_from_env(Env::default().default_filter_or("info"));

            let conf = get_configuration(None).unwrap();
            let addr = conf.leptos_options.site_addr;
            let leptos_options = conf.leptos_options;

            if std::env::var("OPENAI_API_KEY").is_err() {
                log::warn!("OPENAI_API_KEY is not set; generation routes will answer with a configuration error");
            }

            // Generate the list of routes in your Leptos App
            let routes = generate_route_list(App);

            let app_state = AppState {
                leptos_options: leptos_options.clone(),
            };

            let api_routes = Router::new()
                .route(
                    "/api/generate-title",
                    post(generate_title_handler).fallback(method_not_allowed),
                )
                .route(
                    "/api/generate-planning",
                    post(generate_planning).fallback(method_not_allowed),
                )
                .route(
                    "/api/generate-code",
                    post(generate_code).fallback(method_not_allowed),
                )
                .route(
                    "/api/generate-doc",
                    post(generate_doc).fallback(method_not_allowed),
                );

            let app = Router::new()
                .merge(api_routes)
                .leptos_routes_with_handler(routes, get(|State(app_state): State<AppState>, request: Request<AxumBody>| async move {
                    let handler = leptos_axum::render_app_to_stream_with_context(
                        move || {
                            provide_context(app_state.clone());
                        },
                        move || shell(leptos_options.clone())
                    );
                    handler(request).await.into_response()
                }))
                .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
                .with_state(app_state);

            log::info!("Starting server at {addr}");

            let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
            log::info!("listening on http://{}", &addr);
            axum::serve(listener, app.into_make_service()).await.unwrap();
        }
    } else {
        pub fn main() {
            // no client-side main function
            // unless we want this to work with e.g., Trunk for a purely client-side app
            // see lib.rs for hydration function instead
        }
    }
}
