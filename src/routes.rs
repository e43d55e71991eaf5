use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::config;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let config = config();

    let protected_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(role_routes())
        .merge(menu_routes())
        .merge(dashboard_routes())
        .merge(log_routes())
        .merge(master_routes())
        .merge(bpd_routes())
        .merge(report_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/v1/auth/login", post(public::login))
        // Protected
        .merge(protected_routes)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&config.security.cors_origins))
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
        );

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

/// `*` allows any origin; otherwise only the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn auth_routes() -> Router<AppState> {
    use protected::auth;

    Router::new()
        .route("/v1/auth/profile", get(auth::profile))
        .route("/v1/auth/password", put(auth::change_password))
}

fn user_routes() -> Router<AppState> {
    use protected::user;

    Router::new()
        .route("/v1/users", get(user::list).post(user::create))
        .route("/v1/users/:id", get(user::get).put(user::update).delete(user::delete))
        .route("/v1/users/:id/reset-password", put(user::reset_password))
}

fn role_routes() -> Router<AppState> {
    use protected::role;

    Router::new()
        .route("/v1/roles", get(role::list).post(role::create))
        .route("/v1/roles/:id", get(role::get).put(role::update).delete(role::delete))
        .route("/v1/roles/:id/menus", get(role::menus).put(role::replace_menus))
}

fn menu_routes() -> Router<AppState> {
    use protected::menu;

    Router::new()
        .route("/v1/menus", get(menu::list).post(menu::create))
        .route("/v1/menus/navigation", get(menu::navigation))
        .route("/v1/menus/sort/:id/:direction", put(menu::sort))
        .route("/v1/menus/:id", get(menu::get).put(menu::update).delete(menu::delete))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/v1/dashboard", get(protected::dashboard::dashboard))
}

fn log_routes() -> Router<AppState> {
    use protected::log;

    Router::new()
        .route("/v1/logs/system", get(log::system))
        .route("/v1/logs/login", get(log::login))
}

fn master_routes() -> Router<AppState> {
    use protected::master;

    Router::new()
        .route("/v1/master/:entity", get(master::list).post(master::create))
        .route(
            "/v1/master/:entity/:id",
            get(master::get).put(master::update).delete(master::delete),
        )
}

fn bpd_routes() -> Router<AppState> {
    use protected::bpd;

    Router::new()
        .route("/v1/bpd", get(bpd::list).post(bpd::create))
        .route("/v1/bpd/selesai", get(bpd::list_selesai))
        .route("/v1/bpd/:id", get(bpd::get).put(bpd::update).delete(bpd::delete))
        .route("/v1/bpd/:id/histori", get(bpd::histori))
        .route("/v1/bpd/:id/:action", post(bpd::transition))
        // Cost, vehicle and document lines
        .route("/v1/bpd/:id/biaya", post(bpd::add_biaya))
        .route("/v1/bpd/:id/biaya/:biaya_id", put(bpd::update_biaya).delete(bpd::delete_biaya))
        .route("/v1/bpd/:id/kendaraan", post(bpd::add_kendaraan))
        .route(
            "/v1/bpd/:id/kendaraan/:kendaraan_id",
            put(bpd::update_kendaraan).delete(bpd::delete_kendaraan),
        )
        .route("/v1/bpd/:id/dokumen", post(bpd::add_dokumen))
        .route(
            "/v1/bpd/:id/dokumen/:dokumen_id",
            put(bpd::update_dokumen).delete(bpd::delete_dokumen),
        )
}

fn report_routes() -> Router<AppState> {
    use protected::report;

    Router::new()
        .route("/v1/report/:report", get(report::data))
        .route("/v1/report/:report/export", get(report::export))
}
