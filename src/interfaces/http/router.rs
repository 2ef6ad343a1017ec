//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, EmptyData};
use super::middleware::{auth_middleware, AuthState};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{self, http_metrics_middleware, MetricsState};
use super::modules::{auth, members, presence, reservations, venues};
use super::state::ApiState;
use crate::application::SharedEventBus;
use crate::interfaces::ws::presence_ws_handler;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        auth::get_current_user,
        venues::list_venues,
        venues::get_venue,
        venues::create_venue,
        venues::list_tables,
        venues::create_table,
        venues::get_board,
        venues::list_venue_reservations,
        reservations::create_reservation,
        reservations::list_my_reservations,
        reservations::get_reservation,
        presence::begin_viewing,
        presence::list_viewers,
        presence::end_viewing,
        members::get_member,
        members::create_member,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            venues::VenueDto,
            venues::CreateVenueRequest,
            venues::TableDto,
            venues::CreateTableRequest,
            venues::BoardDto,
            venues::BoardRowDto,
            venues::BoardCellDto,
            venues::VenueBookingDto,
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
            presence::PresenceRequest,
            presence::PresenceHandleDto,
            presence::ViewerDto,
            presence::ViewerListDto,
            members::MemberDto,
            members::CreateMemberRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Registration, login (JWT) and profile"),
        (name = "Venues", description = "Venues, tables and the per-date slot board"),
        (name = "Reservations", description = "Booking a table slot"),
        (name = "Presence", description = "Who else is booking a slot right now"),
        (name = "Members", description = "Member lookup for autofill"),
    ),
    info(
        title = "Tablerez Reservation API",
        version = "1.0.0",
        description = "Table reservations with conflict-safe booking and live slot presence",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// What the router needs beyond the handler state.
pub struct RouterDeps {
    pub api: ApiState,
    pub db: DatabaseConnection,
    pub event_bus: SharedEventBus,
    pub prometheus: PrometheusHandle,
    /// Empty allows any origin
    pub cors_origins: Vec<String>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}

pub fn create_api_router(deps: RouterDeps) -> Router {
    let RouterDeps {
        api,
        db,
        event_bus,
        prometheus,
        cors_origins,
    } = deps;

    let auth_state = AuthState {
        jwt_config: api.jwt_config.clone(),
    };
    let require_auth = || middleware::from_fn_with_state(auth_state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .merge(
            Router::new()
                .route("/me", get(auth::get_current_user))
                .layer(require_auth()),
        )
        .with_state(api.clone());

    let venue_routes = Router::new()
        .route("/", get(venues::list_venues).post(venues::create_venue))
        .route("/{venue_id}", get(venues::get_venue))
        .route(
            "/{venue_id}/tables",
            get(venues::list_tables).post(venues::create_table),
        )
        .route("/{venue_id}/board", get(venues::get_board))
        .route(
            "/{venue_id}/reservations",
            get(venues::list_venue_reservations),
        )
        .layer(require_auth())
        .with_state(api.clone());

    let reservation_routes = Router::new()
        .route("/", post(reservations::create_reservation))
        .route("/mine", get(reservations::list_my_reservations))
        .route("/{reservation_id}", get(reservations::get_reservation))
        .layer(require_auth())
        .with_state(api.clone());

    // The WebSocket authenticates from its query string
    let presence_routes = Router::new()
        .route(
            "/",
            post(presence::begin_viewing).get(presence::list_viewers),
        )
        .route("/{presence_id}", delete(presence::end_viewing))
        .layer(require_auth())
        .merge(Router::new().route("/ws", get(presence_ws_handler)))
        .with_state(api.clone());

    let member_routes = Router::new()
        .route("/", post(members::create_member))
        .route("/{member_number}", get(members::get_member))
        .layer(require_auth())
        .with_state(api);

    let health_state = HealthState {
        db,
        event_bus,
        started_at: Arc::new(Instant::now()),
    };
    let ops_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state)
        .merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(MetricsState { handle: prometheus }),
        );

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(ops_routes)
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/venues", venue_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/presence", presence_routes)
        .nest("/api/v1/members", member_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors_layer(&cors_origins))
        .layer(TraceLayer::new_for_http())
}
