//! Reusable service runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: database and migrations,
//! default admin, repositories, event bus, booking services, the presence
//! sweeper, the REST/WebSocket listener, metrics and graceful shutdown.
//! Every collaborator is built here and passed down explicitly.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::notifications::{
    NotificationSender, SendGridEmailSender, TwilioSmsSender,
};
use crate::application::services::start_presence_sweeper;
use crate::application::{
    create_event_bus, AvailabilityService, NotificationDispatcher, PresenceTracker,
    ReservationService, SharedEventBus,
};
use crate::config::AppConfig;
use crate::domain::{RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::{init_database, run_migrations, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, ApiState, RouterDeps};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::{system_clock, SharedClock};

const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin if the users table is empty (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// The wired-up application core, independent of any listener.
#[derive(Clone)]
pub struct AppContext {
    pub repos: Arc<dyn RepositoryProvider>,
    pub event_bus: SharedEventBus,
    pub clock: SharedClock,
    pub api: ApiState,
}

impl AppContext {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: SharedClock,
        notifier: NotificationDispatcher,
        config: &AppConfig,
    ) -> Self {
        let event_bus = create_event_bus();

        let presence = PresenceTracker::new(
            repos.clone(),
            event_bus.clone(),
            clock.clone(),
            config.booking.presence_settings(),
        );
        let reservations = ReservationService::new(repos.clone(), event_bus.clone(), notifier);
        let availability = AvailabilityService::new(repos.clone(), clock.clone());

        let api = ApiState {
            repos: repos.clone(),
            availability,
            reservations,
            presence,
            jwt_config: config.security.jwt(),
            bcrypt_cost: config.security.bcrypt_cost,
        };

        Self {
            repos,
            event_bus,
            clock,
            api,
        }
    }
}

/// Email and SMS senders from `[notifications]`. Channels without
/// credentials stay registered and report themselves as not configured.
pub fn notification_dispatcher(config: &AppConfig) -> NotificationDispatcher {
    if !config.notifications.enabled {
        info!("Reservation notifications disabled");
        return NotificationDispatcher::disabled();
    }

    let client = reqwest::Client::builder()
        .timeout(NOTIFICATION_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client for notifications");
            reqwest::Client::new()
        });

    let email = config.notifications.email.sendgrid();
    let sms = config.notifications.sms.twilio();
    if email.api_key.is_none() {
        warn!("SENDGRID_API_KEY not set, email confirmations will not be sent");
    }
    if sms.account_sid.is_none() || sms.auth_token.is_none() || sms.from_number.is_none() {
        warn!("Twilio credentials incomplete, SMS confirmations will not be sent");
    }

    let senders: Vec<Arc<dyn NotificationSender>> = vec![
        Arc::new(SendGridEmailSender::new(client.clone(), email)),
        Arc::new(TwilioSmsSender::new(client, sms)),
    ];
    NotificationDispatcher::new(senders)
}

/// The global recorder can be installed once per process; later starts
/// reuse the same handle.
pub fn prometheus_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                warn!("A metrics recorder is already installed; /metrics will be empty");
            } else {
                info!("📊 Prometheus metrics recorder installed");
            }
            handle
        })
        .clone()
}

/// Handle to a running service.
///
/// ```rust,no_run
/// use tablerez::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub context: AppContext,
    pub config: AppConfig,
    /// Address actually bound (port 0 in config picks a free one)
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    background: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        info!("Starting tablerez reservation service...");

        let prometheus = prometheus_handle();

        let db_config = app_cfg.database.to_database_config();
        info!("Database: {}", db_config.url);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            run_migrations(&db).await?;
            info!("Migrations completed");
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        if opts.create_default_admin {
            create_default_admin(repos.as_ref(), &app_cfg).await;
        }

        let context = AppContext::new(
            repos.clone(),
            system_clock(),
            notification_dispatcher(&app_cfg),
            &app_cfg,
        );
        info!(
            ttl_secs = app_cfg.booking.presence_ttl_secs,
            refresh_secs = app_cfg.booking.presence_refresh_secs,
            "Presence tracking configured"
        );

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let mut background = vec![start_presence_sweeper(
            repos,
            context.clock.clone(),
            shutdown_signal.clone(),
            app_cfg.booking.presence_sweep_secs,
        )];
        background.push(start_metrics_upkeep(
            prometheus.clone(),
            shutdown_signal.clone(),
        ));

        let router = create_api_router(RouterDeps {
            api: context.api.clone(),
            db: db.clone(),
            event_bus: context.event_bus.clone(),
            prometheus,
            cors_origins: app_cfg.server.cors_origins.clone(),
        });

        let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Service started");

        Ok(Self {
            context,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
            background,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / Ctrl+C.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the listener and background tasks to stop after shutdown
    /// was triggered, bounded by the configured grace period.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");
        let grace = Duration::from_secs(self.shutdown.timeout_secs());

        let tasks = async {
            match self.api_task.await {
                Ok(()) => info!("REST API server stopped"),
                Err(e) => error!("REST API server task panicked: {}", e),
            }
            for task in self.background {
                if let Err(e) = task.await {
                    error!("Background task panicked: {}", e);
                }
            }
        };
        if tokio::time::timeout(grace, tasks).await.is_err() {
            warn!(grace_secs = grace.as_secs(), "Shutdown grace period elapsed");
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 tablerez shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("🛑 Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Histograms need periodic draining when the recorder is not installed
/// through the exporter's own listener.
fn start_metrics_upkeep(handle: PrometheusHandle, shutdown: ShutdownSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        let stop = shutdown.notified().wait();
        tokio::pin!(stop);
        loop {
            tokio::select! {
                _ = interval.tick() => handle.run_upkeep(),
                _ = &mut stop => break,
            }
        }
    })
}

/// Create the configured admin if no users exist yet.
pub async fn create_default_admin(repos: &dyn RepositoryProvider, app_cfg: &AppConfig) {
    let users = match repos.users().count().await {
        Ok(n) => n,
        Err(e) => {
            error!("Failed to count users: {}", e);
            return;
        }
    };
    if users > 0 {
        return;
    }

    info!("Creating default admin user...");
    let password_hash = match hash_password(&app_cfg.admin.password, app_cfg.security.bcrypt_cost)
    {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let admin = User::new(
        app_cfg.admin.username.clone(),
        app_cfg.admin.email.clone(),
        password_hash,
        UserRole::Admin,
    );
    match repos.users().create(admin).await {
        Ok(()) => {
            info!("Default admin created: {}", app_cfg.admin.email);
            info!("⚠️  Please change the admin password immediately!");
        }
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}

/// Initialize tracing from the config. `RUST_LOG` wins over
/// `[logging] level`. Call once, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialized: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.security.bcrypt_cost = 4;
        config
    }

    #[tokio::test]
    async fn default_admin_is_created_once() {
        let repos = InMemoryRepositoryProvider::new();
        let config = test_config();

        create_default_admin(&repos, &config).await;
        create_default_admin(&repos, &config).await;

        assert_eq!(repos.users().count().await.unwrap(), 1);
        let admin = repos
            .users()
            .find_by_login(&config.admin.username)
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_admin());
    }

    #[tokio::test]
    async fn disabled_notifications_build_an_empty_dispatcher() {
        let mut config = test_config();
        config.notifications.enabled = false;
        let dispatcher = notification_dispatcher(&config);
        let sample = crate::application::notifications::payload::sample();
        assert!(dispatcher.dispatch(&sample).await.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_channels_report_not_configured() {
        let dispatcher = notification_dispatcher(&test_config());
        let sample = crate::application::notifications::payload::sample();
        let reports = dispatcher.dispatch(&sample).await;
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| !r.outcome.is_sent()));
    }
}
