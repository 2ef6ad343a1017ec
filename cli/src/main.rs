//! tablerez - CLI server
//!
//! Headless reservation service for a systemd unit, a container or a
//! terminal.
//!
//! ```sh
//! # Default config (~/.config/tablerez/config.toml)
//! tablerez-service
//!
//! # Custom config and port
//! tablerez-service --config /etc/tablerez/config.toml --port 8080
//!
//! # Validate config without starting
//! tablerez-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use tablerez::config::AppConfig;
use tablerez::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "tablerez-service",
    version,
    about = "Table reservation service with live slot presence",
    long_about = "tablerez - REST + WebSocket server for venue table reservations.\n\n\
                  Default config: ~/.config/tablerez/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "TABLEREZ_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the database URL (e.g. sqlite://./tablerez.db?mode=rwc).
    #[arg(long, env = "TABLEREZ_DATABASE_URL")]
    database_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(tablerez::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) if cli.check => {
            eprintln!("❌ {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if let Some(host) = cli.host {
        info!("CLI override: host = {}", host);
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(url) = cli.database_url {
        info!("CLI override: database url");
        config.database.url = Some(url);
    }

    if cli.check {
        let email = config.notifications.email.sendgrid_api_key.is_some();
        let sms = config.notifications.sms.account_sid.is_some()
            && config.notifications.sms.auth_token.is_some()
            && config.notifications.sms.from_number.is_some();
        println!("✅ Configuration is valid");
        println!("   Config file  : {}", config_path.display());
        println!("   Address      : {}:{}", config.server.host, config.server.port);
        println!("   Database     : {}", config.database.connection_url());
        println!("   Log level    : {}", config.logging.level);
        println!(
            "   Presence     : ttl {}s, refresh {}s, poll {}s",
            config.booking.presence_ttl_secs,
            config.booking.presence_refresh_secs,
            config.booking.presence_poll_secs
        );
        println!("   Email (SendGrid) configured : {}", email);
        println!("   SMS (Twilio) configured     : {}", sms);
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
