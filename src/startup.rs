use std::{io, net, time};

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::rate_limiter::RateLimiter;
use crate::routes::{health_check, subscribe};
use crate::subscription_registry::SubscriptionRegistry;
use crate::sweeper::run_sweeper_until_stopped;

/// Application
pub struct Application {
    server: Server,
    port: u16,
    rate_limiter: web::Data<RateLimiter>,
    sweep_interval: time::Duration,
}

impl Application {
    /// Build an application based on settings
    pub fn build(config: Settings) -> anyhow::Result<Self> {
        // Validate CORS origins before anything starts listening
        let allowed_origins = config.cors.origins()?;

        // Create the state shared by all workers
        let rate_limiter = web::Data::new(config.rate_limit.limiter());
        let registry = web::Data::new(SubscriptionRegistry::new());
        tracing::info!(
            window_secs = rate_limiter.window().as_secs(),
            max_requests = rate_limiter.max_requests(),
            "Rate limiter configured"
        );

        // Run the HTTP server and return its data
        let listener = net::TcpListener::bind(format!(
            "{}:{}",
            config.application.app_host, config.application.app_port
        ))?;
        let port = listener.local_addr()?.port();
        let server = run_server(listener, rate_limiter.clone(), registry, allowed_origins)?;
        Ok(Self {
            server,
            port,
            rate_limiter,
            sweep_interval: config.rate_limit.sweep_interval(),
        })
    }

    /// Get application port
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Run application until it is stopped
    #[allow(clippy::redundant_pub_crate)]
    pub async fn run_until_stopped(self) -> io::Result<()> {
        let Self {
            server,
            rate_limiter,
            sweep_interval,
            ..
        } = self;

        // The sweeper never completes, so the server decides when we are done
        tokio::select! {
            result = server => result,
            () = run_sweeper_until_stopped(rate_limiter, sweep_interval) => Ok(()),
        }
    }
}

/// Build the CORS middleware for the allowed origins
fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

/// Run the HTTP server
pub fn run_server(
    listener: net::TcpListener,
    rate_limiter: web::Data<RateLimiter>,
    registry: web::Data<SubscriptionRegistry>,
    allowed_origins: Vec<String>,
) -> io::Result<Server> {
    // Start the HTTP server
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origins))
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(health_check))
            .route("/subscriptions", web::post().to(subscribe))
            .app_data(rate_limiter.clone())
            .app_data(registry.clone())
    })
    .listen(listener)?
    .run())
}
