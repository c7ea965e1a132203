use crate::{
    api,
    auth::{AuthConfig, AuthState, CredentialStore, TOKEN_TTL_SETTING},
    catalog::DomainDb,
    cli::telemetry,
    config::Settings,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info};

/// Port used when neither the command line nor the settings file names one.
pub const DEFAULT_PORT: u16 = 8080;

/// Settings key holding the listen port.
pub const PORT_SETTING: &str = "port";

#[derive(Debug)]
pub struct Args {
    pub port: Option<u16>,
    pub config_dir: PathBuf,
    pub env: String,
    pub resources_dir: PathBuf,
    pub jwt_secret: Option<SecretString>,
}

/// Resolve the listen port: command line, then settings, then the default.
///
/// # Errors
/// Returns an error if the settings file holds a port that is not a `u16`.
pub fn resolve_port(cli_port: Option<u16>, settings: &Settings) -> Result<u16> {
    if let Some(port) = cli_port {
        return Ok(port);
    }
    settings.get(PORT_SETTING).map_or(Ok(DEFAULT_PORT), |port| {
        port.parse::<u16>()
            .with_context(|| format!("Invalid port in settings: {port}"))
    })
}

/// Build the auth configuration from settings and an optional secret override.
#[must_use]
pub fn auth_config(settings: &Settings, jwt_secret: Option<SecretString>) -> AuthConfig {
    let mut config = AuthConfig::new();
    if let Some(ttl) = settings.get(TOKEN_TTL_SETTING) {
        config = config.with_token_ttl_seconds(ttl);
    }
    if let Some(secret) = jwt_secret {
        debug!("using signing secret from the environment");
        config = config.with_signing_secret(secret);
    }
    config
}

/// Load settings and catalog, then serve until shutdown.
///
/// # Errors
/// Returns an error if settings or catalog cannot be loaded, or the server fails.
pub async fn execute(args: Args) -> Result<()> {
    let settings = Settings::load(&args.config_dir, &args.env)?;
    let port = resolve_port(args.port, &settings)?;

    let auth = AuthState::new(
        auth_config(&settings, args.jwt_secret),
        CredentialStore::with_seed_users(),
    );

    let catalog = DomainDb::load(&args.resources_dir).with_context(|| {
        format!(
            "Failed to load catalog from {}",
            args.resources_dir.display()
        )
    })?;

    info!(
        env = %args.env,
        users = auth.credentials().len(),
        product_groups = catalog.product_groups().len(),
        "starting simpleserver"
    );

    let result = api::new(port, Arc::new(auth), Arc::new(catalog)).await;

    telemetry::shutdown_tracer();

    result
}
