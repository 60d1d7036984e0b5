//! Backend entry-point: loads settings, wires adapters into the HTTP server.

mod server;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use mockable::DefaultClock;
use opaque_id::OpaqueIdCodec;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use record_service::domain::{
    MedicalRecordCommandService, MedicalRecordQueryService, SignInService,
};
use record_service::inbound::http::state::HttpState;
use record_service::outbound::identity::{IdentityConfig, JwtIdentityResolver, KeySetLocation};
use record_service::outbound::persistence::{
    DbPool, DieselMedicalRecordStore, DieselUserStore, PoolConfig,
};
use record_service::settings::{ServiceSettings, SettingsError};

use server::{ServerConfig, create_server};

fn settings_error(err: SettingsError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
}

fn bind_addr(settings: &ServiceSettings) -> std::io::Result<SocketAddr> {
    let host: IpAddr = settings.bind_host().parse().map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind host {}: {err}", settings.bind_host()),
        )
    })?;
    Ok(SocketAddr::new(host, settings.port))
}

fn identity_config(settings: &ServiceSettings) -> std::io::Result<IdentityConfig> {
    let audience = settings.identity_audience().map_err(settings_error)?;
    Ok(IdentityConfig::new(audience)
        .with_key_set(KeySetLocation::Discovery(
            settings.identity_discovery_url().to_owned(),
        ))
        .with_cache_ttl(settings.jwks_cache_ttl()))
}

async fn build_http_state(settings: &ServiceSettings) -> std::io::Result<HttpState> {
    let codec = OpaqueIdCodec::new(
        settings.opaque_id_salt().map_err(settings_error)?,
        settings.opaque_id_min_length,
    )
    .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

    let pool_config = PoolConfig::new(settings.database_url().map_err(settings_error)?)
        .with_query_timeout(settings.query_timeout());
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let clock = Arc::new(DefaultClock);
    let records = Arc::new(DieselMedicalRecordStore::new(pool.clone()));
    let users = Arc::new(DieselUserStore::new(pool));

    let identity = JwtIdentityResolver::new(identity_config(settings)?)
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    Ok(HttpState {
        identity: Arc::new(identity),
        sign_in: Arc::new(SignInService::new(users, clock.clone())),
        records: Arc::new(MedicalRecordCommandService::new(records.clone(), clock)),
        records_query: Arc::new(
            MedicalRecordQueryService::new(records).with_page_size(settings.page_size()),
        ),
        ids: Arc::new(codec),
    })
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::from_process().map_err(settings_error)?;
    settings.validate().map_err(settings_error)?;

    let addr = bind_addr(&settings)?;
    let http_state = build_http_state(&settings).await?;
    let config = ServerConfig::new(addr, http_state).with_shutdown_grace(settings.shutdown_grace());

    info!(%addr, "starting medical record service");
    create_server(config)?.await
}
