pub mod auth;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::auth::identity::{RestIdentityProvider, RestProfileStore};
use crate::auth::{AuthService, SessionStore};
use crate::core::cache::RateCache;
use crate::core::config::AppConfig;
use crate::core::submission::EntryDraft;
use crate::providers::ExchangeRateApiProvider;
use crate::store::RecordStore;
use crate::store::disk::FjallRateCache;
use crate::store::memory::MemoryRateCache;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A parsed application command, ready to run against a loaded config.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Dashboard {
        currency: Option<String>,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
        page: usize,
        page_size: Option<usize>,
    },
    Add {
        name: Option<String>,
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
    Currencies {
        base: Option<String>,
        search: Option<String>,
    },
    Signup {
        user_name: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    Clear {
        yes: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency exchange tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_dir = config.data_path()?;
    let store = RecordStore::open(&data_dir);
    let sessions = SessionStore::open(&data_dir);

    // Persistent rate cache when it opens, in-memory fallback otherwise.
    let rate_cache: Arc<dyn RateCache> = match FjallRateCache::open(&data_dir.join("cache")) {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            debug!("Falling back to in-memory rate cache: {e}");
            Arc::new(MemoryRateCache::new())
        }
    };
    let ttl = Duration::from_secs(config.rate_ttl_minutes * 60);
    let provider = ExchangeRateApiProvider::new(
        &config.provider.base_url,
        &config.provider.api_key,
        rate_cache,
        Some(ttl),
    );

    match command {
        AppCommand::Dashboard {
            currency,
            from_date,
            to_date,
            page,
            page_size,
        } => {
            require_session(&config, &sessions)?;
            let records = store.load()?;
            let options = cli::dashboard::DashboardOptions {
                currency,
                from_date,
                to_date,
                page,
                page_size: page_size.unwrap_or(config.page_size),
            };
            cli::dashboard::run(&records, &options)
        }
        AppCommand::Add {
            name,
            amount,
            from,
            to,
        } => {
            require_session(&config, &sessions)?;
            let draft = EntryDraft {
                name,
                amount,
                from_currency: from.or_else(|| Some(config.defaults.from_currency.clone())),
                to_currency: to.or_else(|| Some(config.defaults.to_currency.clone())),
            };
            cli::add::run(&store, &provider, &draft).await
        }
        AppCommand::Currencies { base, search } => {
            let base = base.unwrap_or_else(|| config.defaults.from_currency.clone());
            cli::currencies::run(&provider, &base, search.as_deref()).await
        }
        AppCommand::Signup {
            user_name,
            email,
            password,
        } => {
            let auth = auth_service(&config, sessions)?;
            cli::auth::run_signup(&auth, &user_name, &email, &password).await
        }
        AppCommand::Login { email, password } => {
            let auth = auth_service(&config, sessions)?;
            cli::auth::run_login(&auth, &email, &password).await
        }
        AppCommand::Logout => {
            let auth = auth_service(&config, sessions)?;
            cli::auth::run_logout(&auth)
        }
        AppCommand::Clear { yes } => {
            require_session(&config, &sessions)?;
            cli::dashboard::run_clear(&store, yes)
        }
    }
}

/// The original redirects unauthenticated visitors to the auth screen;
/// here record commands refuse to run without a session. Configs without
/// an identity section run local-only and skip the check.
fn require_session(config: &AppConfig, sessions: &SessionStore) -> Result<()> {
    if config.identity.is_some() && sessions.load().is_none() {
        bail!("Not signed in. Run `fxlog login` first.");
    }
    Ok(())
}

fn auth_service(config: &AppConfig, sessions: SessionStore) -> Result<AuthService> {
    let Some(identity) = config.identity.as_ref() else {
        bail!("No identity service configured. Add an `identity` section to the config file.");
    };
    Ok(AuthService::new(
        Box::new(RestIdentityProvider::new(&identity.base_url, &identity.api_key)),
        Box::new(RestProfileStore::new(&identity.database_url)),
        sessions,
    ))
}
