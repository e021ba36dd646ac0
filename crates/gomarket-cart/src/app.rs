//! # Application Bootstrap
//!
//! Builds the cart store once at startup and hands out its handle.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Store Startup                                │
//! │                                                                         │
//! │  1. Initialize Logging (init_tracing, optional) ──────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,gomarket=debug,sqlx=warn; override with RUST_LOG   │
//! │                                                                         │
//! │  2. Load Configuration (CartConfig::load) ────────────────────────────► │
//! │     • defaults ◄ cart.toml ◄ GOMARKET_* env                             │
//! │                                                                         │
//! │  3. Determine Database Path ──────────────────────────────────────────► │
//! │     • Linux: ~/.local/share/gomarket-storefront/storage.db             │
//! │     • ":memory:" for throwaway sessions                                │
//! │                                                                         │
//! │  4. Connect to Database ──────────────────────────────────────────────► │
//! │     • SQLite with WAL mode                                              │
//! │     • Run pending migrations                                            │
//! │                                                                         │
//! │  5. Start Cart Service ───────────────────────────────────────────────► │
//! │     • Hydrates from the saved snapshot in the background                │
//! │     • Returns CartHandle / CartProvider                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use gomarket_db::{Database, DbConfig, DbError, KeyValueStorage};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CartConfig;
use crate::error::CartResult;
use crate::provider::CartProvider;
use crate::service::{CartHandle, CartService};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,gomarket=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=gomarket_cart=trace` - Trace the cart crate only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// The running cart store and the database behind it.
#[derive(Debug, Clone)]
pub struct App {
    database: Database,
    cart: CartHandle,
    config: CartConfig,
}

impl App {
    /// Returns the cart handle.
    pub fn cart(&self) -> &CartHandle {
        &self.cart
    }

    /// Returns a provider for UI code that uses [`use_cart`](crate::use_cart).
    pub fn provider(&self) -> CartProvider {
        CartProvider::new(self.cart.clone())
    }

    /// Returns the database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Returns the configuration the store was started with.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Stops the cart service, then closes the database.
    pub async fn shutdown(&self) -> CartResult<()> {
        // already stopped is fine; the pool still needs closing
        let _ = self.cart.shutdown().await;
        self.database.close().await;
        info!("Cart store stopped");
        Ok(())
    }
}

/// Opens storage and starts the cart service.
///
/// ## Example
/// ```rust,ignore
/// gomarket_cart::init_tracing();
/// let app = gomarket_cart::boot(CartConfig::load(None)?).await?;
/// app.cart().add_to_cart(item).await?;
/// ```
pub async fn boot(config: CartConfig) -> CartResult<App> {
    config.validate()?;

    let db_path = config.resolve_database_path()?;
    info!(?db_path, "Database path determined");

    let db_config = if db_path == Path::new(":memory:") {
        DbConfig::in_memory()
    } else {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbError::Open(e.to_string()))?;
        }
        DbConfig::new(&db_path)
    };

    let database = Database::new(db_config).await?;
    info!("Database connected and migrations applied");

    let storage: Arc<dyn KeyValueStorage> = Arc::new(database.key_values());
    let cart = CartService::new(storage, config.clone()).start();

    Ok(App {
        database,
        cart,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CartError;
    use crate::service::HydrationStatus;
    use crate::testing::shirt;

    #[tokio::test]
    async fn test_boot_in_memory() {
        init_tracing();
        let app = boot(CartConfig::in_memory()).await.unwrap();

        assert_eq!(
            app.cart().wait_until_hydrated().await.unwrap(),
            HydrationStatus::Empty
        );
        assert!(app.database().health_check().await);

        let products = app.cart().add_to_cart(shirt("1")).await.unwrap();
        assert_eq!(products.len(), 1);

        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cart_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = CartConfig {
            database_path: Some(dir.path().join("nested").join("storage.db")),
            ..CartConfig::default()
        };

        let app = boot(config.clone()).await.unwrap();
        app.cart().add_to_cart(shirt("1")).await.unwrap();
        app.cart().add_to_cart(shirt("2")).await.unwrap();
        app.cart().decrement("1").await.unwrap();
        app.shutdown().await.unwrap();

        let app = boot(config).await.unwrap();
        assert_eq!(
            app.cart().wait_until_hydrated().await.unwrap(),
            HydrationStatus::Restored { items: 1 }
        );
        assert_eq!(app.cart().products().get("2").unwrap().quantity, 1);
        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_boot_rejects_invalid_config() {
        let config = CartConfig {
            command_buffer: 0,
            ..CartConfig::in_memory()
        };

        assert!(matches!(boot(config).await, Err(CartError::Config(_))));
    }

    #[tokio::test]
    async fn test_provider_from_app() {
        let app = boot(CartConfig::in_memory()).await.unwrap();

        let quantity = app
            .provider()
            .scope(async {
                let cart = crate::use_cart()?;
                cart.add_to_cart(shirt("1")).await?;
                cart.add_to_cart(shirt("1")).await
            })
            .await
            .unwrap()
            .total_quantity();

        assert_eq!(quantity, 2);
        app.shutdown().await.unwrap();
    }
}
