//! # Cart Service
//!
//! The cart store runtime: one task owns the authoritative [`Cart`] and
//! applies commands strictly one after another.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Service Task                               │
//! │                                                                         │
//! │  CartHandle (clone per screen)                                         │
//! │     │  add_to_cart / increment / decrement / clear                     │
//! │     │  ─── mpsc (bounded, command_buffer) ───►                          │
//! │     │                                                                   │
//! │     │                  ┌──────────────────────────────────────────┐    │
//! │     │                  │ 1. hydrate (once, before any command)    │    │
//! │     │                  │ 2. recv command                          │    │
//! │     │                  │ 3. apply to current Cart                 │    │
//! │     │                  │ 4. publish on watch  ──► subscribers     │    │
//! │     │                  │ 5. write snapshot to KeyValueStorage     │    │
//! │     │                  │ 6. reply on oneshot                      │    │
//! │     │                  └──────────────────────────────────────────┘    │
//! │     │                                   │                               │
//! │     ◄──────────── oneshot (Cart) ───────┘                               │
//! │                                                                         │
//! │  Only the task mutates the cart, so two quick add_to_cart calls from   │
//! │  different screens are both counted.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Hydration
//! ```text
//! get_item(storage_key)
//!   ├── None / blank ───────────────► HydrationStatus::Empty
//!   ├── Some(valid snapshot) ───────► HydrationStatus::Restored { items }
//!   └── read error / bad snapshot
//!         ├── FallbackToEmpty ──────► HydrationStatus::Failed, empty cart,
//!         │                           next mutation overwrites the slot
//!         └── Strict ───────────────► HydrationStatus::Failed, every
//!                                     mutation returns HydrationFailed
//! ```

use std::sync::Arc;

use gomarket_core::{Cart, CartChange, CartItem, CartTotals};
use gomarket_db::KeyValueStorage;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use crate::config::{CartConfig, HydratePolicy};
use crate::error::{CartError, CartResult};

// =============================================================================
// Hydration Status
// =============================================================================

/// Outcome of loading the saved cart at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationStatus {
    /// The service has not read storage yet.
    Pending,
    /// A saved cart was restored.
    Restored { items: usize },
    /// Nothing was saved; the cart starts empty.
    Empty,
    /// The saved cart could not be read or decoded.
    Failed { reason: String },
}

impl HydrationStatus {
    /// Returns true once hydration has finished, whatever the outcome.
    pub fn is_settled(&self) -> bool {
        !matches!(self, HydrationStatus::Pending)
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Reply channel carried by mutating commands.
pub type CartReply = oneshot::Sender<CartResult<Cart>>;

/// Commands that can be sent to the cart service.
#[derive(Debug)]
pub enum CartCommand {
    /// Add a product, or bump its quantity.
    AddToCart { item: CartItem, reply: CartReply },
    /// Quantity + 1 for an existing line.
    Increment { id: String, reply: CartReply },
    /// Quantity - 1, removing the line at zero.
    Decrement { id: String, reply: CartReply },
    /// Empty the cart and drop the saved snapshot.
    Clear { reply: CartReply },
    /// Stop the service after the commands already queued.
    Shutdown { done: oneshot::Sender<()> },
}

// =============================================================================
// Cart Handle
// =============================================================================

/// Handle for interacting with the cart service.
///
/// Cheap to clone; every clone talks to the same service task.
#[derive(Debug, Clone)]
pub struct CartHandle {
    cmd_tx: mpsc::Sender<CartCommand>,
    cart_rx: watch::Receiver<Cart>,
    hydration_rx: watch::Receiver<HydrationStatus>,
}

impl CartHandle {
    /// Returns the current cart.
    pub fn products(&self) -> Cart {
        self.cart_rx.borrow().clone()
    }

    /// Returns totals for the current cart.
    pub fn totals(&self) -> CartTotals {
        self.cart_rx.borrow().totals()
    }

    /// Subscribes to cart changes.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart_rx.clone()
    }

    /// Returns the current hydration status.
    pub fn hydration(&self) -> HydrationStatus {
        self.hydration_rx.borrow().clone()
    }

    /// Waits until the saved cart has been loaded (or given up on).
    pub async fn wait_until_hydrated(&self) -> CartResult<HydrationStatus> {
        let mut rx = self.hydration_rx.clone();
        let status = rx
            .wait_for(HydrationStatus::is_settled)
            .await
            .map_err(|_| CartError::ServiceClosed)?;
        Ok(status.clone())
    }

    /// Adds a product to the cart.
    ///
    /// A new id is appended with quantity 1, ignoring `item.quantity`. A
    /// known id gets its quantity bumped and keeps its original details.
    pub async fn add_to_cart(&self, item: CartItem) -> CartResult<Cart> {
        self.request(|reply| CartCommand::AddToCart { item, reply })
            .await
    }

    /// Increases the quantity of `id` by one.
    pub async fn increment(&self, id: impl Into<String>) -> CartResult<Cart> {
        let id = id.into();
        self.request(|reply| CartCommand::Increment { id, reply })
            .await
    }

    /// Decreases the quantity of `id` by one, removing it at zero.
    pub async fn decrement(&self, id: impl Into<String>) -> CartResult<Cart> {
        let id = id.into();
        self.request(|reply| CartCommand::Decrement { id, reply })
            .await
    }

    /// Empties the cart and removes the saved snapshot.
    pub async fn clear(&self) -> CartResult<Cart> {
        self.request(|reply| CartCommand::Clear { reply }).await
    }

    /// Shuts down the cart service.
    ///
    /// Returns once every command queued before this call has been applied
    /// and persisted.
    pub async fn shutdown(&self) -> CartResult<()> {
        let (done, done_rx) = oneshot::channel();
        self.cmd_tx
            .send(CartCommand::Shutdown { done })
            .await
            .map_err(|_| CartError::ServiceClosed)?;
        done_rx.await.map_err(|_| CartError::ServiceClosed)
    }

    /// Returns true while the service task is accepting commands.
    pub fn is_running(&self) -> bool {
        !self.cmd_tx.is_closed()
    }

    async fn request<F>(&self, command: F) -> CartResult<Cart>
    where
        F: FnOnce(CartReply) -> CartCommand,
    {
        let (reply, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(command(reply))
            .await
            .map_err(|_| CartError::ServiceClosed)?;
        reply_rx.await.map_err(|_| CartError::ServiceClosed)?
    }
}

// =============================================================================
// Cart Service
// =============================================================================

/// Owns the cart and its storage slot.
pub struct CartService {
    /// Where snapshots are written.
    storage: Arc<dyn KeyValueStorage>,
    /// Store configuration.
    config: CartConfig,
    /// Authoritative cart state.
    cart: Cart,
    /// Set when strict hydration failed; blocks every mutation.
    blocked: Option<String>,
    /// Cart change broadcaster.
    cart_tx: watch::Sender<Cart>,
    /// Hydration status broadcaster.
    hydration_tx: watch::Sender<HydrationStatus>,
}

impl CartService {
    /// Creates a new cart service over `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: CartConfig) -> Self {
        let (cart_tx, _) = watch::channel(Cart::new());
        let (hydration_tx, _) = watch::channel(HydrationStatus::Pending);

        CartService {
            storage,
            config,
            cart: Cart::new(),
            blocked: None,
            cart_tx,
            hydration_tx,
        }
    }

    /// Starts the service task and returns a handle.
    pub fn start(self) -> CartHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(self.config.command_buffer.max(1));

        let handle = CartHandle {
            cmd_tx,
            cart_rx: self.cart_tx.subscribe(),
            hydration_rx: self.hydration_tx.subscribe(),
        };

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        handle
    }

    /// Main service loop.
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<CartCommand>) {
        info!(
            storage_key = %self.config.storage_key,
            hydrate_policy = %self.config.hydrate_policy,
            write_on_noop = self.config.write_on_noop,
            "Cart service started"
        );

        self.hydrate().await;

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                CartCommand::AddToCart { item, reply } => {
                    debug!(id = %item.id, "add_to_cart");
                    let result = self.add_to_cart(item).await;
                    let _ = reply.send(result);
                }
                CartCommand::Increment { id, reply } => {
                    debug!(id = %id, "increment");
                    let result = self.mutate(|cart| cart.increment(&id)).await;
                    let _ = reply.send(result);
                }
                CartCommand::Decrement { id, reply } => {
                    debug!(id = %id, "decrement");
                    let result = self.mutate(|cart| cart.decrement(&id)).await;
                    let _ = reply.send(result);
                }
                CartCommand::Clear { reply } => {
                    debug!("clear");
                    let result = self.clear().await;
                    let _ = reply.send(result);
                }
                CartCommand::Shutdown { done } => {
                    info!("Cart service shutting down");
                    let _ = done.send(());
                    break;
                }
            }
        }
    }

    /// Loads the saved snapshot into the cart.
    async fn hydrate(&mut self) {
        let key = self.config.storage_key.clone();

        let loaded = self.storage.get_item(&key).await;
        let status = match loaded {
            Ok(None) => HydrationStatus::Empty,
            Ok(Some(snapshot)) if snapshot.trim().is_empty() => HydrationStatus::Empty,
            Ok(Some(snapshot)) => match Cart::from_snapshot(&snapshot) {
                Ok(cart) => {
                    let items = cart.len();
                    self.cart = cart;
                    self.publish();
                    HydrationStatus::Restored { items }
                }
                Err(e) => self.hydration_failed(e.to_string()),
            },
            Err(e) => self.hydration_failed(e.to_string()),
        };

        info!(storage_key = %key, status = ?status, "Cart hydrated");
        self.hydration_tx.send_replace(status);
    }

    fn hydration_failed(&mut self, reason: String) -> HydrationStatus {
        match self.config.hydrate_policy {
            HydratePolicy::FallbackToEmpty => {
                warn!(reason = %reason, "Saved cart unreadable, starting empty");
            }
            HydratePolicy::Strict => {
                error!(reason = %reason, "Saved cart unreadable, cart is read-only");
                self.blocked = Some(reason.clone());
            }
        }
        HydrationStatus::Failed { reason }
    }

    fn ensure_writable(&self) -> CartResult<()> {
        match &self.blocked {
            Some(reason) => Err(CartError::HydrationFailed(reason.clone())),
            None => Ok(()),
        }
    }

    async fn add_to_cart(&mut self, item: CartItem) -> CartResult<Cart> {
        self.ensure_writable()?;

        let change = self.cart.add_item(item)?;
        self.commit(change).await;
        Ok(self.cart.clone())
    }

    async fn mutate<F>(&mut self, op: F) -> CartResult<Cart>
    where
        F: FnOnce(&mut Cart) -> CartChange,
    {
        self.ensure_writable()?;

        let change = op(&mut self.cart);
        self.commit(change).await;
        Ok(self.cart.clone())
    }

    async fn clear(&mut self) -> CartResult<Cart> {
        self.ensure_writable()?;

        self.cart.clear();
        self.publish();

        if let Err(e) = self.storage.remove_item(&self.config.storage_key).await {
            warn!(error = %e, "Failed to remove saved cart");
        }
        Ok(self.cart.clone())
    }

    /// Publishes and persists after a cart operation.
    async fn commit(&mut self, change: CartChange) {
        if change.is_changed() {
            self.publish();
        } else if !self.config.write_on_noop {
            debug!("No matching item, skipping write");
            return;
        }

        self.persist().await;
    }

    fn publish(&self) {
        self.cart_tx.send_replace(self.cart.clone());
    }

    /// Overwrites the storage slot with the full cart.
    async fn persist(&self) {
        let snapshot = match self.cart.to_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart snapshot");
                return;
            }
        };

        if let Err(e) = self
            .storage
            .set_item(&self.config.storage_key, &snapshot)
            .await
        {
            // in-memory cart keeps the new value; the next write retries it
            warn!(error = %e, "Failed to persist cart");
        }
    }
}
