//! # Cart Provider
//!
//! Provider/consumer access to the cart for UI code that cannot take a
//! [`CartHandle`] argument.
//!
//! ```text
//! provider.scope(async {
//!     // any code awaited in here, however deep
//!     let cart = use_cart()?;          ──► Ok(CartHandle)
//!     cart.add_to_cart(item).await?;
//! }).await;
//!
//! use_cart()                           ──► Err(CartError::NoProvider)
//! ```
//!
//! The scope is task-local: a task spawned inside it does not inherit the
//! provider. Pass the handle (or wrap the spawned future in another
//! `scope`) instead.

use std::future::Future;

use crate::error::{CartError, CartResult};
use crate::service::CartHandle;

tokio::task_local! {
    static CURRENT_CART: CartHandle;
}

/// Supplies a cart to everything running inside its scope.
#[derive(Debug, Clone)]
pub struct CartProvider {
    handle: CartHandle,
}

impl CartProvider {
    /// Creates a provider for `handle`.
    pub fn new(handle: CartHandle) -> Self {
        CartProvider { handle }
    }

    /// Returns the provided handle.
    pub fn handle(&self) -> &CartHandle {
        &self.handle
    }

    /// Runs `fut` with this provider's cart available to [`use_cart`].
    pub async fn scope<F>(&self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(self.handle.clone(), fut).await
    }

    /// Runs `f` synchronously with this provider's cart available.
    pub fn sync_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_CART.sync_scope(self.handle.clone(), f)
    }
}

/// Returns the cart of the enclosing [`CartProvider`] scope.
///
/// ## Errors
/// [`CartError::NoProvider`] when called outside any scope.
pub fn use_cart() -> CartResult<CartHandle> {
    CURRENT_CART
        .try_with(CartHandle::clone)
        .map_err(|_| CartError::NoProvider)
}
