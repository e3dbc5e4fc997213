//! Browser-side collaborators of the new tab and settings pages: the rewards
//! checkout dialog host and the sync settings proxy.

use async_trait::async_trait;
use serde_json::Value;
use shared::error::HostException;

pub mod checkout;
pub mod sync;

pub use checkout::{CheckoutHost, CheckoutHostListener};
pub use sync::{DefaultSyncBrowserProxy, SyncBrowserProxy};

/// Message channel between a WebUI page and its browser-side handler.
#[async_trait]
pub trait WebUiChannel: Send + Sync {
    /// Fire-and-forget message.
    fn send(&self, message: &str, args: Vec<Value>);
    /// Request with a single response.
    async fn send_with_promise(&self, message: &str, args: Vec<Value>)
        -> Result<Value, HostException>;
    /// Value the browser injected into the page, e.g. `dialogArguments`.
    fn variable_value(&self, name: &str) -> Option<String>;
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
