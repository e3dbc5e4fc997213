//! Settings-page proxy for the sync setup handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared::error::{ErrorCode, HostException};
use shared::protocol::{PageStatus, SyncPrefs};
use tracing::{debug, warn};

use crate::WebUiChannel;

const SHOW_SETUP_UI: &str = "SyncSetupShowSetupUI";
const SET_DATATYPES: &str = "SyncSetupSetDatatypes";

#[async_trait]
pub trait SyncBrowserProxy: Send + Sync {
    /// Tells the browser the sync page is showing.
    fn did_navigate_to_sync_page(&self);

    /// Sends the chosen data types. One request, never retried.
    async fn set_sync_datatypes(&self, prefs: &SyncPrefs) -> Result<PageStatus, HostException>;
}

pub struct DefaultSyncBrowserProxy {
    channel: Arc<dyn WebUiChannel>,
}

impl DefaultSyncBrowserProxy {
    pub fn new(channel: Arc<dyn WebUiChannel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl SyncBrowserProxy for DefaultSyncBrowserProxy {
    fn did_navigate_to_sync_page(&self) {
        self.channel.send(SHOW_SETUP_UI, Vec::new());
    }

    async fn set_sync_datatypes(&self, prefs: &SyncPrefs) -> Result<PageStatus, HostException> {
        let encoded = serde_json::to_string(prefs).map_err(|err| {
            HostException::new(ErrorCode::Malformed, format!("encode sync prefs: {err}"))
        })?;
        debug!("sync: sending data types");

        let reply = self
            .channel
            .send_with_promise(SET_DATATYPES, vec![Value::String(encoded)])
            .await?;
        serde_json::from_value::<PageStatus>(reply).map_err(|err| {
            warn!("sync: unexpected page status: {err}");
            HostException::new(ErrorCode::Malformed, format!("decode page status: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::RecordingChannel;

    fn proxy(response: Option<Value>) -> (DefaultSyncBrowserProxy, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel {
            response,
            ..RecordingChannel::default()
        });
        (
            DefaultSyncBrowserProxy::new(Arc::clone(&channel) as Arc<dyn WebUiChannel>),
            channel,
        )
    }

    #[test]
    fn navigation_shows_setup_ui() {
        let (proxy, channel) = proxy(None);
        proxy.did_navigate_to_sync_page();
        assert_eq!(channel.messages(), vec![SHOW_SETUP_UI.to_string()]);
    }

    #[tokio::test]
    async fn datatypes_are_sent_as_json_string() {
        let (proxy, channel) = proxy(Some(json!("configure")));
        let prefs = SyncPrefs {
            sync_all_data_types: false,
            bookmarks_synced: true,
            ..SyncPrefs::default()
        };

        let status = proxy.set_sync_datatypes(&prefs).await.expect("status");
        assert_eq!(status, PageStatus::Configure);

        let sent = channel.sent.lock().expect("sent").clone();
        assert_eq!(sent.len(), 1);
        let (message, args) = &sent[0];
        assert_eq!(message, SET_DATATYPES);
        let Value::String(encoded) = &args[0] else {
            panic!("prefs should travel as a string: {args:?}");
        };
        let decoded: SyncPrefs = serde_json::from_str(encoded).expect("prefs");
        assert_eq!(decoded, prefs);
    }

    #[tokio::test]
    async fn unknown_status_is_malformed() {
        let (proxy, _channel) = proxy(Some(json!("exploded")));
        let err = proxy
            .set_sync_datatypes(&SyncPrefs::default())
            .await
            .expect_err("bad status");
        assert_eq!(err.code, ErrorCode::Malformed);
    }

    #[tokio::test]
    async fn host_failure_is_not_retried() {
        let (proxy, channel) = proxy(None);
        let err = proxy
            .set_sync_datatypes(&SyncPrefs::default())
            .await
            .expect_err("no handler");
        assert_eq!(err.code, ErrorCode::Unavailable);
        assert_eq!(channel.messages().len(), 1);
    }
}
