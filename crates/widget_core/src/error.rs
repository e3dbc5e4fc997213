use shared::domain::Asset;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("nothing to encode for {asset} deposit QR")]
    EmptyQrPayload { asset: Asset },
    #[error("failed to encode {asset} deposit QR: {reason}")]
    QrEncoding { asset: Asset, reason: String },
    #[error("could not copy address: {0}")]
    Clipboard(#[source] anyhow::Error),
    #[error("conversion settlement failed: {0}")]
    Settlement(#[source] anyhow::Error),
}
