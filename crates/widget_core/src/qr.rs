use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::{render::svg, QrCode};
use shared::domain::Asset;

use crate::{error::WidgetError, QrEncoder};

const QR_MIN_DIMENSION: u32 = 200;

/// Renders deposit targets as SVG QR codes wrapped in a `data:` URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgQrEncoder;

impl QrEncoder for SvgQrEncoder {
    fn encode(&self, url: &str, asset: &Asset) -> Result<String, WidgetError> {
        if url.is_empty() {
            return Err(WidgetError::EmptyQrPayload {
                asset: asset.clone(),
            });
        }

        let code = QrCode::new(url.as_bytes()).map_err(|err| WidgetError::QrEncoding {
            asset: asset.clone(),
            reason: err.to_string(),
        })?;
        let image = code
            .render()
            .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();

        Ok(format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(image.as_bytes())
        ))
    }
}
