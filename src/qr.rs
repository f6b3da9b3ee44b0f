//! QR codes carrying a username
//!
//! Encoding is done here with the `qrcode` crate. Decoding from the camera is
//! left to the html5-qrcode browser library; [`QrScanner`] drives it and
//! reports each decoded payload through a callback.

use crate::error::ClientError;
use qrcode::QrCode;
use qrcode::render::{svg, unicode};

/// Smallest edge of the rendered code, in pixels.
pub const QR_SIZE: u32 = 200;

fn encode(text: &str) -> Result<QrCode, ClientError> {
    if text.trim().is_empty() {
        return Err(ClientError::validation("Nothing to encode."));
    }
    QrCode::new(text.as_bytes())
        .map_err(|e| ClientError::validation(format!("QR generation failed: {}", e)))
}

/// SVG markup for `text`, black on white.
#[cfg_attr(not(feature = "web"), allow(dead_code))]
pub fn username_svg(text: &str) -> Result<String, ClientError> {
    Ok(encode(text)?
        .render::<svg::Color>()
        .min_dimensions(QR_SIZE, QR_SIZE)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#FFFFFF"))
        .build())
}

/// Half-block rendering that fits in a terminal.
#[cfg_attr(not(feature = "cli"), allow(dead_code))]
pub fn username_terminal(text: &str) -> Result<String, ClientError> {
    Ok(encode(text)?
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

#[cfg(feature = "web")]
pub use scanner::{QrScanner, SCANNER_SCRIPT_URL};

#[cfg(feature = "web")]
mod scanner {
    use dioxus::prelude::*;

    const SCANNER_ELEMENT_ID: &str = "qr-scanner";

    /// Decoder library loaded once by the app shell.
    pub const SCANNER_SCRIPT_URL: &str = "https://unpkg.com/html5-qrcode@2.3.8/html5-qrcode.min.js";

    // Waits for the library and the scanner element, then forwards the first decode.
    const START_SCANNER: &str = r#"
        window.__bonusScannerCancelled = false;
        const start = () => {
            if (window.__bonusScannerCancelled) return;
            if (!window.Html5QrcodeScanner || !document.getElementById("qr-scanner")) {
                setTimeout(start, 100);
                return;
            }
            const scanner = new Html5QrcodeScanner("qr-scanner", { qrbox: 250, fps: 5 }, false);
            window.__bonusScanner = scanner;
            scanner.render((decoded) => {
                scanner.clear().catch(() => {});
                window.__bonusScanner = null;
                dioxus.send(decoded);
            }, () => {});
        };
        start();
    "#;

    const STOP_SCANNER: &str = r#"
        window.__bonusScannerCancelled = true;
        if (window.__bonusScanner) {
            window.__bonusScanner.clear().catch(() => {});
            window.__bonusScanner = null;
        }
    "#;

    /// Camera scanner; runs while mounted and stops after the first decode.
    #[component]
    pub fn QrScanner(on_scan: EventHandler<String>) -> Element {
        use_future(move || async move {
            let mut eval = document::eval(START_SCANNER);
            match eval.recv::<String>().await {
                Ok(decoded) => {
                    log::debug!("QR code decoded");
                    on_scan.call(decoded);
                }
                Err(e) => log::error!("QR scanner stopped: {:?}", e),
            }
        });

        use_drop(|| {
            let _ = document::eval(STOP_SCANNER);
        });

        rsx! {
            div { id: SCANNER_ELEMENT_ID, style: "width: 100%" }
        }
    }
}
