//! Generator view: payload and style in, symbol, previews and reveal out

use crate::config::{GeneratorSettings, MAX_DISPLAY_SIZE};
use crate::encoder::{EncodedSymbol, QrEncoder, render_bitmap};
use crate::error::{QrError, Result};
use crate::models::{Bitmap, Rgb};
use crate::reveal::{RevealOrchestrator, SettleTimer};
use crate::tools::export::{ExportFormat, export_to_dir};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// State behind the generator tab.
///
/// Two renders are kept at preview size: the styled preview, and a plain
/// black-on-white copy that the reveal samples so that any colour pair
/// classifies the same way.
pub struct GeneratorView<E: QrEncoder> {
    settings: GeneratorSettings,
    encoder: E,
    symbol: Option<EncodedSymbol>,
    preview: Option<Bitmap>,
    sample_source: Option<Bitmap>,
    error: Option<String>,
    reveal: RevealOrchestrator,
}

impl<E: QrEncoder> GeneratorView<E> {
    /// Encode the initial payload. No reveal runs for it.
    pub fn new(settings: GeneratorSettings, encoder: E, reveal: RevealOrchestrator) -> Self {
        let mut view = Self {
            settings,
            encoder,
            symbol: None,
            preview: None,
            sample_source: None,
            error: None,
            reveal,
        };
        view.refresh();
        view
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Current symbol; `None` if the payload could not be encoded
    pub fn symbol(&self) -> Option<&EncodedSymbol> {
        self.symbol.as_ref()
    }

    /// Styled render at preview size
    pub fn preview(&self) -> Option<&Bitmap> {
        self.preview.as_ref()
    }

    /// Why the last encode failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn reveal(&self) -> &RevealOrchestrator {
        &self.reveal
    }

    /// Whether exports will be larger than the preview
    pub fn shows_size_notice(&self) -> bool {
        self.settings.size > MAX_DISPLAY_SIZE
    }

    /// Change the payload. A different payload re-encodes and starts a
    /// reveal; the returned timer settles it.
    pub fn set_payload(&mut self, payload: &str, now: Duration) -> Option<SettleTimer> {
        if payload == self.settings.payload {
            return None;
        }
        self.settings.payload = payload.to_owned();
        self.refresh();

        let grid_size = self.symbol.as_ref().map(EncodedSymbol::width).unwrap_or(0);
        let display = self.settings.display_size() as f32;
        self.reveal
            .trigger(self.sample_source.as_ref(), grid_size, display, now)
    }

    /// Change the export size (snapped to the slider step)
    pub fn set_size(&mut self, size: u32) -> Result<()> {
        self.settings.set_size(size)?;
        self.refresh();
        Ok(())
    }

    pub fn set_colors(&mut self, foreground: Rgb, background: Rgb) {
        self.settings.foreground = foreground;
        self.settings.background = background;
        self.refresh();
    }

    /// Deliver a settle timer to the reveal
    pub fn fire(&mut self, timer: SettleTimer) -> bool {
        self.reveal.fire(timer)
    }

    /// Settle the reveal if it is due
    pub fn poll(&mut self, now: Duration) -> bool {
        self.reveal.poll(now)
    }

    /// Write `qrcode.<ext>` at the full export size into `dir`
    pub fn export(&self, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
        let symbol = self.symbol.as_ref().ok_or_else(|| {
            QrError::Encode(self.error.clone().unwrap_or_else(|| "no symbol".into()))
        })?;
        export_to_dir(symbol, &self.settings, format, dir)
    }

    fn refresh(&mut self) {
        let settings = &self.settings;
        let rendered = self
            .encoder
            .encode(&settings.payload, settings.ec_level)
            .and_then(|symbol| {
                let display = settings.display_size();
                let preview =
                    render_bitmap(&symbol, display, settings.foreground, settings.background)?;
                let plain = render_bitmap(&symbol, display, Rgb::BLACK, Rgb::WHITE)?;
                Ok((symbol, preview, plain))
            });

        match rendered {
            Ok((symbol, preview, plain)) => {
                self.symbol = Some(symbol);
                self.preview = Some(preview);
                self.sample_source = Some(plain);
                self.error = None;
            }
            Err(err) => {
                log::warn!("cannot render payload: {err}");
                self.symbol = None;
                self.preview = None;
                self.sample_source = None;
                self.error = Some(err.to_string());
            }
        }
    }
}
