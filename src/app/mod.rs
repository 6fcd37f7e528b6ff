//! Application state: theme, tabs and the two views

pub mod generator;
pub mod scanner;
pub mod tabs;
pub mod theme;

pub use generator::GeneratorView;
pub use scanner::{ScanOutcome, ScannerView};
pub use tabs::{Tab, TabState};
pub use theme::{Theme, ThemeStore};

use crate::config::{GeneratorSettings, RevealTiming};
use crate::encoder::QrcodeEncoder;
use crate::reveal::RevealOrchestrator;

/// Everything one session of the app owns
pub struct App {
    pub theme: ThemeStore,
    pub tabs: TabState,
    pub generator: GeneratorView<QrcodeEncoder>,
    pub scanner: ScannerView,
}

impl App {
    pub fn new(settings: GeneratorSettings, timing: RevealTiming) -> Self {
        Self {
            theme: ThemeStore::default(),
            tabs: TabState::default(),
            generator: GeneratorView::new(settings, QrcodeEncoder, RevealOrchestrator::new(timing)),
            scanner: ScannerView::default(),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(GeneratorSettings::default(), RevealTiming::default())
    }
}
