use crate::error::Result;

/// Somewhere to put scanned text.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn get_text(&mut self) -> Result<String>;
}

/// The desktop clipboard via `arboard`
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner.set_text(text)?;
        Ok(())
    }

    fn get_text(&mut self) -> Result<String> {
        Ok(self.inner.get_text()?)
    }
}

/// In-process clipboard
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = Some(text.to_owned());
        Ok(())
    }

    fn get_text(&mut self) -> Result<String> {
        Ok(self.text.clone().unwrap_or_default())
    }
}
