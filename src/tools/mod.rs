//! File export, image import, clipboard and link helpers

pub mod clipboard;
pub mod export;
pub mod import;
pub mod link;

pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use export::{ExportFormat, export_bytes, export_to_dir};
pub use import::{is_image_mime, is_image_path, load_rgba, load_rgba_from_memory};
pub use link::ScannedText;
