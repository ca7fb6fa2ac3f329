//! Dry-run notifier that prints messages instead of sending them

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::Message;
use crate::error::{SantaError, SantaResult};
use crate::traits::Notifier;

/// Writes every message to a console (stdout by default)
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn connect(&self) -> SantaResult<()> {
        // Nothing to authenticate against
        Ok(())
    }

    async fn send(&self, message: &Message) -> SantaResult<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| SantaError::notification("console writer poisoned"))?;
        writeln!(out, "{message}\n")?;
        out.flush()?;
        Ok(())
    }
}
