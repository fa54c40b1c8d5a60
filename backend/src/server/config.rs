//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use invigilation::domain::ports::StudentSheet;

/// Everything the server needs once settings have been resolved.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) sheet: Arc<dyn StudentSheet>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Serve `sheet` on `bind_addr` using the system clock.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, sheet: Arc<dyn StudentSheet>) -> Self {
        Self {
            bind_addr,
            sheet,
            clock: Arc::new(DefaultClock),
        }
    }

    /// Replace the clock used for timestamps and the retake cooldown.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by server bootstrap tests")
    )]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
