//! Helpers shared by the driver tests.

/// Delay that only records how long it was asked to wait.
#[derive(Debug, Default)]
pub(crate) struct RecordingDelay {
    pub total_ns: u64,
    /// Number of `delay_ms` calls
    pub calls: usize,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_ns += ms as u64 * 1_000_000;
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_ns += ms as u64 * 1_000_000;
    }
}
