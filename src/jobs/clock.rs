use std::time::{Duration, Instant};

/// Time source for job timers.
///
/// `System` follows the wall clock and really sleeps. `Manual` only moves
/// when advanced, so timer behavior is deterministic.
#[derive(Debug, Clone)]
pub enum Clock {
    System { started: Instant },
    Manual { elapsed_ms: u64 },
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl Clock {
    pub fn system() -> Self {
        Clock::System { started: Instant::now() }
    }

    pub fn manual() -> Self {
        Clock::Manual { elapsed_ms: 0 }
    }

    /// Milliseconds since the clock was created.
    pub fn now_ms(&self) -> u64 {
        match self {
            Clock::System { started } => started.elapsed().as_millis() as u64,
            Clock::Manual { elapsed_ms } => *elapsed_ms,
        }
    }

    /// Move a manual clock forward. No effect on the system clock.
    pub fn advance(&mut self, ms: u64) {
        if let Clock::Manual { elapsed_ms } = self {
            *elapsed_ms += ms;
        }
    }

    /// Block the foreground for `ms`.
    pub async fn sleep(&mut self, ms: u64) {
        match self {
            Clock::System { .. } => tokio::time::sleep(Duration::from_millis(ms)).await,
            Clock::Manual { elapsed_ms } => *elapsed_ms += ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_clock_moves_only_when_told() {
        let mut clock = Clock::manual();
        assert_eq!(clock.now_ms(), 0);
        clock.advance(1500);
        assert_eq!(clock.now_ms(), 1500);
        clock.sleep(500).await;
        assert_eq!(clock.now_ms(), 2000);
    }

    #[tokio::test]
    async fn test_system_clock_ignores_advance() {
        let mut clock = Clock::system();
        clock.advance(60_000);
        assert!(clock.now_ms() < 60_000);
    }
}
