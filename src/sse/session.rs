//! Per-connection stream lifecycle.

use crate::domain::subscription::Subscription;
use crate::observability::metrics;

use super::channel::SseChannel;
use super::HEARTBEAT_INTERVAL;

/// Owns what one open connection holds onto: the channel, its heartbeat
/// ticker and the domain subscriptions feeding it.
///
/// Teardown order matters: the heartbeat loop stops before the
/// subscriptions are cancelled, so nothing fires into a torn-down channel.
pub struct SseSession {
    channel: SseChannel,
    subscriptions: Vec<Subscription>,
}

impl SseSession {
    pub fn new(channel: SseChannel, subscriptions: Vec<Subscription>) -> Self {
        Self {
            channel,
            subscriptions,
        }
    }

    /// Drive the session on a background task until the transport closes.
    pub fn spawn(self) {
        tokio::spawn(self.run());
    }

    async fn run(self) {
        metrics::stream_opened();
        let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
        // The zeroth tick fires immediately; the opening heartbeat was
        // already written by the route handler.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = self.channel.closed() => break,
                _ = ticker.tick() => {
                    if self.channel.heartbeat().is_err() {
                        break;
                    }
                }
            }
        }
        // Heartbeat ticker stops here, before the subscriptions go.
        drop(ticker);
        for subscription in self.subscriptions {
            subscription.cancel();
        }
        metrics::stream_closed();
        tracing::debug!("event stream torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_transport_close_cancels_subscriptions() {
        let clock = Arc::new(FixedClock("2024-03-15T12:00:00Z".parse().unwrap()));
        let (channel, response) = SseChannel::open(clock);
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let subscription = Subscription::new(move || flag.store(true, Ordering::SeqCst));

        SseSession::new(channel, vec![subscription]).spawn();
        drop(response);

        tokio::time::timeout(Duration::from_secs(1), async {
            while !cancelled.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("subscription should be cancelled after transport close");
    }
}
