//! Simulated sensor generating values around a base.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::clock::Clock;
use crate::domain::model::{Measurement, TimeRange};
use crate::domain::plant::EventCallback;
use crate::domain::{Sensor, Subscription};

pub struct SimSensor {
    name: String,
    unit: String,
    base: f64,
    clock: Arc<dyn Clock>,
}

impl SimSensor {
    pub fn new(name: &str, unit: &str, base: f64, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            base,
            clock,
        }
    }

    fn generate(&self) -> f64 {
        let variation = (rand::thread_rng().gen::<f64>() - 0.5) * 20.0;
        self.base + variation
    }
}

impl Sensor for SimSensor {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn unit(&self) -> String {
        self.unit.clone()
    }

    fn measurements(&self, range: TimeRange, step: Duration) -> Vec<Measurement> {
        let step = chrono::Duration::from_std(step).unwrap_or(chrono::Duration::seconds(1));
        let mut readings = Vec::new();
        let mut timestamp = range.start;
        while timestamp <= range.end {
            readings.push(Measurement {
                timestamp,
                value: self.generate(),
            });
            timestamp += step;
        }
        readings
    }

    fn subscribe(
        &self,
        since: DateTime<Utc>,
        step: Duration,
        callback: EventCallback<Measurement>,
    ) -> Subscription {
        // Replay the historical window first, then go live.
        let now = self.clock.now();
        for reading in self.measurements(
            TimeRange {
                start: since,
                end: now,
            },
            step,
        ) {
            callback(&reading);
        }

        let base = self.base;
        let clock = self.clock.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(step);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let value = base + (rand::thread_rng().gen::<f64>() - 0.5) * 20.0;
                callback(&Measurement {
                    timestamp: clock.now(),
                    value,
                });
            }
        });
        Subscription::new(move || task.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn sensor() -> SimSensor {
        SimSensor::new(
            "Voltage",
            "V",
            380.0,
            Arc::new(FixedClock("2024-03-15T12:00:00Z".parse().unwrap())),
        )
    }

    #[test]
    fn test_measurements_cover_range_at_step() {
        let range = TimeRange {
            start: "2024-03-15T11:59:50Z".parse().unwrap(),
            end: "2024-03-15T12:00:00Z".parse().unwrap(),
        };
        let readings = sensor().measurements(range, Duration::from_secs(5));
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].timestamp, range.start);
        assert_eq!(readings[2].timestamp, range.end);
        for reading in readings {
            assert!((reading.value - 380.0).abs() <= 10.0);
        }
    }

    #[tokio::test]
    async fn test_subscribe_replays_history_before_live() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = delivered.clone();
        let subscription = sensor().subscribe(
            "2024-03-15T11:59:58Z".parse().unwrap(),
            Duration::from_secs(1),
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        // 11:59:58, 11:59:59, 12:00:00 replayed synchronously.
        assert_eq!(delivered.load(Ordering::SeqCst), 3);
        subscription.cancel();
    }
}
