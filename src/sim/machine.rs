//! Simulated melting machine.

use std::sync::{Arc, Mutex};

use crate::clock::Clock;
use crate::domain::{
    AlertLog, Machine, MachineInfo, MeltingLog, RequestQueue, SegmentStore, Sensor,
};

use super::records::{SimAlertLog, SimMeltingLog, SimRequestQueue, SimSegmentStore};
use super::sensor::SimSensor;
use super::lock;

pub struct SimMachine {
    info: MachineInfo,
    /// Key order is the registration order, mirrored by `sensor_keys`.
    sensors: Vec<(String, Arc<SimSensor>)>,
    weight: Mutex<f64>,
    alerts: Arc<SimAlertLog>,
    meltings: Arc<SimMeltingLog>,
    segments: Arc<SimSegmentStore>,
    requests: Arc<SimRequestQueue>,
}

impl SimMachine {
    pub fn new(id: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            info: MachineInfo {
                id: id.to_string(),
                name: id.to_string(),
            },
            sensors: Vec::new(),
            weight: Mutex::new(0.0),
            alerts: Arc::new(SimAlertLog::new(id, clock.clone())),
            meltings: Arc::new(SimMeltingLog::new(clock)),
            segments: Arc::new(SimSegmentStore::new()),
            requests: Arc::new(SimRequestQueue::new()),
        }
    }

    pub fn with_sensor(mut self, key: &str, sensor: SimSensor) -> Self {
        self.sensors.push((key.to_string(), Arc::new(sensor)));
        self
    }

    /// Typed facet access for tests that drive events.
    pub fn sim_alerts(&self) -> Arc<SimAlertLog> {
        self.alerts.clone()
    }

    pub fn sim_meltings(&self) -> Arc<SimMeltingLog> {
        self.meltings.clone()
    }

    pub fn sim_segments(&self) -> Arc<SimSegmentStore> {
        self.segments.clone()
    }

    pub fn sim_requests(&self) -> Arc<SimRequestQueue> {
        self.requests.clone()
    }
}

impl Machine for SimMachine {
    fn info(&self) -> MachineInfo {
        self.info.clone()
    }

    fn sensor_keys(&self) -> Vec<String> {
        self.sensors.iter().map(|(key, _)| key.clone()).collect()
    }

    fn sensor(&self, key: &str) -> Option<Arc<dyn Sensor>> {
        self.sensors
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, sensor)| sensor.clone() as Arc<dyn Sensor>)
    }

    fn weight(&self) -> f64 {
        *lock(&self.weight)
    }

    fn set_weight(&self, amount: f64) -> f64 {
        let mut weight = lock(&self.weight);
        *weight = amount;
        *weight
    }

    fn load(&self, amount: f64) -> f64 {
        let mut weight = lock(&self.weight);
        *weight += amount;
        *weight
    }

    fn dispense(&self, amount: f64) -> f64 {
        let mut weight = lock(&self.weight);
        *weight -= amount;
        *weight
    }

    fn alerts(&self) -> Arc<dyn AlertLog> {
        self.alerts.clone()
    }

    fn meltings(&self) -> Arc<dyn MeltingLog> {
        self.meltings.clone()
    }

    fn segments(&self) -> Arc<dyn SegmentStore> {
        self.segments.clone()
    }

    fn requests(&self) -> Arc<dyn RequestQueue> {
        self.requests.clone()
    }
}
