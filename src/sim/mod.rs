//! In-memory plant.
//!
//! Implements the domain traits without external dependencies: sensors
//! generate noisy values around a base, the logs keep their records in
//! memory and publish typed events through an `EventBus`. The demo binary
//! serves one of these; the integration tests drive its mutation helpers
//! to provoke stream events.

pub mod machine;
pub mod records;
pub mod sensor;

pub use machine::SimMachine;
pub use records::{SimAlertLog, SimMeltingLog, SimRequestQueue, SimSegmentStore};
pub use sensor::SimSensor;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::clock::Clock;
use crate::domain::{Machine, MachineInfo, Plant};

/// Lock helper that shrugs off poisoning; sim state stays usable even if
/// a driving test panicked mid-update.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A plant with a fixed set of simulated machines.
pub struct SimPlant {
    machines: Vec<Arc<SimMachine>>,
}

impl SimPlant {
    pub fn new(machines: Vec<Arc<SimMachine>>) -> Self {
        Self { machines }
    }

    /// One melting machine with a voltage and a power-factor sensor.
    pub fn demo(clock: Arc<dyn Clock>) -> Self {
        let machine = SimMachine::new("icht1", clock.clone())
            .with_sensor("voltage", SimSensor::new("Voltage", "V", 380.0, clock.clone()))
            .with_sensor(
                "cosphi",
                SimSensor::new("Power Factor", "cos(φ)", 0.85, clock),
            );
        Self::new(vec![Arc::new(machine)])
    }

    /// Typed access for tests that drive events.
    pub fn sim_machine(&self, id: &str) -> Option<Arc<SimMachine>> {
        self.machines
            .iter()
            .find(|machine| machine.info().id == id)
            .cloned()
    }
}

impl Plant for SimPlant {
    fn machines(&self) -> Vec<MachineInfo> {
        self.machines.iter().map(|machine| machine.info()).collect()
    }

    fn machine(&self, id: &str) -> Option<Arc<dyn Machine>> {
        self.sim_machine(id).map(|machine| machine as Arc<dyn Machine>)
    }
}
