//! Interface to the plant domain collaborator.
//!
//! The supervisory layer formats and routes; it does not own the plant
//! model. Everything it needs from the domain package is expressed here as
//! traits (`Plant`, `Machine`, `Sensor` and the per-resource facets),
//! typed event enums per stream kind, and a cancellable subscription
//! handle. Implementations are injected into the route factories as
//! `Arc<dyn …>` at server assembly.

pub mod events;
pub mod model;
pub mod plant;
pub mod subscription;

pub use events::{AlertEvent, MeltingEvent, RequestEvent, SegmentEvent};
pub use model::{
    Alert, LabelRequest, MachineInfo, Measurement, Melting, MeltingDraft, Sample, Segment,
    Series, SeriesPoint, TimeRange,
};
pub use plant::{
    AlertLog, EventCallback, Machine, MeltingLog, Plant, RequestQueue, SegmentStore, Sensor,
};
pub use subscription::{EventBus, Subscription};
