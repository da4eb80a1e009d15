//! Stage domain logic
//!
//! - `schema`: which stage fields are writable and how their values are coerced
//! - `policy`: which gate a new stage receives
//! - `mutation`: applying partial updates with an audit log
//! - `lifecycle`: create, read, update and archive operations

pub mod lifecycle;
pub mod mutation;
pub mod policy;
pub mod schema;

pub use lifecycle::{CreatedStage, NewStage, StageService};
pub use mutation::{ChangePayload, ChangedField};
pub use policy::GatePolicy;
