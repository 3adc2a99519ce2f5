pub mod id;
pub mod model;
pub mod oracle;
pub mod service;
pub mod source;

pub use id::{escape_segment, valid_string_id};
pub use model::{
    Change, Plan, PlanResourceChanges, PlanStatus, PlanStatusTimestamps, ResourceChange,
};
pub use oracle::{CompletionOracle, PlanCompletionOracle};
pub use service::Plans;
pub use source::{LogSource, PlanSource};
