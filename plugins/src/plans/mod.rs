pub mod service;

pub use service::PlanServicePlugin;
