//! Admission policy: count recent notifications, compare against the
//! category quota, persist, then dispatch.

pub mod decision;
pub mod engine;

pub use decision::AdmissionDecision;
pub use engine::AdmissionService;
