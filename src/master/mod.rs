//! Descriptor-driven CRUD over the reference tables (`m_*`).

pub mod payload;
pub mod registry;

pub use payload::{MasterPayload, PayloadError, PayloadMode};
pub use registry::{find_entity, MasterColumn, MasterEntity, REGISTRY};
