//! Data access: one trait per aggregate plus its PostgreSQL implementation.
//!
//! Services depend on the traits only, so unit tests swap in the in-memory
//! fakes from `crate::testing`.

pub mod audit;
pub mod bpd;
pub mod dashboard;
pub mod master;
pub mod menu;
pub mod report;
pub mod role;
pub mod user;

pub use audit::{AuditRepository, PgAuditRepository};
pub use bpd::{BpdRepository, ChildWrite, PgBpdRepository};
pub use dashboard::{DashboardRepository, PgDashboardRepository};
pub use master::{MasterRepository, PgMasterRepository};
pub use menu::{MenuRepository, PgMenuRepository, SwapOutcome};
pub use report::{PgReportRepository, ReportRepository};
pub use role::{PgRoleRepository, RoleRepository};
pub use user::{PgUserRepository, UserRepository};
