//! Business rules between the handlers and the repositories.
//!
//! Services take validated request types, enforce the domain invariants and
//! write audit rows; they never see SQL.

pub mod audit;
pub mod bpd;
pub mod dashboard;
pub mod error;
pub mod master;
pub mod menu;
pub mod report;
pub mod role;
pub mod user;

pub use audit::AuditService;
pub use bpd::{BpdDetail, BpdService};
pub use dashboard::{Dashboard, DashboardService};
pub use error::{ServiceError, ServiceResult};
pub use master::MasterService;
pub use menu::{MenuService, NavItem};
pub use report::{ReportData, ReportFile, ReportService, XLSX_CONTENT_TYPE};
pub use role::RoleService;
pub use user::{ClientInfo, LoginResult, UserService};
