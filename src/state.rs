use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::repository::{
    PgAuditRepository, PgBpdRepository, PgDashboardRepository, PgMasterRepository, PgMenuRepository,
    PgReportRepository, PgRoleRepository, PgUserRepository,
};
use crate::services::{
    AuditService, BpdService, DashboardService, MasterService, MenuService, ReportService, RoleService, UserService,
};

/// Shared by every handler; cloning only bumps reference counts
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub keys: Arc<JwtKeys>,
    pub audit: AuditService,
    pub users: UserService,
    pub roles: RoleService,
    pub menus: MenuService,
    pub dashboard: DashboardService,
    pub master: MasterService,
    pub bpd: BpdService,
    pub reports: ReportService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        let keys = Arc::new(JwtKeys::from_config(&config.security));
        let audit = AuditService::new(Arc::new(PgAuditRepository::new(pool.clone())));
        let master_repo = Arc::new(PgMasterRepository::new(pool.clone()));

        Self {
            users: UserService::new(
                Arc::new(PgUserRepository::new(pool.clone())),
                audit.clone(),
                keys.clone(),
                config.security.bcrypt_cost,
            ),
            roles: RoleService::new(Arc::new(PgRoleRepository::new(pool.clone())), audit.clone()),
            menus: MenuService::new(Arc::new(PgMenuRepository::new(pool.clone())), audit.clone()),
            dashboard: DashboardService::new(Arc::new(PgDashboardRepository::new(pool.clone()))),
            master: MasterService::new(master_repo.clone(), audit.clone()),
            bpd: BpdService::new(Arc::new(PgBpdRepository::new(pool.clone())), audit.clone()),
            reports: ReportService::new(Arc::new(PgReportRepository::new(pool.clone())), master_repo),
            audit,
            keys,
            pool,
        }
    }
}
