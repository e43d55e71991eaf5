use std::sync::Arc;

use serde_json::Map;
use uuid::Uuid;

use crate::api::{RoleMenusRequest, RoleRequest};
use crate::database::models::menu::normalize_order;
use crate::database::models::{NewMenuUser, NewRole, Role, RoleMenu};
use crate::repository::RoleRepository;
use crate::types::{Actor, ListParams, Page};

use super::audit::AuditService;
use super::error::{ServiceError, ServiceResult};

const MODUL: &str = "role";

#[derive(Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
    audit: AuditService,
}

impl RoleService {
    pub fn new(roles: Arc<dyn RoleRepository>, audit: AuditService) -> Self {
        Self { roles, audit }
    }

    pub async fn list(&self, params: &ListParams) -> ServiceResult<Page<Role>> {
        let filter = params.to_filter_data(Role::SEARCH_COLUMNS, Map::new(), "nama asc")?;
        Ok(self.roles.list(filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Role> {
        self.roles.find_by_id(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, req: RoleRequest, actor: &Actor) -> ServiceResult<Role> {
        let role = self.roles.create(req.into(), actor.id_user).await?;
        self.audit.record(actor, MODUL, "create", format!("Tambah role {}", role.nama)).await;
        Ok(role)
    }

    pub async fn update(&self, id: Uuid, req: RoleRequest, actor: &Actor) -> ServiceResult<Role> {
        let role = self.roles.update(id, req.into(), actor.id_user).await?.ok_or_else(not_found)?;
        self.audit.record(actor, MODUL, "update", format!("Ubah role {}", role.nama)).await;
        Ok(role)
    }

    pub async fn delete(&self, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        if !self.roles.soft_delete(id, actor.id_user).await? {
            return Err(not_found());
        }
        self.audit.record(actor, MODUL, "delete", format!("Hapus role {}", id)).await;
        Ok(())
    }

    pub async fn menus(&self, id_role: Uuid) -> ServiceResult<Vec<RoleMenu>> {
        Ok(self.roles.menus(id_role).await?)
    }

    /// Upsert the role and replace its whole menu set; `urutan` is renumbered densely per group.
    pub async fn replace_menus(&self, id_role: Uuid, req: RoleMenusRequest, actor: &Actor) -> ServiceResult<Role> {
        if req.menus.is_empty() {
            return Err(ServiceError::invalid_field("menus", "Minimal satu menu harus dipilih"));
        }

        let role = NewRole { nama: req.nama.trim().to_string(), keterangan: req.keterangan };
        let grants = normalize_order(req.menus.into_iter().map(NewMenuUser::from).collect());
        let count = grants.len();

        let role = self.roles.replace_menus(id_role, role, grants, actor.id_user).await?;
        self.audit.record(actor, MODUL, "assign_menu", format!("Atur {} menu untuk role {}", count, role.nama)).await;
        Ok(role)
    }
}

fn not_found() -> ServiceError {
    ServiceError::not_found("Role tidak ditemukan")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RoleMenuItem;
    use crate::testing::{actor, FakeAuditRepository, FakeRoleRepository};

    fn service() -> (RoleService, Arc<FakeRoleRepository>) {
        let roles = Arc::new(FakeRoleRepository::default());
        let audit = AuditService::new(Arc::new(FakeAuditRepository::default()));
        (RoleService::new(roles.clone(), audit), roles)
    }

    fn item(id_menu: Uuid, urutan: i32) -> RoleMenuItem {
        RoleMenuItem { id_menu, urutan, level: 0, parent_id: None, posisi: "sidebar".into() }
    }

    #[tokio::test]
    async fn empty_menu_set_fails_without_mutation() {
        let (service, roles) = service();
        let id_role = Uuid::new_v4();
        roles.seed_grants(id_role, vec![Uuid::new_v4()]);

        let req = RoleMenusRequest { nama: "Operator".into(), keterangan: None, menus: vec![] };
        let err = service.replace_menus(id_role, req, &actor()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation { .. }));
        assert_eq!(roles.grants(id_role).len(), 1);
        assert!(roles.get(id_role).is_none());
    }

    #[tokio::test]
    async fn replacement_renumbers_each_group() {
        let (service, roles) = service();
        let id_role = Uuid::new_v4();
        roles.seed_grants(id_role, vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()]);

        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let req = RoleMenusRequest { nama: " Operator ".into(), keterangan: None, menus: vec![item(a, 10), item(b, 4)] };
        let role = service.replace_menus(id_role, req, &actor()).await.unwrap();

        assert_eq!(role.id, id_role);
        assert_eq!(role.nama, "Operator");
        let grants = roles.grants(id_role);
        assert_eq!(grants.len(), 2);
        assert_eq!((grants[0].id_menu, grants[0].urutan), (b, 1));
        assert_eq!((grants[1].id_menu, grants[1].urutan), (a, 2));
    }

    #[tokio::test]
    async fn missing_role_is_not_found() {
        let (service, _) = service();
        let req = RoleRequest { nama: "X".into(), keterangan: None };
        assert!(matches!(service.update(Uuid::new_v4(), req, &actor()).await, Err(ServiceError::NotFound(_))));
    }
}
