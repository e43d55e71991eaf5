use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Map;
use uuid::Uuid;

use crate::api::MenuRequest;
use crate::database::models::{Menu, MenuUser, RoleMenu, SortDirection};
use crate::repository::{MenuRepository, SwapOutcome};
use crate::types::{Actor, ListParams, Page};

use super::audit::AuditService;
use super::error::{ServiceError, ServiceResult};

const MODUL: &str = "menu";

/// One entry of the navigation tree sent to the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id_menu: Uuid,
    pub nama: String,
    pub link: Option<String>,
    pub icon: Option<String>,
    pub posisi: String,
    pub level: i32,
    pub urutan: i32,
    pub children: Vec<NavItem>,
}

#[derive(Clone)]
pub struct MenuService {
    menus: Arc<dyn MenuRepository>,
    audit: AuditService,
}

impl MenuService {
    pub fn new(menus: Arc<dyn MenuRepository>, audit: AuditService) -> Self {
        Self { menus, audit }
    }

    pub async fn list(&self, params: &ListParams) -> ServiceResult<Page<Menu>> {
        let filter = params.to_filter_data(Menu::SEARCH_COLUMNS, Map::new(), "nama asc")?;
        Ok(self.menus.list(filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Menu> {
        self.menus.find_by_id(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, req: MenuRequest, actor: &Actor) -> ServiceResult<Menu> {
        let menu = self.menus.create(req.into(), actor.id_user).await?;
        self.audit.record(actor, MODUL, "create", format!("Tambah menu {}", menu.nama)).await;
        Ok(menu)
    }

    pub async fn update(&self, id: Uuid, req: MenuRequest, actor: &Actor) -> ServiceResult<Menu> {
        let menu = self.menus.update(id, req.into(), actor.id_user).await?.ok_or_else(not_found)?;
        self.audit.record(actor, MODUL, "update", format!("Ubah menu {}", menu.nama)).await;
        Ok(menu)
    }

    pub async fn delete(&self, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        if !self.menus.soft_delete(id, actor.id_user).await? {
            return Err(not_found());
        }
        self.audit.record(actor, MODUL, "delete", format!("Hapus menu {}", id)).await;
        Ok(())
    }

    /// Swap a `menu_user` row with its neighbour; returns both rows after the swap
    pub async fn sort(&self, id: Uuid, direction: SortDirection, actor: &Actor) -> ServiceResult<Vec<MenuUser>> {
        match self.menus.swap_order(id, direction).await? {
            SwapOutcome::Swapped { target, neighbour } => {
                self.audit
                    .record(actor, MODUL, "sort", format!("Urutan menu {} {:?}", target.id_menu, direction))
                    .await;
                Ok(vec![target, neighbour])
            }
            SwapOutcome::MissingRow => Err(ServiceError::not_found("Menu tidak ditemukan")),
            SwapOutcome::NoNeighbour => Err(ServiceError::not_found("Tidak ada menu lain untuk ditukar urutannya")),
        }
    }

    pub async fn navigation(&self, id_role: Uuid) -> ServiceResult<Vec<NavItem>> {
        let rows = self.menus.navigation(id_role).await?;
        Ok(build_tree(rows))
    }
}

fn not_found() -> ServiceError {
    ServiceError::not_found("Menu tidak ditemukan")
}

/// Nest rows under the entry whose `id_menu` their `parent_id` names.
///
/// Rows whose parent is not granted to the role are shown at the top level.
pub fn build_tree(mut rows: Vec<RoleMenu>) -> Vec<NavItem> {
    rows.sort_by(|a, b| (a.posisi.as_str(), a.level, a.urutan).cmp(&(b.posisi.as_str(), b.level, b.urutan)));

    let granted: HashSet<Uuid> = rows.iter().map(|r| r.id_menu).collect();
    let mut children: HashMap<Uuid, Vec<&RoleMenu>> = HashMap::new();
    let mut roots = Vec::new();
    for row in &rows {
        match row.parent_id {
            Some(parent) if granted.contains(&parent) && parent != row.id_menu => {
                children.entry(parent).or_default().push(row)
            }
            _ => roots.push(row),
        }
    }

    let mut visited = HashSet::new();
    roots.into_iter().filter_map(|row| attach(row, &children, &mut visited)).collect()
}

fn attach(row: &RoleMenu, children: &HashMap<Uuid, Vec<&RoleMenu>>, visited: &mut HashSet<Uuid>) -> Option<NavItem> {
    if !visited.insert(row.id) {
        return None;
    }
    let nested = children
        .get(&row.id_menu)
        .map(|kids| kids.iter().filter_map(|kid| attach(kid, children, visited)).collect())
        .unwrap_or_default();

    Some(NavItem {
        id_menu: row.id_menu,
        nama: row.nama.clone(),
        link: row.link.clone(),
        icon: row.icon.clone(),
        posisi: row.posisi.clone(),
        level: row.level,
        urutan: row.urutan,
        children: nested,
    })
}
