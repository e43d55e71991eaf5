//! In-memory repositories and fixtures for service tests.
//!
//! Each fake keeps its rows behind a `Mutex` and mirrors the SQL guards of the
//! postgres implementation closely enough for the service rules to be exercised.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::BpdRequest;
use crate::auth::hash_password;
use crate::database::models::menu::neighbour;
use crate::database::models::{
    Biaya, Dokumen, Histori, Kendaraan, LogSystem, LoginActivity, Menu, MenuUser, NewBiaya, NewDokumen,
    NewKendaraan, NewLogSystem, NewLoginActivity, NewMenu, NewMenuUser, NewPerjalananDinas, NewRole, NewUser,
    PerjalananDinas, Role, RoleMenu, SortDirection, StatusBpd, User, UserChanges,
};
use crate::database::DatabaseError;
use crate::filter::FilterData;
use crate::master::{find_entity, MasterEntity, MasterPayload};
use crate::report::{ReportKind, ReportParams};
use crate::repository::{
    AuditRepository, BpdRepository, DashboardRepository, MasterRepository, MenuRepository, ReportRepository,
    ChildWrite, RoleRepository, SwapOutcome, UserRepository,
};
use crate::types::{Actor, Page};

/// Lowest cost bcrypt accepts; keeps hashing fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn actor() -> Actor {
    Actor {
        id_user: Uuid::new_v4(),
        username: "admin".to_string(),
        ip: Some("127.0.0.1".to_string()),
        user_agent: Some("unit-test".to_string()),
    }
}

pub fn user_with_password(username: &str, password: &str) -> User {
    User {
        id: Uuid::new_v4(),
        id_pegawai: None,
        id_role: Uuid::new_v4(),
        id_bidang: None,
        id_cabang: None,
        username: username.to_string(),
        password: hash_password(password, TEST_BCRYPT_COST).expect("hash"),
        nama: username.to_uppercase(),
        email: None,
        active: true,
        is_deleted: false,
        created_at: Utc::now(),
        created_by: None,
        updated_at: None,
        updated_by: None,
        deleted_at: None,
        deleted_by: None,
    }
}

pub fn menu_user(id_role: Uuid, urutan: i32) -> MenuUser {
    MenuUser {
        id: Uuid::new_v4(),
        id_role,
        id_menu: Uuid::new_v4(),
        urutan,
        level: 0,
        parent_id: None,
        posisi: "sidebar".to_string(),
    }
}

/// A three-day trip, 2 to 4 January 2024
pub fn bpd_request() -> BpdRequest {
    BpdRequest {
        id_pegawai: Uuid::new_v4(),
        id_bidang: Uuid::new_v4(),
        id_cabang: None,
        id_jenis_perjalanan: None,
        maksud: "Koordinasi anggaran".to_string(),
        tujuan: "Kantor Pusat".to_string(),
        kota_asal: Some("Bandung".to_string()),
        kota_tujuan: Some("Jakarta".to_string()),
        tanggal_berangkat: NaiveDate::from_ymd_opt(2024, 1, 2).expect("date"),
        tanggal_kembali: NaiveDate::from_ymd_opt(2024, 1, 4).expect("date"),
        keterangan: None,
    }
}

fn page<T>(items: Vec<T>, filter: &FilterData) -> Page<T> {
    let total = items.len() as i64;
    Page::new(items, total, filter)
}

// ---- audit ----

#[derive(Default)]
pub struct FakeAuditRepository {
    log_system: Mutex<Vec<NewLogSystem>>,
    login_activity: Mutex<Vec<NewLoginActivity>>,
    fail_log_system: Mutex<bool>,
}

impl FakeAuditRepository {
    pub fn fail_log_system(&self, fail: bool) {
        *self.fail_log_system.lock().unwrap() = fail;
    }

    pub fn log_system(&self) -> Vec<NewLogSystem> {
        self.log_system.lock().unwrap().clone()
    }

    pub fn login_activity(&self) -> Vec<NewLoginActivity> {
        self.login_activity.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn insert_log_system(&self, entry: NewLogSystem) -> Result<(), DatabaseError> {
        if *self.fail_log_system.lock().unwrap() {
            return Err(DatabaseError::QueryError("log_system unavailable".to_string()));
        }
        self.log_system.lock().unwrap().push(entry);
        Ok(())
    }

    async fn insert_login_activity(&self, entry: NewLoginActivity) -> Result<(), DatabaseError> {
        self.login_activity.lock().unwrap().push(entry);
        Ok(())
    }

    async fn list_log_system(&self, filter: FilterData) -> Result<Page<LogSystem>, DatabaseError> {
        let rows = self
            .log_system()
            .into_iter()
            .map(|e| LogSystem {
                id: Uuid::new_v4(),
                id_user: e.id_user,
                username: e.username,
                modul: e.modul,
                aksi: e.aksi,
                keterangan: e.keterangan,
                ip: e.ip,
                user_agent: e.user_agent,
                created_at: Utc::now(),
            })
            .collect();
        Ok(page(rows, &filter))
    }

    async fn list_login_activity(&self, filter: FilterData) -> Result<Page<LoginActivity>, DatabaseError> {
        let rows = self
            .login_activity()
            .into_iter()
            .map(|e| LoginActivity {
                id: Uuid::new_v4(),
                id_user: e.id_user,
                username: e.username,
                status: e.status.as_str().to_string(),
                message_code: e.message_code.to_string(),
                ip: e.ip,
                user_agent: e.user_agent,
                created_at: Utc::now(),
            })
            .collect();
        Ok(page(rows, &filter))
    }
}

// ---- users ----

#[derive(Default)]
pub struct FakeUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl FakeUserRepository {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn list(&self, filter: FilterData) -> Result<Page<User>, DatabaseError> {
        let rows = self.users.lock().unwrap().values().filter(|u| !u.is_deleted).cloned().collect();
        Ok(page(rows, &filter))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.get(id))
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.username == username && u.active && !u.is_deleted).cloned())
    }

    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> Result<bool, DatabaseError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().any(|u| u.username == username && Some(u.id) != except))
    }

    async fn create(&self, user: NewUser, actor: Uuid) -> Result<User, DatabaseError> {
        let created = User {
            id: Uuid::new_v4(),
            id_pegawai: user.id_pegawai,
            id_role: user.id_role,
            id_bidang: user.id_bidang,
            id_cabang: user.id_cabang,
            username: user.username,
            password: user.password_hash,
            nama: user.nama,
            email: user.email,
            active: user.active,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: Some(actor),
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
        };
        self.insert(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: UserChanges, actor: Uuid) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(&id).filter(|u| !u.is_deleted) else {
            return Ok(None);
        };
        user.id_pegawai = changes.id_pegawai;
        user.id_role = changes.id_role;
        user.id_bidang = changes.id_bidang;
        user.id_cabang = changes.id_cabang;
        user.username = changes.username;
        user.nama = changes.nama;
        user.email = changes.email;
        user.active = changes.active;
        user.updated_at = Some(Utc::now());
        user.updated_by = Some(actor);
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str, actor: Uuid) -> Result<bool, DatabaseError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(&id).filter(|u| !u.is_deleted) else {
            return Ok(false);
        };
        user.password = password_hash.to_string();
        user.updated_by = Some(actor);
        Ok(true)
    }

    async fn soft_delete(&self, id: Uuid, renamed_to: &str, actor: Uuid) -> Result<bool, DatabaseError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(&id).filter(|u| !u.is_deleted) else {
            return Ok(false);
        };
        user.is_deleted = true;
        user.active = false;
        user.username = renamed_to.to_string();
        user.deleted_at = Some(Utc::now());
        user.deleted_by = Some(actor);
        Ok(true)
    }
}

// ---- roles ----

#[derive(Default)]
pub struct FakeRoleRepository {
    roles: Mutex<HashMap<Uuid, Role>>,
    grants: Mutex<Vec<MenuUser>>,
}

impl FakeRoleRepository {
    pub fn get(&self, id: Uuid) -> Option<Role> {
        self.roles.lock().unwrap().get(&id).cloned()
    }

    pub fn seed_grants(&self, id_role: Uuid, menus: Vec<Uuid>) {
        let mut grants = self.grants.lock().unwrap();
        for (i, id_menu) in menus.into_iter().enumerate() {
            grants.push(MenuUser { id_menu, ..menu_user(id_role, i as i32 + 1) });
        }
    }

    pub fn grants(&self, id_role: Uuid) -> Vec<MenuUser> {
        self.grants.lock().unwrap().iter().filter(|g| g.id_role == id_role).cloned().collect()
    }

    fn role(id: Uuid, role: NewRole, actor: Uuid) -> Role {
        Role {
            id,
            nama: role.nama,
            keterangan: role.keterangan,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: Some(actor),
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list(&self, filter: FilterData) -> Result<Page<Role>, DatabaseError> {
        let rows = self.roles.lock().unwrap().values().filter(|r| !r.is_deleted).cloned().collect();
        Ok(page(rows, &filter))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, DatabaseError> {
        Ok(self.get(id).filter(|r| !r.is_deleted))
    }

    async fn create(&self, role: NewRole, actor: Uuid) -> Result<Role, DatabaseError> {
        let created = Self::role(Uuid::new_v4(), role, actor);
        self.roles.lock().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, role: NewRole, actor: Uuid) -> Result<Option<Role>, DatabaseError> {
        let mut roles = self.roles.lock().unwrap();
        let Some(existing) = roles.get_mut(&id).filter(|r| !r.is_deleted) else {
            return Ok(None);
        };
        existing.nama = role.nama;
        existing.keterangan = role.keterangan;
        existing.updated_by = Some(actor);
        Ok(Some(existing.clone()))
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError> {
        let mut roles = self.roles.lock().unwrap();
        let Some(existing) = roles.get_mut(&id).filter(|r| !r.is_deleted) else {
            return Ok(false);
        };
        existing.is_deleted = true;
        existing.deleted_by = Some(actor);
        Ok(true)
    }

    async fn menus(&self, id_role: Uuid) -> Result<Vec<RoleMenu>, DatabaseError> {
        Ok(self
            .grants(id_role)
            .into_iter()
            .map(|g| RoleMenu {
                id: g.id,
                id_role: g.id_role,
                id_menu: g.id_menu,
                nama: g.id_menu.to_string(),
                link: None,
                icon: None,
                urutan: g.urutan,
                level: g.level,
                parent_id: g.parent_id,
                posisi: g.posisi,
            })
            .collect())
    }

    async fn replace_menus(
        &self,
        id_role: Uuid,
        role: NewRole,
        grants: Vec<NewMenuUser>,
        actor: Uuid,
    ) -> Result<Role, DatabaseError> {
        if grants.is_empty() {
            return Err(DatabaseError::QueryError("empty menu set".to_string()));
        }
        let saved = Self::role(id_role, role, actor);
        self.roles.lock().unwrap().insert(id_role, saved.clone());

        let mut stored = self.grants.lock().unwrap();
        stored.retain(|g| g.id_role != id_role);
        stored.extend(grants.into_iter().map(|g| MenuUser {
            id: Uuid::new_v4(),
            id_role,
            id_menu: g.id_menu,
            urutan: g.urutan,
            level: g.level,
            parent_id: g.parent_id,
            posisi: g.posisi,
        }));
        Ok(saved)
    }
}

// ---- menus ----

#[derive(Default)]
pub struct FakeMenuRepository {
    menus: Mutex<HashMap<Uuid, Menu>>,
    grants: Mutex<Vec<MenuUser>>,
}

impl FakeMenuRepository {
    pub fn seed(&self, rows: Vec<MenuUser>) {
        self.grants.lock().unwrap().extend(rows);
    }

    pub fn urutan_by_id(&self) -> BTreeMap<Uuid, i32> {
        self.grants.lock().unwrap().iter().map(|g| (g.id, g.urutan)).collect()
    }
}

#[async_trait]
impl MenuRepository for FakeMenuRepository {
    async fn list(&self, filter: FilterData) -> Result<Page<Menu>, DatabaseError> {
        let rows = self.menus.lock().unwrap().values().filter(|m| !m.is_deleted).cloned().collect();
        Ok(page(rows, &filter))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Menu>, DatabaseError> {
        Ok(self.menus.lock().unwrap().get(&id).filter(|m| !m.is_deleted).cloned())
    }

    async fn create(&self, menu: NewMenu, actor: Uuid) -> Result<Menu, DatabaseError> {
        let created = Menu {
            id: Uuid::new_v4(),
            nama: menu.nama,
            link: menu.link,
            icon: menu.icon,
            keterangan: menu.keterangan,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: Some(actor),
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
        };
        self.menus.lock().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, menu: NewMenu, actor: Uuid) -> Result<Option<Menu>, DatabaseError> {
        let mut menus = self.menus.lock().unwrap();
        let Some(existing) = menus.get_mut(&id).filter(|m| !m.is_deleted) else {
            return Ok(None);
        };
        existing.nama = menu.nama;
        existing.link = menu.link;
        existing.icon = menu.icon;
        existing.keterangan = menu.keterangan;
        existing.updated_by = Some(actor);
        Ok(Some(existing.clone()))
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError> {
        let mut menus = self.menus.lock().unwrap();
        let Some(existing) = menus.get_mut(&id).filter(|m| !m.is_deleted) else {
            return Ok(false);
        };
        existing.is_deleted = true;
        existing.deleted_by = Some(actor);
        Ok(true)
    }

    async fn swap_order(&self, id_menu_user: Uuid, direction: SortDirection) -> Result<SwapOutcome, DatabaseError> {
        let mut grants = self.grants.lock().unwrap();
        let Some(target) = grants.iter().find(|g| g.id == id_menu_user).cloned() else {
            return Ok(SwapOutcome::MissingRow);
        };
        let Some(other) = neighbour(&target, &grants, direction).cloned() else {
            return Ok(SwapOutcome::NoNeighbour);
        };

        for row in grants.iter_mut() {
            if row.id == target.id {
                row.urutan = other.urutan;
            } else if row.id == other.id {
                row.urutan = target.urutan;
            }
        }
        Ok(SwapOutcome::Swapped {
            target: MenuUser { urutan: other.urutan, ..target.clone() },
            neighbour: MenuUser { urutan: target.urutan, ..other },
        })
    }

    async fn navigation(&self, id_role: Uuid) -> Result<Vec<RoleMenu>, DatabaseError> {
        let grants = self.grants.lock().unwrap();
        Ok(grants
            .iter()
            .filter(|g| g.id_role == id_role)
            .map(|g| RoleMenu {
                id: g.id,
                id_role: g.id_role,
                id_menu: g.id_menu,
                nama: g.id_menu.to_string(),
                link: None,
                icon: None,
                urutan: g.urutan,
                level: g.level,
                parent_id: g.parent_id,
                posisi: g.posisi.clone(),
            })
            .collect())
    }
}

// ---- dashboard & reports ----

#[derive(Default)]
pub struct FakeDashboardRepository {
    pub summary: Option<Value>,
    pub monthly: Vec<Value>,
}

#[async_trait]
impl DashboardRepository for FakeDashboardRepository {
    async fn summary(&self, _tahun: i32, _id_bidang: Option<Uuid>) -> Result<Option<Value>, DatabaseError> {
        Ok(self.summary.clone())
    }

    async fn monthly(&self, _tahun: i32, _id_bidang: Option<Uuid>) -> Result<Vec<Value>, DatabaseError> {
        Ok(self.monthly.clone())
    }
}

#[derive(Default)]
pub struct FakeReportRepository {
    pub rows: Vec<Value>,
}

#[async_trait]
impl ReportRepository for FakeReportRepository {
    async fn rekap(&self, _kind: ReportKind, _params: &ReportParams) -> Result<Vec<Value>, DatabaseError> {
        Ok(self.rows.clone())
    }
}

// ---- master ----

/// Rows keyed by (table, id); each row is the JSON object `to_jsonb` would return
#[derive(Default)]
pub struct FakeMasterRepository {
    rows: Mutex<HashMap<(&'static str, Uuid), Value>>,
}

impl FakeMasterRepository {
    pub fn seed(&self, key: &str, mut row: Value) -> Uuid {
        let entity = find_entity(key).expect("registered entity");
        let id = Uuid::new_v4();
        row["id"] = json!(id);
        row["is_deleted"] = json!(false);
        self.rows.lock().unwrap().insert((entity.table, id), row);
        id
    }

    /// Live (not soft-deleted) rows across all tables
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().values().filter(|r| r["is_deleted"] == json!(false)).count()
    }
}

#[async_trait]
impl MasterRepository for FakeMasterRepository {
    async fn list(&self, entity: &'static MasterEntity, filter: FilterData) -> Result<Page<Value>, DatabaseError> {
        let rows = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|((table, _), row)| *table == entity.table && row["is_deleted"] == json!(false))
            .map(|(_, row)| row.clone())
            .collect();
        Ok(page(rows, &filter))
    }

    async fn find_by_id(&self, entity: &'static MasterEntity, id: Uuid) -> Result<Option<Value>, DatabaseError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&(entity.table, id)).filter(|row| row["is_deleted"] == json!(false)).cloned())
    }

    async fn insert(
        &self,
        entity: &'static MasterEntity,
        payload: MasterPayload,
        actor: Uuid,
    ) -> Result<Value, DatabaseError> {
        let id = Uuid::new_v4();
        let mut row = payload.to_map();
        row.insert("id".to_string(), json!(id));
        row.insert("is_deleted".to_string(), json!(false));
        row.insert("created_by".to_string(), json!(actor));
        let row = Value::Object(row);
        self.rows.lock().unwrap().insert((entity.table, id), row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        entity: &'static MasterEntity,
        id: Uuid,
        payload: MasterPayload,
        actor: Uuid,
    ) -> Result<Option<Value>, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&(entity.table, id)).filter(|row| row["is_deleted"] == json!(false)) else {
            return Ok(None);
        };
        for (key, value) in payload.to_map() {
            row[key.as_str()] = value;
        }
        row["updated_by"] = json!(actor);
        Ok(Some(row.clone()))
    }

    async fn soft_delete(&self, entity: &'static MasterEntity, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&(entity.table, id)).filter(|row| row["is_deleted"] == json!(false)) else {
            return Ok(false);
        };
        row["is_deleted"] = json!(true);
        row["deleted_by"] = json!(actor);
        Ok(true)
    }
}

// ---- perjalanan dinas ----

#[derive(Default)]
pub struct FakeBpdRepository {
    trips: Mutex<HashMap<Uuid, PerjalananDinas>>,
    biaya: Mutex<Vec<Biaya>>,
    kendaraan: Mutex<Vec<Kendaraan>>,
    dokumen: Mutex<Vec<Dokumen>>,
    histori: Mutex<Vec<Histori>>,
    /// Status another writer sets just before the next transition or child write of a trip
    interleaved: Mutex<HashMap<Uuid, StatusBpd>>,
}

impl FakeBpdRepository {
    pub fn move_status_before_next_write(&self, id: Uuid, status: StatusBpd) {
        self.interleaved.lock().unwrap().insert(id, status);
    }

    /// Apply any interleaved status, then report whether child rows may change
    fn lock_editable_trip(&self, id: Uuid) -> bool {
        let mut trips = self.trips.lock().unwrap();
        let Some(trip) = trips.get_mut(&id).filter(|t| !t.is_deleted) else {
            return false;
        };
        if let Some(moved) = self.interleaved.lock().unwrap().remove(&id) {
            trip.status = moved.code();
        }
        trip.status().map_or(false, StatusBpd::is_editable)
    }

    fn push_histori(&self, id: Uuid, from: Option<StatusBpd>, to: StatusBpd, aksi: &str, catatan: Option<String>, actor: &Actor) {
        self.histori.lock().unwrap().push(Histori {
            id: Uuid::new_v4(),
            id_perjalanan_dinas: id,
            status_dari: from.map(StatusBpd::code),
            status_ke: to.code(),
            aksi: aksi.to_string(),
            catatan,
            id_user: actor.id_user,
            username: actor.username.clone(),
            created_at: Utc::now(),
        });
    }
}

#[async_trait]
impl BpdRepository for FakeBpdRepository {
    async fn list_sppd(
        &self,
        _id_bidang: Option<Uuid>,
        _tahun: Option<i32>,
        filter: FilterData,
    ) -> Result<Page<Value>, DatabaseError> {
        let trips = self.trips.lock().unwrap();
        let rows = trips.values().filter(|t| !t.is_deleted).map(|t| json!(t)).collect();
        Ok(page(rows, &filter))
    }

    async fn list_selesai(
        &self,
        _id_bidang: Option<Uuid>,
        _tahun: Option<i32>,
        filter: FilterData,
    ) -> Result<Page<Value>, DatabaseError> {
        let trips = self.trips.lock().unwrap();
        let rows = trips
            .values()
            .filter(|t| !t.is_deleted && t.status() == Some(StatusBpd::Selesai))
            .map(|t| json!(t))
            .collect();
        Ok(page(rows, &filter))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PerjalananDinas>, DatabaseError> {
        Ok(self.trips.lock().unwrap().get(&id).filter(|t| !t.is_deleted).cloned())
    }

    async fn create(&self, trip: NewPerjalananDinas, actor: &Actor) -> Result<PerjalananDinas, DatabaseError> {
        let mut trips = self.trips.lock().unwrap();
        let created = PerjalananDinas {
            id: Uuid::new_v4(),
            nomor_sppd: format!("{:03}/SPPD/2024", trips.len() + 1),
            id_pegawai: trip.id_pegawai,
            id_bidang: trip.id_bidang,
            id_cabang: trip.id_cabang,
            id_jenis_perjalanan: trip.id_jenis_perjalanan,
            lama_hari: trip.lama_hari(),
            maksud: trip.maksud,
            tujuan: trip.tujuan,
            kota_asal: trip.kota_asal,
            kota_tujuan: trip.kota_tujuan,
            tanggal_berangkat: trip.tanggal_berangkat,
            tanggal_kembali: trip.tanggal_kembali,
            status: StatusBpd::Draft.code(),
            keterangan: trip.keterangan,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: Some(actor.id_user),
            updated_at: None,
            updated_by: None,
            deleted_at: None,
            deleted_by: None,
        };
        trips.insert(created.id, created.clone());
        drop(trips);

        self.push_histori(created.id, None, StatusBpd::Draft, "buat", None, actor);
        Ok(created)
    }

    async fn update(
        &self,
        id: Uuid,
        trip: NewPerjalananDinas,
        actor: Uuid,
    ) -> Result<Option<PerjalananDinas>, DatabaseError> {
        let mut trips = self.trips.lock().unwrap();
        let Some(existing) = trips
            .get_mut(&id)
            .filter(|t| !t.is_deleted && t.status().map_or(false, StatusBpd::is_editable))
        else {
            return Ok(None);
        };
        existing.lama_hari = trip.lama_hari();
        existing.id_pegawai = trip.id_pegawai;
        existing.id_bidang = trip.id_bidang;
        existing.id_cabang = trip.id_cabang;
        existing.id_jenis_perjalanan = trip.id_jenis_perjalanan;
        existing.maksud = trip.maksud;
        existing.tujuan = trip.tujuan;
        existing.kota_asal = trip.kota_asal;
        existing.kota_tujuan = trip.kota_tujuan;
        existing.tanggal_berangkat = trip.tanggal_berangkat;
        existing.tanggal_kembali = trip.tanggal_kembali;
        existing.keterangan = trip.keterangan;
        existing.updated_by = Some(actor);
        Ok(Some(existing.clone()))
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError> {
        let mut trips = self.trips.lock().unwrap();
        let Some(existing) = trips
            .get_mut(&id)
            .filter(|t| !t.is_deleted && t.status() == Some(StatusBpd::Draft))
        else {
            return Ok(false);
        };
        existing.is_deleted = true;
        existing.deleted_by = Some(actor);
        Ok(true)
    }

    async fn transition(
        &self,
        id: Uuid,
        from: StatusBpd,
        to: StatusBpd,
        aksi: &str,
        catatan: Option<String>,
        actor: &Actor,
    ) -> Result<Option<PerjalananDinas>, DatabaseError> {
        let mut trips = self.trips.lock().unwrap();
        let Some(trip) = trips.get_mut(&id).filter(|t| !t.is_deleted) else {
            return Ok(None);
        };
        if let Some(moved) = self.interleaved.lock().unwrap().remove(&id) {
            trip.status = moved.code();
        }
        if trip.status != from.code() {
            return Ok(None);
        }
        trip.status = to.code();
        trip.updated_by = Some(actor.id_user);
        let updated = trip.clone();
        drop(trips);

        self.push_histori(id, Some(from), to, aksi, catatan, actor);
        Ok(Some(updated))
    }

    async fn list_biaya(&self, id: Uuid) -> Result<Vec<Biaya>, DatabaseError> {
        let rows = self.biaya.lock().unwrap();
        Ok(rows.iter().filter(|b| b.id_perjalanan_dinas == id && !b.is_deleted).cloned().collect())
    }

    async fn add_biaya(&self, id: Uuid, biaya: NewBiaya, actor: Uuid) -> Result<ChildWrite<Biaya>, DatabaseError> {
        if !self.lock_editable_trip(id) {
            return Ok(ChildWrite::Locked);
        }
        let row = Biaya {
            id: Uuid::new_v4(),
            id_perjalanan_dinas: id,
            id_jenis_biaya: biaya.id_jenis_biaya,
            total: biaya.total,
            uraian: biaya.uraian,
            jumlah: biaya.jumlah,
            nominal: biaya.nominal,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: Some(actor),
            updated_at: None,
            updated_by: None,
        };
        self.biaya.lock().unwrap().push(row.clone());
        Ok(ChildWrite::Written(row))
    }

    async fn update_biaya(
        &self,
        id: Uuid,
        biaya_id: Uuid,
        biaya: NewBiaya,
        actor: Uuid,
    ) -> Result<ChildWrite<Biaya>, DatabaseError> {
        if !self.lock_editable_trip(id) {
            return Ok(ChildWrite::Locked);
        }
        let mut rows = self.biaya.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|b| b.id == biaya_id && b.id_perjalanan_dinas == id && !b.is_deleted)
        else {
            return Ok(ChildWrite::Missing);
        };
        row.total = biaya.total;
        row.id_jenis_biaya = biaya.id_jenis_biaya;
        row.uraian = biaya.uraian;
        row.jumlah = biaya.jumlah;
        row.nominal = biaya.nominal;
        row.updated_by = Some(actor);
        Ok(ChildWrite::Written(row.clone()))
    }

    async fn delete_biaya(&self, id: Uuid, biaya_id: Uuid, _actor: Uuid) -> Result<ChildWrite<()>, DatabaseError> {
        if !self.lock_editable_trip(id) {
            return Ok(ChildWrite::Locked);
        }
        let mut rows = self.biaya.lock().unwrap();
        match rows.iter_mut().find(|b| b.id == biaya_id && b.id_perjalanan_dinas == id && !b.is_deleted) {
            Some(row) => {
                row.is_deleted = true;
                Ok(ChildWrite::Written(()))
            }
            None => Ok(ChildWrite::Missing),
        }
    }

    async fn list_kendaraan(&self, id: Uuid) -> Result<Vec<Kendaraan>, DatabaseError> {
        let rows = self.kendaraan.lock().unwrap();
        Ok(rows.iter().filter(|k| k.id_perjalanan_dinas == id && !k.is_deleted).cloned().collect())
    }

    async fn add_kendaraan(&self, id: Uuid, kendaraan: NewKendaraan, actor: Uuid) -> Result<ChildWrite<Kendaraan>, DatabaseError> {
        if !self.lock_editable_trip(id) {
            return Ok(ChildWrite::Locked);
        }
        let row = Kendaraan {
            id: Uuid::new_v4(),
            id_perjalanan_dinas: id,
            id_jenis_kendaraan: kendaraan.id_jenis_kendaraan,
            nomor_polisi: kendaraan.nomor_polisi,
            keterangan: kendaraan.keterangan,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: Some(actor),
            updated_at: None,
            updated_by: None,
        };
        self.kendaraan.lock().unwrap().push(row.clone());
        Ok(ChildWrite::Written(row))
    }

    async fn update_kendaraan(
        &self,
        id: Uuid,
        kendaraan_id: Uuid,
        kendaraan: NewKendaraan,
        actor: Uuid,
    ) -> Result<ChildWrite<Kendaraan>, DatabaseError> {
        if !self.lock_editable_trip(id) {
            return Ok(ChildWrite::Locked);
        }
        let mut rows = self.kendaraan.lock().unwrap();
        let Some(row) =
            rows.iter_mut().find(|k| k.id == kendaraan_id && k.id_perjalanan_dinas == id && !k.is_deleted)
        else {
            return Ok(ChildWrite::Missing);
        };
        row.id_jenis_kendaraan = kendaraan.id_jenis_kendaraan;
        row.nomor_polisi = kendaraan.nomor_polisi;
        row.keterangan = kendaraan.keterangan;
        row.updated_by = Some(actor);
        Ok(ChildWrite::Written(row.clone()))
    }

    async fn delete_kendaraan(&self, id: Uuid, kendaraan_id: Uuid, _actor: Uuid) -> Result<ChildWrite<()>, DatabaseError> {
        if !self.lock_editable_trip(id) {
            return Ok(ChildWrite::Locked);
        }
        let mut rows = self.kendaraan.lock().unwrap();
        match rows.iter_mut().find(|k| k.id == kendaraan_id && k.id_perjalanan_dinas == id && !k.is_deleted) {
            Some(row) => {
                row.is_deleted = true;
                Ok(ChildWrite::Written(()))
            }
            None => Ok(ChildWrite::Missing),
        }
    }

    async fn list_dokumen(&self, id: Uuid) -> Result<Vec<Dokumen>, DatabaseError> {
        let rows = self.dokumen.lock().unwrap();
        Ok(rows.iter().filter(|d| d.id_perjalanan_dinas == id && !d.is_deleted).cloned().collect())
    }

    async fn add_dokumen(&self, id: Uuid, dokumen: NewDokumen, actor: Uuid) -> Result<ChildWrite<Dokumen>, DatabaseError> {
        if !self.lock_editable_trip(id) {
            return Ok(ChildWrite::Locked);
        }
        let row = Dokumen {
            id: Uuid::new_v4(),
            id_perjalanan_dinas: id,
            id_jenis_dokumen: dokumen.id_jenis_dokumen,
            nama_file: dokumen.nama_file,
            path: dokumen.path,
            keterangan: dokumen.keterangan,
            is_deleted: false,
            created_at: Utc::now(),
            created_by: Some(actor),
            updated_at: None,
            updated_by: None,
        };
        self.dokumen.lock().unwrap().push(row.clone());
        Ok(ChildWrite::Written(row))
    }

    async fn update_dokumen(
        &self,
        id: Uuid,
        dokumen_id: Uuid,
        dokumen: NewDokumen,
        actor: Uuid,
    ) -> Result<ChildWrite<Dokumen>, DatabaseError> {
        if !self.lock_editable_trip(id) {
            return Ok(ChildWrite::Locked);
        }
        let mut rows = self.dokumen.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|d| d.id == dokumen_id && d.id_perjalanan_dinas == id && !d.is_deleted)
        else {
            return Ok(ChildWrite::Missing);
        };
        row.id_jenis_dokumen = dokumen.id_jenis_dokumen;
        row.nama_file = dokumen.nama_file;
        row.path = dokumen.path;
        row.keterangan = dokumen.keterangan;
        row.updated_by = Some(actor);
        Ok(ChildWrite::Written(row.clone()))
    }

    async fn delete_dokumen(&self, id: Uuid, dokumen_id: Uuid, _actor: Uuid) -> Result<ChildWrite<()>, DatabaseError> {
        if !self.lock_editable_trip(id) {
            return Ok(ChildWrite::Locked);
        }
        let mut rows = self.dokumen.lock().unwrap();
        match rows.iter_mut().find(|d| d.id == dokumen_id && d.id_perjalanan_dinas == id && !d.is_deleted) {
            Some(row) => {
                row.is_deleted = true;
                Ok(ChildWrite::Written(()))
            }
            None => Ok(ChildWrite::Missing),
        }
    }

    async fn histori(&self, id: Uuid) -> Result<Vec<Histori>, DatabaseError> {
        let rows = self.histori.lock().unwrap();
        Ok(rows.iter().filter(|h| h.id_perjalanan_dinas == id).cloned().collect())
    }
}
