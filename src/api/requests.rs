use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::database::models::{NewDokumen, NewKendaraan, NewMenu, NewMenuUser, NewPerjalananDinas, NewRole};

// ---- auth & users ----

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username wajib diisi"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    pub id_pegawai: Option<Uuid>,
    pub id_role: Uuid,
    pub id_bidang: Option<Uuid>,
    pub id_cabang: Option<Uuid>,
    #[validate(length(min = 3, max = 50, message = "Username 3 sampai 50 karakter"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub password: String,
    #[validate(length(min = 1, message = "Nama wajib diisi"))]
    pub nama: String,
    #[validate(email(message = "Email tidak valid"))]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub id_pegawai: Option<Uuid>,
    pub id_role: Uuid,
    pub id_bidang: Option<Uuid>,
    pub id_cabang: Option<Uuid>,
    #[validate(length(min = 3, max = 50, message = "Username 3 sampai 50 karakter"))]
    pub username: String,
    #[validate(length(min = 1, message = "Nama wajib diisi"))]
    pub nama: String,
    #[validate(email(message = "Email tidak valid"))]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Password lama wajib diisi"))]
    pub old_password: String,
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub new_password: String,
}

fn default_true() -> bool {
    true
}

// ---- roles & menus ----

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 100, message = "Nama role wajib diisi"))]
    pub nama: String,
    pub keterangan: Option<String>,
}

impl From<RoleRequest> for NewRole {
    fn from(req: RoleRequest) -> Self {
        NewRole { nama: req.nama.trim().to_string(), keterangan: req.keterangan }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleMenuItem {
    pub id_menu: Uuid,
    #[validate(range(min = 1, message = "Urutan dimulai dari 1"))]
    pub urutan: i32,
    #[validate(range(min = 0, message = "Level tidak boleh negatif"))]
    pub level: i32,
    pub parent_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Posisi wajib diisi"))]
    pub posisi: String,
}

impl From<RoleMenuItem> for NewMenuUser {
    fn from(item: RoleMenuItem) -> Self {
        NewMenuUser {
            id_menu: item.id_menu,
            urutan: item.urutan,
            level: item.level,
            parent_id: item.parent_id,
            posisi: item.posisi,
        }
    }
}

/// Body of `PUT /v1/roles/:id/menus`: the role itself plus its complete menu set
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleMenusRequest {
    #[validate(length(min = 1, max = 100, message = "Nama role wajib diisi"))]
    pub nama: String,
    pub keterangan: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub menus: Vec<RoleMenuItem>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MenuRequest {
    #[validate(length(min = 1, max = 100, message = "Nama menu wajib diisi"))]
    pub nama: String,
    pub link: Option<String>,
    pub icon: Option<String>,
    pub keterangan: Option<String>,
}

impl From<MenuRequest> for NewMenu {
    fn from(req: MenuRequest) -> Self {
        NewMenu { nama: req.nama.trim().to_string(), link: req.link, icon: req.icon, keterangan: req.keterangan }
    }
}

// ---- perjalanan dinas ----

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BpdRequest {
    pub id_pegawai: Uuid,
    pub id_bidang: Uuid,
    pub id_cabang: Option<Uuid>,
    pub id_jenis_perjalanan: Option<Uuid>,
    #[validate(length(min = 1, message = "Maksud perjalanan wajib diisi"))]
    pub maksud: String,
    #[validate(length(min = 1, message = "Tujuan wajib diisi"))]
    pub tujuan: String,
    pub kota_asal: Option<String>,
    pub kota_tujuan: Option<String>,
    pub tanggal_berangkat: NaiveDate,
    pub tanggal_kembali: NaiveDate,
    pub keterangan: Option<String>,
}

impl From<BpdRequest> for NewPerjalananDinas {
    fn from(req: BpdRequest) -> Self {
        NewPerjalananDinas {
            id_pegawai: req.id_pegawai,
            id_bidang: req.id_bidang,
            id_cabang: req.id_cabang,
            id_jenis_perjalanan: req.id_jenis_perjalanan,
            maksud: req.maksud,
            tujuan: req.tujuan,
            kota_asal: req.kota_asal,
            kota_tujuan: req.kota_tujuan,
            tanggal_berangkat: req.tanggal_berangkat,
            tanggal_kembali: req.tanggal_kembali,
            keterangan: req.keterangan,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TransitionRequest {
    #[validate(length(max = 1000, message = "Catatan terlalu panjang"))]
    pub catatan: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BiayaRequest {
    pub id_jenis_biaya: Uuid,
    #[validate(length(min = 1, message = "Uraian wajib diisi"))]
    pub uraian: String,
    pub jumlah: Decimal,
    pub nominal: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct KendaraanRequest {
    pub id_jenis_kendaraan: Uuid,
    #[validate(length(max = 20, message = "Nomor polisi terlalu panjang"))]
    pub nomor_polisi: Option<String>,
    pub keterangan: Option<String>,
}

impl From<KendaraanRequest> for NewKendaraan {
    fn from(req: KendaraanRequest) -> Self {
        NewKendaraan {
            id_jenis_kendaraan: req.id_jenis_kendaraan,
            nomor_polisi: req.nomor_polisi,
            keterangan: req.keterangan,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DokumenRequest {
    pub id_jenis_dokumen: Uuid,
    #[validate(length(min = 1, message = "Nama file wajib diisi"))]
    pub nama_file: String,
    #[validate(length(min = 1, message = "Path wajib diisi"))]
    pub path: String,
    pub keterangan: Option<String>,
}

impl From<DokumenRequest> for NewDokumen {
    fn from(req: DokumenRequest) -> Self {
        NewDokumen {
            id_jenis_dokumen: req.id_jenis_dokumen,
            nama_file: req.nama_file,
            path: req.path,
            keterangan: req.keterangan,
        }
    }
}

// ---- query strings ----

/// `?tahun=&id_bidang=` scope shared by the dashboard and the trip lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeQuery {
    pub tahun: Option<i32>,
    pub id_bidang: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportQuery {
    pub tgl_awal: NaiveDate,
    pub tgl_akhir: NaiveDate,
    pub id_bidang: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_user_defaults_to_active() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "id_role": Uuid::nil(),
            "username": "budi",
            "password": "rahasia1",
            "nama": "Budi"
        }))
        .unwrap();
        assert!(req.active);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn short_password_and_bad_email_are_reported_per_field() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "id_role": Uuid::nil(),
            "username": "budi",
            "password": "123",
            "nama": "Budi",
            "email": "bukan-email"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn nested_menu_items_are_validated() {
        let req: RoleMenusRequest = serde_json::from_value(json!({
            "nama": "Operator",
            "menus": [{ "id_menu": Uuid::nil(), "urutan": 0, "level": 0, "posisi": "sidebar" }]
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }
}
