use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{ColumnSpec, ColumnType};

/// Lifecycle code stored in `perjalanan_dinas.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBpd {
    Draft,
    Diajukan,
    Revisi,
    Disetujui,
    Ditolak,
    Selesai,
}

impl StatusBpd {
    pub fn code(self) -> i16 {
        match self {
            StatusBpd::Draft => 0,
            StatusBpd::Diajukan => 1,
            StatusBpd::Revisi => 2,
            StatusBpd::Disetujui => 3,
            StatusBpd::Ditolak => 4,
            StatusBpd::Selesai => 5,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Some(match code {
            0 => StatusBpd::Draft,
            1 => StatusBpd::Diajukan,
            2 => StatusBpd::Revisi,
            3 => StatusBpd::Disetujui,
            4 => StatusBpd::Ditolak,
            5 => StatusBpd::Selesai,
            _ => return None,
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusBpd::Draft => "Draft",
            StatusBpd::Diajukan => "Diajukan",
            StatusBpd::Revisi => "Revisi",
            StatusBpd::Disetujui => "Disetujui",
            StatusBpd::Ditolak => "Ditolak",
            StatusBpd::Selesai => "Selesai",
        }
    }

    /// Header, costs, vehicles and documents may change
    pub fn is_editable(self) -> bool {
        matches!(self, StatusBpd::Draft | StatusBpd::Revisi)
    }

    pub fn is_deletable(self) -> bool {
        self == StatusBpd::Draft
    }
}

/// Approval action applied through `POST /v1/bpd/:id/:action`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BpdAction {
    Ajukan,
    Setujui,
    Revisi,
    Tolak,
    Selesaikan,
}

impl BpdAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BpdAction::Ajukan => "ajukan",
            BpdAction::Setujui => "setujui",
            BpdAction::Revisi => "revisi",
            BpdAction::Tolak => "tolak",
            BpdAction::Selesaikan => "selesaikan",
        }
    }

    /// Target status when the action is allowed from `from`
    pub fn apply(self, from: StatusBpd) -> Option<StatusBpd> {
        use StatusBpd::*;
        match (self, from) {
            (BpdAction::Ajukan, Draft | Revisi) => Some(Diajukan),
            (BpdAction::Setujui, Diajukan) => Some(Disetujui),
            (BpdAction::Revisi, Diajukan) => Some(Revisi),
            (BpdAction::Tolak, Diajukan) => Some(Ditolak),
            (BpdAction::Selesaikan, Disetujui) => Some(Selesai),
            _ => None,
        }
    }

    /// Rejections and returns must say why
    pub fn requires_catatan(self) -> bool {
        matches!(self, BpdAction::Revisi | BpdAction::Tolak)
    }
}

impl std::str::FromStr for BpdAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ajukan" => Ok(BpdAction::Ajukan),
            "setujui" => Ok(BpdAction::Setujui),
            "revisi" => Ok(BpdAction::Revisi),
            "tolak" => Ok(BpdAction::Tolak),
            "selesaikan" => Ok(BpdAction::Selesaikan),
            other => Err(format!("Aksi tidak dikenal: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PerjalananDinas {
    pub id: Uuid,
    pub nomor_sppd: String,
    pub id_pegawai: Uuid,
    pub id_bidang: Uuid,
    pub id_cabang: Option<Uuid>,
    pub id_jenis_perjalanan: Option<Uuid>,
    pub maksud: String,
    pub tujuan: String,
    pub kota_asal: Option<String>,
    pub kota_tujuan: Option<String>,
    pub tanggal_berangkat: NaiveDate,
    pub tanggal_kembali: NaiveDate,
    pub lama_hari: i32,
    pub status: i16,
    pub keterangan: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl PerjalananDinas {
    pub fn status(&self) -> Option<StatusBpd> {
        StatusBpd::from_code(self.status)
    }
}

/// Header fields written on create and update; `nomor_sppd` and `status` are server-owned
#[derive(Debug, Clone)]
pub struct NewPerjalananDinas {
    pub id_pegawai: Uuid,
    pub id_bidang: Uuid,
    pub id_cabang: Option<Uuid>,
    pub id_jenis_perjalanan: Option<Uuid>,
    pub maksud: String,
    pub tujuan: String,
    pub kota_asal: Option<String>,
    pub kota_tujuan: Option<String>,
    pub tanggal_berangkat: NaiveDate,
    pub tanggal_kembali: NaiveDate,
    pub keterangan: Option<String>,
}

impl NewPerjalananDinas {
    /// Inclusive day count of the trip
    pub fn lama_hari(&self) -> i32 {
        (self.tanggal_kembali - self.tanggal_berangkat).num_days() as i32 + 1
    }
}

/// Filterable columns of the rows returned by `fn_list_sppd` and `fn_list_bpd_selesai`
pub const SPPD_LIST_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("id", ColumnType::Uuid),
    ColumnSpec::new("nomor_sppd", ColumnType::Text),
    ColumnSpec::new("nama_pegawai", ColumnType::Text),
    ColumnSpec::new("nama_bidang", ColumnType::Text),
    ColumnSpec::new("maksud", ColumnType::Text),
    ColumnSpec::new("tujuan", ColumnType::Text),
    ColumnSpec::new("status", ColumnType::SmallInt),
    ColumnSpec::new("tanggal_berangkat", ColumnType::Date),
    ColumnSpec::new("tanggal_kembali", ColumnType::Date),
    ColumnSpec::new("total_biaya", ColumnType::Decimal),
    ColumnSpec::new("created_at", ColumnType::Timestamp),
];

pub const SPPD_SEARCH_COLUMNS: &[&str] = &["nomor_sppd", "nama_pegawai", "maksud", "tujuan"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Biaya {
    pub id: Uuid,
    pub id_perjalanan_dinas: Uuid,
    pub id_jenis_biaya: Uuid,
    pub uraian: String,
    pub jumlah: Decimal,
    pub nominal: Decimal,
    pub total: Decimal,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewBiaya {
    pub id_jenis_biaya: Uuid,
    pub uraian: String,
    pub jumlah: Decimal,
    pub nominal: Decimal,
    pub total: Decimal,
}

impl NewBiaya {
    /// `None` when `jumlah * nominal` does not fit a decimal
    pub fn new(id_jenis_biaya: Uuid, uraian: String, jumlah: Decimal, nominal: Decimal) -> Option<Self> {
        let total = jumlah.checked_mul(nominal)?;
        Some(Self { id_jenis_biaya, uraian, jumlah, nominal, total })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Kendaraan {
    pub id: Uuid,
    pub id_perjalanan_dinas: Uuid,
    pub id_jenis_kendaraan: Uuid,
    pub nomor_polisi: Option<String>,
    pub keterangan: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewKendaraan {
    pub id_jenis_kendaraan: Uuid,
    pub nomor_polisi: Option<String>,
    pub keterangan: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dokumen {
    pub id: Uuid,
    pub id_perjalanan_dinas: Uuid,
    pub id_jenis_dokumen: Uuid,
    pub nama_file: String,
    pub path: String,
    pub keterangan: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewDokumen {
    pub id_jenis_dokumen: Uuid,
    pub nama_file: String,
    pub path: String,
    pub keterangan: Option<String>,
}

/// Append-only approval trail (`pengajuan_bpd_histori`)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Histori {
    pub id: Uuid,
    pub id_perjalanan_dinas: Uuid,
    pub status_dari: Option<i16>,
    pub status_ke: i16,
    pub aksi: String,
    pub catatan: Option<String>,
    pub id_user: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_lifecycle() {
        use StatusBpd::*;
        assert_eq!(BpdAction::Ajukan.apply(Draft), Some(Diajukan));
        assert_eq!(BpdAction::Ajukan.apply(Revisi), Some(Diajukan));
        assert_eq!(BpdAction::Ajukan.apply(Diajukan), None);
        assert_eq!(BpdAction::Setujui.apply(Diajukan), Some(Disetujui));
        assert_eq!(BpdAction::Revisi.apply(Diajukan), Some(Revisi));
        assert_eq!(BpdAction::Tolak.apply(Diajukan), Some(Ditolak));
        assert_eq!(BpdAction::Tolak.apply(Disetujui), None);
        assert_eq!(BpdAction::Selesaikan.apply(Disetujui), Some(Selesai));
        assert_eq!(BpdAction::Selesaikan.apply(Ditolak), None);
    }

    #[test]
    fn status_codes_round_trip() {
        for code in 0..=5 {
            assert_eq!(StatusBpd::from_code(code).unwrap().code(), code);
        }
        assert!(StatusBpd::from_code(9).is_none());
    }

    #[test]
    fn only_draft_and_revisi_are_editable() {
        assert!(StatusBpd::Draft.is_editable());
        assert!(StatusBpd::Revisi.is_editable());
        assert!(!StatusBpd::Diajukan.is_editable());
        assert!(StatusBpd::Draft.is_deletable());
        assert!(!StatusBpd::Revisi.is_deletable());
    }

    #[test]
    fn trip_length_is_inclusive() {
        let trip = NewPerjalananDinas {
            id_pegawai: Uuid::nil(),
            id_bidang: Uuid::nil(),
            id_cabang: None,
            id_jenis_perjalanan: None,
            maksud: "Rapat koordinasi".into(),
            tujuan: "Kantor Pusat".into(),
            kota_asal: None,
            kota_tujuan: None,
            tanggal_berangkat: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            tanggal_kembali: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            keterangan: None,
        };
        assert_eq!(trip.lama_hari(), 3);
    }

    #[test]
    fn biaya_total_multiplies() {
        let biaya = NewBiaya::new(Uuid::nil(), "Uang harian".into(), Decimal::from(3), Decimal::new(150_000_50, 2)).unwrap();
        assert_eq!(biaya.total, Decimal::new(450_001_50, 2));
    }

    #[test]
    fn biaya_total_overflow_is_none() {
        let huge = Decimal::from_str_exact("100000000000000000000").unwrap();
        assert!(NewBiaya::new(Uuid::nil(), "Hotel".into(), huge, huge).is_none());
    }
}
