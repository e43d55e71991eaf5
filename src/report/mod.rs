//! Recap reports computed by `fn_rpt_rekap_*` and their spreadsheet rendering.

pub mod workbook;

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

pub use workbook::{SheetLayout, WorkbookError};

/// How a report column is written to the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Text,
    Number,
    Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportColumn {
    pub key: &'static str,
    pub header: &'static str,
    pub kind: CellKind,
    pub width: u16,
}

const fn column(key: &'static str, header: &'static str, kind: CellKind, width: u16) -> ReportColumn {
    ReportColumn { key, header, kind, width }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    RekapBidang,
    RekapPegawai,
    RekapBiaya,
    RekapSppd,
}

const REKAP_BIDANG: &[ReportColumn] = &[
    column("nama_bidang", "Bidang", CellKind::Text, 35),
    column("jumlah_sppd", "Jumlah SPPD", CellKind::Number, 14),
    column("jumlah_pegawai", "Jumlah Pegawai", CellKind::Number, 16),
    column("total_biaya", "Total Biaya", CellKind::Money, 20),
];

const REKAP_PEGAWAI: &[ReportColumn] = &[
    column("nip", "NIP", CellKind::Text, 22),
    column("nama_pegawai", "Nama Pegawai", CellKind::Text, 30),
    column("nama_bidang", "Bidang", CellKind::Text, 30),
    column("jumlah_sppd", "Jumlah SPPD", CellKind::Number, 14),
    column("jumlah_hari", "Jumlah Hari", CellKind::Number, 14),
    column("total_biaya", "Total Biaya", CellKind::Money, 20),
];

const REKAP_BIAYA: &[ReportColumn] = &[
    column("nama_jenis_biaya", "Jenis Biaya", CellKind::Text, 30),
    column("jumlah_item", "Jumlah Item", CellKind::Number, 14),
    column("total_biaya", "Total Biaya", CellKind::Money, 20),
];

const REKAP_SPPD: &[ReportColumn] = &[
    column("nomor_sppd", "Nomor SPPD", CellKind::Text, 24),
    column("nama_pegawai", "Nama Pegawai", CellKind::Text, 30),
    column("tujuan", "Tujuan", CellKind::Text, 30),
    column("tanggal_berangkat", "Berangkat", CellKind::Text, 14),
    column("tanggal_kembali", "Kembali", CellKind::Text, 14),
    column("status", "Status", CellKind::Text, 14),
    column("total_biaya", "Total Biaya", CellKind::Money, 20),
];

impl ReportKind {
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::RekapBidang => "rekap-bidang",
            ReportKind::RekapPegawai => "rekap-pegawai",
            ReportKind::RekapBiaya => "rekap-biaya",
            ReportKind::RekapSppd => "rekap-sppd",
        }
    }

    /// Set-returning function taking `(tgl_awal date, tgl_akhir date, id_bidang uuid)`
    pub fn function(self) -> &'static str {
        match self {
            ReportKind::RekapBidang => "fn_rpt_rekap_bidang",
            ReportKind::RekapPegawai => "fn_rpt_rekap_pegawai",
            ReportKind::RekapBiaya => "fn_rpt_rekap_biaya",
            ReportKind::RekapSppd => "fn_rpt_rekap_sppd",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::RekapBidang => "REKAPITULASI PERJALANAN DINAS PER BIDANG",
            ReportKind::RekapPegawai => "REKAPITULASI PERJALANAN DINAS PER PEGAWAI",
            ReportKind::RekapBiaya => "REKAPITULASI BIAYA PERJALANAN DINAS",
            ReportKind::RekapSppd => "REKAPITULASI SURAT PERINTAH PERJALANAN DINAS",
        }
    }

    pub fn columns(self) -> &'static [ReportColumn] {
        match self {
            ReportKind::RekapBidang => REKAP_BIDANG,
            ReportKind::RekapPegawai => REKAP_PEGAWAI,
            ReportKind::RekapBiaya => REKAP_BIAYA,
            ReportKind::RekapSppd => REKAP_SPPD,
        }
    }

    /// Column summed into the trailing total row
    pub fn total_column(self) -> &'static str {
        "total_biaya"
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rekap-bidang" => Ok(ReportKind::RekapBidang),
            "rekap-pegawai" => Ok(ReportKind::RekapPegawai),
            "rekap-biaya" => Ok(ReportKind::RekapBiaya),
            "rekap-sppd" => Ok(ReportKind::RekapSppd),
            other => Err(format!("Laporan tidak dikenal: {}", other)),
        }
    }
}

/// Checked report filter: the period is never inverted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportParams {
    pub tgl_awal: NaiveDate,
    pub tgl_akhir: NaiveDate,
    pub id_bidang: Option<Uuid>,
}
