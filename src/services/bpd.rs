use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::api::{BiayaRequest, BpdRequest, DokumenRequest, KendaraanRequest, ScopeQuery, TransitionRequest};
use crate::database::models::bpd::SPPD_SEARCH_COLUMNS;
use crate::database::models::{
    Biaya, BpdAction, Dokumen, Histori, Kendaraan, NewBiaya, NewPerjalananDinas, PerjalananDinas, StatusBpd,
};
use crate::repository::{BpdRepository, ChildWrite};
use crate::types::{Actor, ListParams, Page};

use super::audit::AuditService;
use super::error::{ServiceError, ServiceResult};

const MODUL: &str = "bpd";

/// A trip with everything hanging off it
#[derive(Debug, Clone, Serialize)]
pub struct BpdDetail {
    #[serde(flatten)]
    pub header: PerjalananDinas,
    pub status_label: &'static str,
    pub biaya: Vec<Biaya>,
    pub kendaraan: Vec<Kendaraan>,
    pub dokumen: Vec<Dokumen>,
    pub histori: Vec<Histori>,
    pub total_biaya: Decimal,
}

#[derive(Clone)]
pub struct BpdService {
    repo: Arc<dyn BpdRepository>,
    audit: AuditService,
}

impl BpdService {
    pub fn new(repo: Arc<dyn BpdRepository>, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn list(&self, scope: &ScopeQuery, params: &ListParams) -> ServiceResult<Page<Value>> {
        let filter = params.to_filter_data(SPPD_SEARCH_COLUMNS, Map::new(), "created_at desc")?;
        Ok(self.repo.list_sppd(scope.id_bidang, scope.tahun, filter).await?)
    }

    pub async fn list_selesai(&self, scope: &ScopeQuery, params: &ListParams) -> ServiceResult<Page<Value>> {
        let filter = params.to_filter_data(SPPD_SEARCH_COLUMNS, Map::new(), "created_at desc")?;
        Ok(self.repo.list_selesai(scope.id_bidang, scope.tahun, filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<BpdDetail> {
        let header = self.trip(id).await?;
        let (biaya, kendaraan, dokumen, histori) = futures::try_join!(
            self.repo.list_biaya(id),
            self.repo.list_kendaraan(id),
            self.repo.list_dokumen(id),
            self.repo.histori(id),
        )?;

        let total_biaya: Decimal = biaya.iter().map(|b| b.total).sum();
        let status_label = header.status().map(StatusBpd::label).unwrap_or("Tidak dikenal");
        Ok(BpdDetail { header, status_label, biaya, kendaraan, dokumen, histori, total_biaya })
    }

    pub async fn create(&self, req: BpdRequest, actor: &Actor) -> ServiceResult<PerjalananDinas> {
        let trip = checked_trip(req)?;
        let created = self.repo.create(trip, actor).await?;
        self.audit.record(actor, MODUL, "create", format!("Buat SPPD {}", created.nomor_sppd)).await;
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, req: BpdRequest, actor: &Actor) -> ServiceResult<PerjalananDinas> {
        self.editable_trip(id).await?;
        let trip = checked_trip(req)?;

        // the status may have moved since the check above
        let updated = self.repo.update(id, trip, actor.id_user).await?.ok_or_else(status_changed)?;
        self.audit.record(actor, MODUL, "update", format!("Ubah SPPD {}", updated.nomor_sppd)).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        let trip = self.trip(id).await?;
        let status = known_status(&trip)?;
        if !status.is_deletable() {
            return Err(ServiceError::conflict(format!(
                "SPPD berstatus {} tidak dapat dihapus",
                status.label()
            )));
        }

        if !self.repo.soft_delete(id, actor.id_user).await? {
            return Err(status_changed());
        }
        self.audit.record(actor, MODUL, "delete", format!("Hapus SPPD {}", trip.nomor_sppd)).await;
        Ok(())
    }

    /// Apply an approval action; the status update is a compare-and-set on the status read here
    pub async fn transition(
        &self,
        id: Uuid,
        action: BpdAction,
        req: TransitionRequest,
        actor: &Actor,
    ) -> ServiceResult<PerjalananDinas> {
        let trip = self.trip(id).await?;
        let from = known_status(&trip)?;

        let catatan = req.catatan.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        if action.requires_catatan() && catatan.is_none() {
            return Err(ServiceError::invalid_field("catatan", "Catatan wajib diisi"));
        }

        let to = action.apply(from).ok_or_else(|| {
            ServiceError::conflict(format!("Aksi {} tidak dapat dilakukan pada status {}", action.as_str(), from.label()))
        })?;

        let updated = self
            .repo
            .transition(id, from, to, action.as_str(), catatan, actor)
            .await?
            .ok_or_else(status_changed)?;

        tracing::info!(bpd_id = %id, aksi = action.as_str(), from = from.label(), to = to.label(), "Status changed");
        self.audit
            .record(actor, MODUL, action.as_str(), format!("SPPD {}: {} -> {}", trip.nomor_sppd, from.label(), to.label()))
            .await;
        Ok(updated)
    }

    pub async fn histori(&self, id: Uuid) -> ServiceResult<Vec<Histori>> {
        self.trip(id).await?;
        Ok(self.repo.histori(id).await?)
    }

    pub async fn add_biaya(&self, id: Uuid, req: BiayaRequest, actor: &Actor) -> ServiceResult<Biaya> {
        self.editable_trip(id).await?;
        let biaya = checked_biaya(req)?;
        let row = written(self.repo.add_biaya(id, biaya, actor.id_user).await?, "Biaya tidak ditemukan")?;
        self.audit.record(actor, MODUL, "add_biaya", format!("{} untuk SPPD {}", row.uraian, id)).await;
        Ok(row)
    }

    pub async fn update_biaya(&self, id: Uuid, biaya_id: Uuid, req: BiayaRequest, actor: &Actor) -> ServiceResult<Biaya> {
        self.editable_trip(id).await?;
        let biaya = checked_biaya(req)?;
        let row = written(self.repo.update_biaya(id, biaya_id, biaya, actor.id_user).await?, "Biaya tidak ditemukan")?;
        self.audit.record(actor, MODUL, "update_biaya", format!("{} untuk SPPD {}", row.uraian, id)).await;
        Ok(row)
    }

    pub async fn delete_biaya(&self, id: Uuid, biaya_id: Uuid, actor: &Actor) -> ServiceResult<()> {
        self.editable_trip(id).await?;
        written(self.repo.delete_biaya(id, biaya_id, actor.id_user).await?, "Biaya tidak ditemukan")?;
        self.audit.record(actor, MODUL, "delete_biaya", format!("Biaya {} SPPD {}", biaya_id, id)).await;
        Ok(())
    }

    pub async fn add_kendaraan(&self, id: Uuid, req: KendaraanRequest, actor: &Actor) -> ServiceResult<Kendaraan> {
        self.editable_trip(id).await?;
        let row = written(self.repo.add_kendaraan(id, req.into(), actor.id_user).await?, "Kendaraan tidak ditemukan")?;
        self.audit.record(actor, MODUL, "add_kendaraan", format!("Kendaraan {} SPPD {}", row.id, id)).await;
        Ok(row)
    }

    pub async fn update_kendaraan(
        &self,
        id: Uuid,
        kendaraan_id: Uuid,
        req: KendaraanRequest,
        actor: &Actor,
    ) -> ServiceResult<Kendaraan> {
        self.editable_trip(id).await?;
        let row = written(self.repo.update_kendaraan(id, kendaraan_id, req.into(), actor.id_user).await?, "Kendaraan tidak ditemukan")?;
        self.audit.record(actor, MODUL, "update_kendaraan", format!("Kendaraan {} SPPD {}", row.id, id)).await;
        Ok(row)
    }

    pub async fn delete_kendaraan(&self, id: Uuid, kendaraan_id: Uuid, actor: &Actor) -> ServiceResult<()> {
        self.editable_trip(id).await?;
        written(self.repo.delete_kendaraan(id, kendaraan_id, actor.id_user).await?, "Kendaraan tidak ditemukan")?;
        self.audit.record(actor, MODUL, "delete_kendaraan", format!("Kendaraan {} SPPD {}", kendaraan_id, id)).await;
        Ok(())
    }

    pub async fn add_dokumen(&self, id: Uuid, req: DokumenRequest, actor: &Actor) -> ServiceResult<Dokumen> {
        self.editable_trip(id).await?;
        let row = written(self.repo.add_dokumen(id, req.into(), actor.id_user).await?, "Dokumen tidak ditemukan")?;
        self.audit.record(actor, MODUL, "add_dokumen", format!("{} SPPD {}", row.nama_file, id)).await;
        Ok(row)
    }

    pub async fn update_dokumen(
        &self,
        id: Uuid,
        dokumen_id: Uuid,
        req: DokumenRequest,
        actor: &Actor,
    ) -> ServiceResult<Dokumen> {
        self.editable_trip(id).await?;
        let row = written(self.repo.update_dokumen(id, dokumen_id, req.into(), actor.id_user).await?, "Dokumen tidak ditemukan")?;
        self.audit.record(actor, MODUL, "update_dokumen", format!("{} SPPD {}", row.nama_file, id)).await;
        Ok(row)
    }

    pub async fn delete_dokumen(&self, id: Uuid, dokumen_id: Uuid, actor: &Actor) -> ServiceResult<()> {
        self.editable_trip(id).await?;
        written(self.repo.delete_dokumen(id, dokumen_id, actor.id_user).await?, "Dokumen tidak ditemukan")?;
        self.audit.record(actor, MODUL, "delete_dokumen", format!("Dokumen {} SPPD {}", dokumen_id, id)).await;
        Ok(())
    }

    async fn trip(&self, id: Uuid) -> ServiceResult<PerjalananDinas> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("Perjalanan dinas tidak ditemukan"))
    }

    async fn editable_trip(&self, id: Uuid) -> ServiceResult<PerjalananDinas> {
        let trip = self.trip(id).await?;
        let status = known_status(&trip)?;
        if !status.is_editable() {
            return Err(ServiceError::conflict(format!("SPPD berstatus {} tidak dapat diubah", status.label())));
        }
        Ok(trip)
    }
}

fn known_status(trip: &PerjalananDinas) -> ServiceResult<StatusBpd> {
    trip.status().ok_or_else(|| {
        tracing::error!(bpd_id = %trip.id, status = trip.status, "Unknown status code");
        ServiceError::Internal("Status perjalanan dinas tidak dikenal".to_string())
    })
}

fn status_changed() -> ServiceError {
    ServiceError::conflict("Status perjalanan dinas telah berubah, silakan muat ulang data")
}

fn written<T>(outcome: ChildWrite<T>, missing: &str) -> ServiceResult<T> {
    match outcome {
        ChildWrite::Written(row) => Ok(row),
        ChildWrite::Missing => Err(ServiceError::not_found(missing)),
        ChildWrite::Locked => Err(status_changed()),
    }
}

fn checked_trip(req: BpdRequest) -> ServiceResult<NewPerjalananDinas> {
    if req.tanggal_kembali < req.tanggal_berangkat {
        return Err(ServiceError::invalid_field(
            "tanggal_kembali",
            "Tanggal kembali tidak boleh sebelum tanggal berangkat",
        ));
    }
    Ok(req.into())
}

const MAX_JUMLAH: i64 = 10_000;
const MAX_NOMINAL: i64 = 1_000_000_000_000;

fn checked_biaya(req: BiayaRequest) -> ServiceResult<NewBiaya> {
    if req.jumlah <= Decimal::ZERO {
        return Err(ServiceError::invalid_field("jumlah", "Jumlah harus lebih dari 0"));
    }
    if req.jumlah > Decimal::from(MAX_JUMLAH) {
        return Err(ServiceError::invalid_field("jumlah", format!("Jumlah maksimal {}", MAX_JUMLAH)));
    }
    if req.nominal < Decimal::ZERO {
        return Err(ServiceError::invalid_field("nominal", "Nominal tidak boleh negatif"));
    }
    if req.nominal > Decimal::from(MAX_NOMINAL) {
        return Err(ServiceError::invalid_field("nominal", format!("Nominal maksimal {}", MAX_NOMINAL)));
    }
    NewBiaya::new(req.id_jenis_biaya, req.uraian, req.jumlah, req.nominal)
        .ok_or_else(|| ServiceError::invalid_field("nominal", "Total biaya terlalu besar"))
}
