use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::bpd::SPPD_LIST_COLUMNS;
use crate::database::models::{
    Biaya, Dokumen, Histori, Kendaraan, NewBiaya, NewDokumen, NewKendaraan, NewPerjalananDinas, PerjalananDinas,
    StatusBpd,
};
use crate::database::query_builder::{JsonRow, QueryBuilder};
use crate::database::DatabaseError;
use crate::filter::{ColumnType, FilterData, FilterSource};
use crate::types::{Actor, Page};

/// Outcome of a write against a trip's cost, vehicle or document rows
#[derive(Debug, Clone, PartialEq)]
pub enum ChildWrite<T> {
    Written(T),
    /// No such child row on this trip
    Missing,
    /// The trip is gone or no longer draft or revision
    Locked,
}

/// The trip aggregate: header, its child rows and the approval trail
#[async_trait]
pub trait BpdRepository: Send + Sync {
    /// Rows of `fn_list_sppd(id_bidang, tahun)`
    async fn list_sppd(
        &self,
        id_bidang: Option<Uuid>,
        tahun: Option<i32>,
        filter: FilterData,
    ) -> Result<Page<Value>, DatabaseError>;

    /// Rows of `fn_list_bpd_selesai(id_bidang, tahun)`
    async fn list_selesai(
        &self,
        id_bidang: Option<Uuid>,
        tahun: Option<i32>,
        filter: FilterData,
    ) -> Result<Page<Value>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PerjalananDinas>, DatabaseError>;

    /// Numbers the trip, stores it as Draft and writes its first history row
    async fn create(&self, trip: NewPerjalananDinas, actor: &Actor) -> Result<PerjalananDinas, DatabaseError>;

    /// Only applies while the trip is Draft or Revisi
    async fn update(
        &self,
        id: Uuid,
        trip: NewPerjalananDinas,
        actor: Uuid,
    ) -> Result<Option<PerjalananDinas>, DatabaseError>;

    /// Only applies while the trip is Draft
    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError>;

    /// Compare-and-set `from` → `to` plus one history row; `None` when the status moved meanwhile
    async fn transition(
        &self,
        id: Uuid,
        from: StatusBpd,
        to: StatusBpd,
        aksi: &str,
        catatan: Option<String>,
        actor: &Actor,
    ) -> Result<Option<PerjalananDinas>, DatabaseError>;

    // Child writes lock the trip row and only apply while it is draft or revision.
    async fn list_biaya(&self, id: Uuid) -> Result<Vec<Biaya>, DatabaseError>;
    async fn add_biaya(&self, id: Uuid, biaya: NewBiaya, actor: Uuid) -> Result<ChildWrite<Biaya>, DatabaseError>;
    async fn update_biaya(
        &self,
        id: Uuid,
        biaya_id: Uuid,
        biaya: NewBiaya,
        actor: Uuid,
    ) -> Result<ChildWrite<Biaya>, DatabaseError>;
    async fn delete_biaya(&self, id: Uuid, biaya_id: Uuid, actor: Uuid) -> Result<ChildWrite<()>, DatabaseError>;

    async fn list_kendaraan(&self, id: Uuid) -> Result<Vec<Kendaraan>, DatabaseError>;
    async fn add_kendaraan(
        &self,
        id: Uuid,
        kendaraan: NewKendaraan,
        actor: Uuid,
    ) -> Result<ChildWrite<Kendaraan>, DatabaseError>;
    async fn update_kendaraan(
        &self,
        id: Uuid,
        kendaraan_id: Uuid,
        kendaraan: NewKendaraan,
        actor: Uuid,
    ) -> Result<ChildWrite<Kendaraan>, DatabaseError>;
    async fn delete_kendaraan(&self, id: Uuid, kendaraan_id: Uuid, actor: Uuid) -> Result<ChildWrite<()>, DatabaseError>;

    async fn list_dokumen(&self, id: Uuid) -> Result<Vec<Dokumen>, DatabaseError>;
    async fn add_dokumen(&self, id: Uuid, dokumen: NewDokumen, actor: Uuid) -> Result<ChildWrite<Dokumen>, DatabaseError>;
    async fn update_dokumen(
        &self,
        id: Uuid,
        dokumen_id: Uuid,
        dokumen: NewDokumen,
        actor: Uuid,
    ) -> Result<ChildWrite<Dokumen>, DatabaseError>;
    async fn delete_dokumen(&self, id: Uuid, dokumen_id: Uuid, actor: Uuid) -> Result<ChildWrite<()>, DatabaseError>;

    async fn histori(&self, id: Uuid) -> Result<Vec<Histori>, DatabaseError>;
}

const SELECT_BY_ID: &str = "SELECT * FROM perjalanan_dinas WHERE id = $1 AND is_deleted = false";

const GENERATE_NOMOR: &str = "SELECT fn_generate_nomor_sppd($1::uuid)";

const INSERT: &str = r#"
    INSERT INTO perjalanan_dinas (id, nomor_sppd, id_pegawai, id_bidang, id_cabang, id_jenis_perjalanan, maksud,
                                  tujuan, kota_asal, kota_tujuan, tanggal_berangkat, tanggal_kembali, lama_hari,
                                  status, keterangan, is_deleted, created_at, created_by)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, false, now(), $16)
    RETURNING *
"#;

const UPDATE: &str = r#"
    UPDATE perjalanan_dinas
    SET id_pegawai = $2, id_bidang = $3, id_cabang = $4, id_jenis_perjalanan = $5, maksud = $6, tujuan = $7,
        kota_asal = $8, kota_tujuan = $9, tanggal_berangkat = $10, tanggal_kembali = $11, lama_hari = $12,
        keterangan = $13, updated_at = now(), updated_by = $14
    WHERE id = $1 AND is_deleted = false AND status IN (0, 2)
    RETURNING *
"#;

const SOFT_DELETE: &str = r#"
    UPDATE perjalanan_dinas SET is_deleted = true, deleted_at = now(), deleted_by = $2
    WHERE id = $1 AND is_deleted = false AND status = 0
"#;

const COMPARE_AND_SET_STATUS: &str = r#"
    UPDATE perjalanan_dinas SET status = $3, updated_at = now(), updated_by = $4
    WHERE id = $1 AND status = $2 AND is_deleted = false
    RETURNING *
"#;

const INSERT_HISTORI: &str = r#"
    INSERT INTO pengajuan_bpd_histori (id, id_perjalanan_dinas, status_dari, status_ke, aksi, catatan, id_user,
                                       username, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
"#;

const SELECT_HISTORI: &str =
    "SELECT * FROM pengajuan_bpd_histori WHERE id_perjalanan_dinas = $1 ORDER BY created_at, id";

const LOCK_TRIP_STATUS: &str = "SELECT status FROM perjalanan_dinas WHERE id = $1 AND is_deleted = false FOR UPDATE";

const SELECT_BIAYA: &str = r#"
    SELECT id, id_perjalanan_dinas, id_jenis_biaya, uraian, jumlah, nominal, total, is_deleted,
           created_at, created_by, updated_at, updated_by
    FROM perjalanan_dinas_biaya WHERE id_perjalanan_dinas = $1 AND is_deleted = false ORDER BY created_at
"#;

const INSERT_BIAYA: &str = r#"
    INSERT INTO perjalanan_dinas_biaya (id, id_perjalanan_dinas, id_jenis_biaya, uraian, jumlah, nominal, total,
                                        is_deleted, created_at, created_by)
    VALUES ($1, $2, $3, $4, $5, $6, $7, false, now(), $8)
    RETURNING id, id_perjalanan_dinas, id_jenis_biaya, uraian, jumlah, nominal, total, is_deleted,
              created_at, created_by, updated_at, updated_by
"#;

const UPDATE_BIAYA: &str = r#"
    UPDATE perjalanan_dinas_biaya
    SET id_jenis_biaya = $3, uraian = $4, jumlah = $5, nominal = $6, total = $7, updated_at = now(), updated_by = $8
    WHERE id = $2 AND id_perjalanan_dinas = $1 AND is_deleted = false
    RETURNING id, id_perjalanan_dinas, id_jenis_biaya, uraian, jumlah, nominal, total, is_deleted,
              created_at, created_by, updated_at, updated_by
"#;

const DELETE_BIAYA: &str = r#"
    UPDATE perjalanan_dinas_biaya SET is_deleted = true, deleted_at = now(), deleted_by = $3
    WHERE id = $2 AND id_perjalanan_dinas = $1 AND is_deleted = false
"#;

const SELECT_KENDARAAN: &str = r#"
    SELECT id, id_perjalanan_dinas, id_jenis_kendaraan, nomor_polisi, keterangan, is_deleted,
           created_at, created_by, updated_at, updated_by
    FROM perjalanan_dinas_kendaraan WHERE id_perjalanan_dinas = $1 AND is_deleted = false ORDER BY created_at
"#;

const INSERT_KENDARAAN: &str = r#"
    INSERT INTO perjalanan_dinas_kendaraan (id, id_perjalanan_dinas, id_jenis_kendaraan, nomor_polisi, keterangan,
                                            is_deleted, created_at, created_by)
    VALUES ($1, $2, $3, $4, $5, false, now(), $6)
    RETURNING id, id_perjalanan_dinas, id_jenis_kendaraan, nomor_polisi, keterangan, is_deleted,
              created_at, created_by, updated_at, updated_by
"#;

const UPDATE_KENDARAAN: &str = r#"
    UPDATE perjalanan_dinas_kendaraan
    SET id_jenis_kendaraan = $3, nomor_polisi = $4, keterangan = $5, updated_at = now(), updated_by = $6
    WHERE id = $2 AND id_perjalanan_dinas = $1 AND is_deleted = false
    RETURNING id, id_perjalanan_dinas, id_jenis_kendaraan, nomor_polisi, keterangan, is_deleted,
              created_at, created_by, updated_at, updated_by
"#;

const DELETE_KENDARAAN: &str = r#"
    UPDATE perjalanan_dinas_kendaraan SET is_deleted = true, deleted_at = now(), deleted_by = $3
    WHERE id = $2 AND id_perjalanan_dinas = $1 AND is_deleted = false
"#;

const SELECT_DOKUMEN: &str = r#"
    SELECT id, id_perjalanan_dinas, id_jenis_dokumen, nama_file, path, keterangan, is_deleted,
           created_at, created_by, updated_at, updated_by
    FROM perjalanan_dinas_dokumen WHERE id_perjalanan_dinas = $1 AND is_deleted = false ORDER BY created_at
"#;

const INSERT_DOKUMEN: &str = r#"
    INSERT INTO perjalanan_dinas_dokumen (id, id_perjalanan_dinas, id_jenis_dokumen, nama_file, path, keterangan,
                                          is_deleted, created_at, created_by)
    VALUES ($1, $2, $3, $4, $5, $6, false, now(), $7)
    RETURNING id, id_perjalanan_dinas, id_jenis_dokumen, nama_file, path, keterangan, is_deleted,
              created_at, created_by, updated_at, updated_by
"#;

const UPDATE_DOKUMEN: &str = r#"
    UPDATE perjalanan_dinas_dokumen
    SET id_jenis_dokumen = $3, nama_file = $4, path = $5, keterangan = $6, updated_at = now(), updated_by = $7
    WHERE id = $2 AND id_perjalanan_dinas = $1 AND is_deleted = false
    RETURNING id, id_perjalanan_dinas, id_jenis_dokumen, nama_file, path, keterangan, is_deleted,
              created_at, created_by, updated_at, updated_by
"#;

const DELETE_DOKUMEN: &str = r#"
    UPDATE perjalanan_dinas_dokumen SET is_deleted = true, deleted_at = now(), deleted_by = $3
    WHERE id = $2 AND id_perjalanan_dinas = $1 AND is_deleted = false
"#;

pub struct PgBpdRepository {
    pool: PgPool,
}

impl PgBpdRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_function(
        &self,
        name: &'static str,
        id_bidang: Option<Uuid>,
        tahun: Option<i32>,
        filter: FilterData,
    ) -> Result<Page<Value>, DatabaseError> {
        let source = FilterSource::Function {
            name,
            args: vec![(json!(id_bidang), ColumnType::Uuid), (json!(tahun), ColumnType::Int)],
        };
        let page = QueryBuilder::<JsonRow>::json(source, SPPD_LIST_COLUMNS)?
            .filter(filter)?
            .select_page(&self.pool)
            .await?;
        Ok(page.map(|r| r.row))
    }

    /// Soft-delete one child row while holding the trip lock
    async fn delete_child(
        &self,
        sql: &'static str,
        id: Uuid,
        child_id: Uuid,
        actor: Uuid,
    ) -> Result<ChildWrite<()>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !lock_editable_trip(&mut tx, id).await? {
            return Ok(ChildWrite::Locked);
        }
        let result = sqlx::query(sql).bind(id).bind(child_id).bind(actor).execute(&mut *tx).await?;
        if result.rows_affected() != 1 {
            return Ok(ChildWrite::Missing);
        }
        tx.commit().await?;
        Ok(ChildWrite::Written(()))
    }
}

/// Lock the trip row for the rest of the transaction; false unless it is draft or revision
async fn lock_editable_trip(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<bool, DatabaseError> {
    let status: Option<i16> = sqlx::query_scalar(LOCK_TRIP_STATUS).bind(id).fetch_optional(&mut **tx).await?;
    Ok(status.and_then(StatusBpd::from_code).is_some_and(StatusBpd::is_editable))
}

#[async_trait]
impl BpdRepository for PgBpdRepository {
    async fn list_sppd(
        &self,
        id_bidang: Option<Uuid>,
        tahun: Option<i32>,
        filter: FilterData,
    ) -> Result<Page<Value>, DatabaseError> {
        self.list_function("fn_list_sppd", id_bidang, tahun, filter).await
    }

    async fn list_selesai(
        &self,
        id_bidang: Option<Uuid>,
        tahun: Option<i32>,
        filter: FilterData,
    ) -> Result<Page<Value>, DatabaseError> {
        self.list_function("fn_list_bpd_selesai", id_bidang, tahun, filter).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PerjalananDinas>, DatabaseError> {
        let trip = sqlx::query_as::<_, PerjalananDinas>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(trip)
    }

    async fn create(&self, trip: NewPerjalananDinas, actor: &Actor) -> Result<PerjalananDinas, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let nomor: String = sqlx::query_scalar(GENERATE_NOMOR)
            .bind(trip.id_bidang)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("fn_generate_nomor_sppd failed: {}", e);
                e
            })?;

        let created = sqlx::query_as::<_, PerjalananDinas>(INSERT)
            .bind(Uuid::new_v4())
            .bind(&nomor)
            .bind(trip.id_pegawai)
            .bind(trip.id_bidang)
            .bind(trip.id_cabang)
            .bind(trip.id_jenis_perjalanan)
            .bind(&trip.maksud)
            .bind(&trip.tujuan)
            .bind(&trip.kota_asal)
            .bind(&trip.kota_tujuan)
            .bind(trip.tanggal_berangkat)
            .bind(trip.tanggal_kembali)
            .bind(trip.lama_hari())
            .bind(StatusBpd::Draft.code())
            .bind(&trip.keterangan)
            .bind(actor.id_user)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(INSERT_HISTORI)
            .bind(Uuid::new_v4())
            .bind(created.id)
            .bind(None::<i16>)
            .bind(StatusBpd::Draft.code())
            .bind("buat")
            .bind(None::<String>)
            .bind(actor.id_user)
            .bind(&actor.username)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(bpd_id = %created.id, nomor_sppd = %created.nomor_sppd, "Created perjalanan dinas");
        Ok(created)
    }

    async fn update(
        &self,
        id: Uuid,
        trip: NewPerjalananDinas,
        actor: Uuid,
    ) -> Result<Option<PerjalananDinas>, DatabaseError> {
        let updated = sqlx::query_as::<_, PerjalananDinas>(UPDATE)
            .bind(id)
            .bind(trip.id_pegawai)
            .bind(trip.id_bidang)
            .bind(trip.id_cabang)
            .bind(trip.id_jenis_perjalanan)
            .bind(&trip.maksud)
            .bind(&trip.tujuan)
            .bind(&trip.kota_asal)
            .bind(&trip.kota_tujuan)
            .bind(trip.tanggal_berangkat)
            .bind(trip.tanggal_kembali)
            .bind(trip.lama_hari())
            .bind(&trip.keterangan)
            .bind(actor)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(SOFT_DELETE).bind(id).bind(actor).execute(&self.pool).await?;
        Ok(result.rows_affected() == 1)
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
        let mut tx = self.pool.begin().await?;

        let Some(updated) = sqlx::query_as::<_, PerjalananDinas>(COMPARE_AND_SET_STATUS)
            .bind(id)
            .bind(from.code())
            .bind(to.code())
            .bind(actor.id_user)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query(INSERT_HISTORI)
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(Some(from.code()))
            .bind(to.code())
            .bind(aksi)
            .bind(&catatan)
            .bind(actor.id_user)
            .bind(&actor.username)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn list_biaya(&self, id: Uuid) -> Result<Vec<Biaya>, DatabaseError> {
        let rows = sqlx::query_as::<_, Biaya>(SELECT_BIAYA).bind(id).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn add_biaya(&self, id: Uuid, biaya: NewBiaya, actor: Uuid) -> Result<ChildWrite<Biaya>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !lock_editable_trip(&mut tx, id).await? {
            return Ok(ChildWrite::Locked);
        }
        let row = sqlx::query_as::<_, Biaya>(INSERT_BIAYA)
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(biaya.id_jenis_biaya)
            .bind(&biaya.uraian)
            .bind(biaya.jumlah)
            .bind(biaya.nominal)
            .bind(biaya.total)
            .bind(actor)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(ChildWrite::Written(row))
    }

    async fn update_biaya(
        &self,
        id: Uuid,
        biaya_id: Uuid,
        biaya: NewBiaya,
        actor: Uuid,
    ) -> Result<ChildWrite<Biaya>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !lock_editable_trip(&mut tx, id).await? {
            return Ok(ChildWrite::Locked);
        }
        let Some(row) = sqlx::query_as::<_, Biaya>(UPDATE_BIAYA)
            .bind(id)
            .bind(biaya_id)
            .bind(biaya.id_jenis_biaya)
            .bind(&biaya.uraian)
            .bind(biaya.jumlah)
            .bind(biaya.nominal)
            .bind(biaya.total)
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ChildWrite::Missing);
        };
        tx.commit().await?;
        Ok(ChildWrite::Written(row))
    }

    async fn delete_biaya(&self, id: Uuid, biaya_id: Uuid, actor: Uuid) -> Result<ChildWrite<()>, DatabaseError> {
        self.delete_child(DELETE_BIAYA, id, biaya_id, actor).await
    }

    async fn list_kendaraan(&self, id: Uuid) -> Result<Vec<Kendaraan>, DatabaseError> {
        let rows = sqlx::query_as::<_, Kendaraan>(SELECT_KENDARAAN).bind(id).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn add_kendaraan(
        &self,
        id: Uuid,
        kendaraan: NewKendaraan,
        actor: Uuid,
    ) -> Result<ChildWrite<Kendaraan>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !lock_editable_trip(&mut tx, id).await? {
            return Ok(ChildWrite::Locked);
        }
        let row = sqlx::query_as::<_, Kendaraan>(INSERT_KENDARAAN)
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(kendaraan.id_jenis_kendaraan)
            .bind(&kendaraan.nomor_polisi)
            .bind(&kendaraan.keterangan)
            .bind(actor)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(ChildWrite::Written(row))
    }

    async fn update_kendaraan(
        &self,
        id: Uuid,
        kendaraan_id: Uuid,
        kendaraan: NewKendaraan,
        actor: Uuid,
    ) -> Result<ChildWrite<Kendaraan>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !lock_editable_trip(&mut tx, id).await? {
            return Ok(ChildWrite::Locked);
        }
        let Some(row) = sqlx::query_as::<_, Kendaraan>(UPDATE_KENDARAAN)
            .bind(id)
            .bind(kendaraan_id)
            .bind(kendaraan.id_jenis_kendaraan)
            .bind(&kendaraan.nomor_polisi)
            .bind(&kendaraan.keterangan)
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ChildWrite::Missing);
        };
        tx.commit().await?;
        Ok(ChildWrite::Written(row))
    }

    async fn delete_kendaraan(&self, id: Uuid, kendaraan_id: Uuid, actor: Uuid) -> Result<ChildWrite<()>, DatabaseError> {
        self.delete_child(DELETE_KENDARAAN, id, kendaraan_id, actor).await
    }

    async fn list_dokumen(&self, id: Uuid) -> Result<Vec<Dokumen>, DatabaseError> {
        let rows = sqlx::query_as::<_, Dokumen>(SELECT_DOKUMEN).bind(id).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn add_dokumen(&self, id: Uuid, dokumen: NewDokumen, actor: Uuid) -> Result<ChildWrite<Dokumen>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !lock_editable_trip(&mut tx, id).await? {
            return Ok(ChildWrite::Locked);
        }
        let row = sqlx::query_as::<_, Dokumen>(INSERT_DOKUMEN)
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(dokumen.id_jenis_dokumen)
            .bind(&dokumen.nama_file)
            .bind(&dokumen.path)
            .bind(&dokumen.keterangan)
            .bind(actor)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(ChildWrite::Written(row))
    }

    async fn update_dokumen(
        &self,
        id: Uuid,
        dokumen_id: Uuid,
        dokumen: NewDokumen,
        actor: Uuid,
    ) -> Result<ChildWrite<Dokumen>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !lock_editable_trip(&mut tx, id).await? {
            return Ok(ChildWrite::Locked);
        }
        let Some(row) = sqlx::query_as::<_, Dokumen>(UPDATE_DOKUMEN)
            .bind(id)
            .bind(dokumen_id)
            .bind(dokumen.id_jenis_dokumen)
            .bind(&dokumen.nama_file)
            .bind(&dokumen.path)
            .bind(&dokumen.keterangan)
            .bind(actor)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ChildWrite::Missing);
        };
        tx.commit().await?;
        Ok(ChildWrite::Written(row))
    }

    async fn delete_dokumen(&self, id: Uuid, dokumen_id: Uuid, actor: Uuid) -> Result<ChildWrite<()>, DatabaseError> {
        self.delete_child(DELETE_DOKUMEN, id, dokumen_id, actor).await
    }

    async fn histori(&self, id: Uuid) -> Result<Vec<Histori>, DatabaseError> {
        let rows = sqlx::query_as::<_, Histori>(SELECT_HISTORI).bind(id).fetch_all(&self.pool).await?;
        Ok(rows)
    }
}
