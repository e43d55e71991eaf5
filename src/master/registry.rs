use crate::filter::{ColumnSpec, ColumnType};

/// One writable column of a master table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterColumn {
    pub name: &'static str,
    pub kind: ColumnType,
    pub required: bool,
    pub searchable: bool,
}

impl MasterColumn {
    const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self { name, kind, required: false, searchable: false }
    }

    const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    const fn searchable(self) -> Self {
        Self { searchable: true, ..self }
    }

    pub fn spec(&self) -> ColumnSpec {
        ColumnSpec::new(self.name, self.kind)
    }
}

const fn text(name: &'static str) -> MasterColumn {
    MasterColumn::new(name, ColumnType::Text)
}

const fn uuid(name: &'static str) -> MasterColumn {
    MasterColumn::new(name, ColumnType::Uuid)
}

const fn int(name: &'static str) -> MasterColumn {
    MasterColumn::new(name, ColumnType::Int)
}

const fn decimal(name: &'static str) -> MasterColumn {
    MasterColumn::new(name, ColumnType::Decimal)
}

const fn boolean(name: &'static str) -> MasterColumn {
    MasterColumn::new(name, ColumnType::Bool)
}

const fn date(name: &'static str) -> MasterColumn {
    MasterColumn::new(name, ColumnType::Date)
}

// Most lookup tables are a code, a name and a free-text note.
const KODE: MasterColumn = text("kode").required().searchable();
const NAMA: MasterColumn = text("nama").required().searchable();
const KETERANGAN: MasterColumn = text("keterangan");
// Rate tables have no name column; their note is what users search.
const CATATAN_TARIF: MasterColumn = text("keterangan").searchable();

/// Columns every master table carries besides its own
const SYSTEM_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("id", ColumnType::Uuid),
    ColumnSpec::new("is_deleted", ColumnType::Bool),
    ColumnSpec::new("created_at", ColumnType::Timestamp),
    ColumnSpec::new("updated_at", ColumnType::Timestamp),
];

/// A master resource: URL key, backing table and its writable columns
#[derive(Debug)]
pub struct MasterEntity {
    pub key: &'static str,
    pub table: &'static str,
    pub columns: &'static [MasterColumn],
    pub default_sort: &'static str,
}

impl MasterEntity {
    pub fn column(&self, name: &str) -> Option<&'static MasterColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whitelist for list filters and sorting
    pub fn filter_columns(&self) -> Vec<ColumnSpec> {
        SYSTEM_COLUMNS
            .iter()
            .copied()
            .chain(self.columns.iter().map(MasterColumn::spec))
            .collect()
    }

    pub fn search_columns(&self) -> Vec<&'static str> {
        self.columns.iter().filter(|c| c.searchable).map(|c| c.name).collect()
    }
}

pub static REGISTRY: &[MasterEntity] = &[
    MasterEntity {
        key: "pegawai",
        table: "m_pegawai",
        columns: &[
            text("nip").required().searchable(),
            text("nama").required().searchable(),
            uuid("id_jabatan"),
            uuid("id_golongan"),
            uuid("id_eselon"),
            uuid("id_bidang").required(),
            uuid("id_cabang"),
            text("jenis_kelamin"),
            text("tempat_lahir"),
            date("tanggal_lahir"),
            text("email").searchable(),
            text("telepon"),
            text("alamat"),
            boolean("aktif"),
        ],
        default_sort: "nama asc",
    },
    MasterEntity {
        key: "jabatan",
        table: "m_jabatan",
        columns: &[KODE, NAMA, KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "golongan",
        table: "m_golongan",
        columns: &[KODE, NAMA, text("pangkat").searchable(), KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "eselon",
        table: "m_eselon",
        columns: &[KODE, NAMA, KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "bidang",
        table: "m_bidang",
        columns: &[KODE, NAMA, uuid("id_cabang"), KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "cabang",
        table: "m_cabang",
        columns: &[KODE, NAMA, text("alamat"), uuid("id_kota"), text("telepon")],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "jenis-kendaraan",
        table: "m_jenis_kendaraan",
        columns: &[KODE, NAMA, KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "kendaraan",
        table: "m_kendaraan",
        columns: &[
            uuid("id_jenis_kendaraan").required(),
            text("nomor_polisi").required().searchable(),
            text("merk").searchable(),
            int("tahun"),
            KETERANGAN,
        ],
        default_sort: "nomor_polisi asc",
    },
    MasterEntity {
        key: "jenis-biaya",
        table: "m_jenis_biaya",
        columns: &[KODE, NAMA, KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "komponen-biaya",
        table: "m_komponen_biaya",
        columns: &[uuid("id_jenis_biaya").required(), KODE, NAMA, text("satuan"), KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "jenis-perjalanan",
        table: "m_jenis_perjalanan",
        columns: &[KODE, NAMA, boolean("luar_negeri"), KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "moda-transportasi",
        table: "m_moda_transportasi",
        columns: &[KODE, NAMA, KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "provinsi",
        table: "m_provinsi",
        columns: &[KODE, NAMA],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "kota",
        table: "m_kota",
        columns: &[uuid("id_provinsi").required(), KODE, NAMA],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "negara",
        table: "m_negara",
        columns: &[KODE, NAMA],
        default_sort: "nama asc",
    },
    MasterEntity {
        key: "tarif-uang-harian",
        table: "m_tarif_uang_harian",
        columns: &[
            uuid("id_provinsi").required(),
            uuid("id_golongan"),
            decimal("nominal").required(),
            int("tahun").required(),
            CATATAN_TARIF,
        ],
        default_sort: "tahun desc",
    },
    MasterEntity {
        key: "tarif-penginapan",
        table: "m_tarif_penginapan",
        columns: &[
            uuid("id_provinsi").required(),
            uuid("id_eselon"),
            decimal("nominal").required(),
            int("tahun").required(),
            CATATAN_TARIF,
        ],
        default_sort: "tahun desc",
    },
    MasterEntity {
        key: "tarif-transport",
        table: "m_tarif_transport",
        columns: &[
            uuid("id_kota_asal").required(),
            uuid("id_kota_tujuan").required(),
            uuid("id_moda_transportasi"),
            decimal("nominal").required(),
            int("tahun").required(),
            CATATAN_TARIF,
        ],
        default_sort: "tahun desc",
    },
    MasterEntity {
        key: "bank",
        table: "m_bank",
        columns: &[KODE, NAMA],
        default_sort: "nama asc",
    },
    MasterEntity {
        key: "rekening-pegawai",
        table: "m_rekening_pegawai",
        columns: &[
            uuid("id_pegawai").required(),
            uuid("id_bank").required(),
            text("nomor_rekening").required().searchable(),
            text("nama_pemilik").required().searchable(),
            boolean("utama"),
        ],
        default_sort: "nama_pemilik asc",
    },
    MasterEntity {
        key: "mata-anggaran",
        table: "m_mata_anggaran",
        columns: &[KODE, NAMA, int("tahun"), decimal("pagu"), KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "sumber-dana",
        table: "m_sumber_dana",
        columns: &[KODE, NAMA, KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "jenis-dokumen",
        table: "m_jenis_dokumen",
        columns: &[KODE, NAMA, boolean("wajib"), KETERANGAN],
        default_sort: "kode asc",
    },
    MasterEntity {
        key: "pejabat-penandatangan",
        table: "m_pejabat_penandatangan",
        columns: &[
            uuid("id_pegawai").required(),
            text("jabatan_ttd").required().searchable(),
            uuid("id_bidang"),
            date("berlaku_mulai"),
            date("berlaku_sampai"),
            boolean("aktif"),
        ],
        default_sort: "jabatan_ttd asc",
    },
    MasterEntity {
        key: "hari-libur",
        table: "m_hari_libur",
        columns: &[date("tanggal").required(), NAMA, KETERANGAN],
        default_sort: "tanggal desc",
    },
];

pub fn find_entity(key: &str) -> Option<&'static MasterEntity> {
    REGISTRY.iter().find(|e| e.key == key)
}
