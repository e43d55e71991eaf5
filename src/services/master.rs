use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::master::{find_entity, MasterEntity, MasterPayload, PayloadMode};
use crate::repository::MasterRepository;
use crate::types::{Actor, ListParams, Page};

use super::audit::AuditService;
use super::error::{ServiceError, ServiceResult};

/// CRUD over every lookup table in the registry, addressed by its URL key
#[derive(Clone)]
pub struct MasterService {
    repo: Arc<dyn MasterRepository>,
    audit: AuditService,
}

impl MasterService {
    pub fn new(repo: Arc<dyn MasterRepository>, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    pub fn entity(key: &str) -> ServiceResult<&'static MasterEntity> {
        find_entity(key).ok_or_else(|| ServiceError::not_found(format!("Master data '{}' tidak dikenal", key)))
    }

    pub async fn list(&self, key: &str, params: &ListParams) -> ServiceResult<Page<Value>> {
        let entity = Self::entity(key)?;
        let filter = params.to_filter_data(&entity.search_columns(), Map::new(), entity.default_sort)?;
        Ok(self.repo.list(entity, filter).await?)
    }

    pub async fn get(&self, key: &str, id: Uuid) -> ServiceResult<Value> {
        let entity = Self::entity(key)?;
        self.repo.find_by_id(entity, id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, key: &str, body: Value, actor: &Actor) -> ServiceResult<Value> {
        let entity = Self::entity(key)?;
        let payload = MasterPayload::parse(entity, &body, PayloadMode::Create)?;
        let row = self.repo.insert(entity, payload, actor.id_user).await?;
        self.audit.record(actor, entity.key, "create", describe(&row)).await;
        Ok(row)
    }

    pub async fn update(&self, key: &str, id: Uuid, body: Value, actor: &Actor) -> ServiceResult<Value> {
        let entity = Self::entity(key)?;
        let payload = MasterPayload::parse(entity, &body, PayloadMode::Update)?;
        let row = self.repo.update(entity, id, payload, actor.id_user).await?.ok_or_else(not_found)?;
        self.audit.record(actor, entity.key, "update", describe(&row)).await;
        Ok(row)
    }

    pub async fn delete(&self, key: &str, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        let entity = Self::entity(key)?;
        if !self.repo.soft_delete(entity, id, actor.id_user).await? {
            return Err(not_found());
        }
        self.audit.record(actor, entity.key, "delete", id.to_string()).await;
        Ok(())
    }
}

fn not_found() -> ServiceError {
    ServiceError::not_found("Data tidak ditemukan")
}

/// Short audit text: the row's `nama` or `kode` when it has one, else its id
fn describe(row: &Value) -> String {
    ["nama", "kode", "id"]
        .iter()
        .find_map(|key| row.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}
