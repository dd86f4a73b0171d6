//! i18n modules: named groups of translation keys.

use uuid::Uuid;

use crate::application::admin::resource::{Resource, optional_text, require_code, require_text};
use crate::domain::entities::ModuleRecord;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub struct CreateModule {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub remark: Option<String>,
}

/// `code` is accepted but ignored: module codes are fixed once created.
#[derive(Debug, Clone, Default)]
pub struct ModulePatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub remark: Option<Option<String>>,
}

pub struct ModuleResource;

impl Resource for ModuleResource {
    const ENTITY: &'static str = "module";
    const UNIQUE_FIELD: &'static str = "code";
    const DEFAULT_PAGE_SIZE: u32 = 10;

    type Record = ModuleRecord;
    type Create = CreateModule;
    type Patch = ModulePatch;
    type UniqueKey = String;

    fn id_of(record: &ModuleRecord) -> Uuid {
        record.id
    }

    fn unique_key_of(record: &ModuleRecord) -> String {
        record.code.clone()
    }

    fn unique_key_of_create(input: &CreateModule) -> String {
        input.code.clone()
    }

    fn normalize_create(input: CreateModule) -> Result<CreateModule, DomainError> {
        Ok(CreateModule {
            code: require_code(&input.code, "code")?,
            name: require_text(&input.name, "name", 128)?,
            description: optional_text(input.description, "description", 512)?,
            remark: optional_text(input.remark, "remark", 512)?,
        })
    }

    fn merge(mut existing: ModuleRecord, patch: ModulePatch) -> Result<ModuleRecord, DomainError> {
        if let Some(name) = patch.name {
            existing.name = require_text(&name, "name", 128)?;
        }
        if let Some(description) = patch.description {
            existing.description = optional_text(description, "description", 512)?;
        }
        if let Some(remark) = patch.remark {
            existing.remark = optional_text(remark, "remark", 512)?;
        }
        Ok(existing)
    }
}
