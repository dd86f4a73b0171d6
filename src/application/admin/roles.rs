use uuid::Uuid;

use crate::application::admin::resource::{Resource, optional_text, require_code, require_text};
use crate::domain::entities::RoleRecord;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub struct CreateRole {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RolePatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub enabled: Option<bool>,
}

pub struct RoleResource;

impl Resource for RoleResource {
    const ENTITY: &'static str = "role";
    const UNIQUE_FIELD: &'static str = "code";
    const DEFAULT_PAGE_SIZE: u32 = 10;

    type Record = RoleRecord;
    type Create = CreateRole;
    type Patch = RolePatch;
    type UniqueKey = String;

    fn id_of(record: &RoleRecord) -> Uuid {
        record.id
    }

    fn unique_key_of(record: &RoleRecord) -> String {
        record.code.clone()
    }

    fn unique_key_of_create(input: &CreateRole) -> String {
        input.code.clone()
    }

    fn normalize_create(input: CreateRole) -> Result<CreateRole, DomainError> {
        Ok(CreateRole {
            code: require_code(&input.code, "code")?,
            name: require_text(&input.name, "name", 64)?,
            description: optional_text(input.description, "description", 512)?,
            enabled: input.enabled,
        })
    }

    fn merge(mut existing: RoleRecord, patch: RolePatch) -> Result<RoleRecord, DomainError> {
        if let Some(code) = patch.code {
            existing.code = require_code(&code, "code")?;
        }
        if let Some(name) = patch.name {
            existing.name = require_text(&name, "name", 64)?;
        }
        if let Some(description) = patch.description {
            existing.description = optional_text(description, "description", 512)?;
        }
        if let Some(enabled) = patch.enabled {
            existing.enabled = enabled;
        }
        Ok(existing)
    }
}

#[cfg(test)]
mod fixture {
    use time::OffsetDateTime;

    use super::*;
    use crate::application::admin::testing::Fixture;

    impl Fixture for RoleResource {
        fn materialize(id: Uuid, input: CreateRole, now: OffsetDateTime) -> RoleRecord {
            RoleRecord {
                id,
                code: input.code,
                name: input.name,
                description: input.description,
                enabled: input.enabled,
                created_at: now,
                updated_at: now,
            }
        }

        fn matches(record: &RoleRecord, keyword: &str) -> bool {
            record.code.contains(keyword)
                || record.name.contains(keyword)
                || record
                    .description
                    .as_deref()
                    .is_some_and(|text| text.contains(keyword))
        }

        fn created_at(record: &RoleRecord) -> OffsetDateTime {
            record.created_at
        }

        fn touch(record: &mut RoleRecord, now: OffsetDateTime) {
            record.updated_at = now;
        }
    }
}
