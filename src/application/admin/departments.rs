use uuid::Uuid;

use crate::application::admin::resource::{Resource, optional_text, require_code, require_text};
use crate::domain::entities::DepartmentRecord;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Default)]
pub struct CreateDepartment {
    pub code: String,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub sort_order: i32,
    pub leader: Option<String>,
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DepartmentPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
    pub sort_order: Option<i32>,
    pub leader: Option<Option<String>>,
    pub remark: Option<Option<String>>,
}

pub struct DepartmentResource;

impl Resource for DepartmentResource {
    const ENTITY: &'static str = "department";
    const UNIQUE_FIELD: &'static str = "code";
    const DEFAULT_PAGE_SIZE: u32 = 10;

    type Record = DepartmentRecord;
    type Create = CreateDepartment;
    type Patch = DepartmentPatch;
    type UniqueKey = String;

    fn id_of(record: &DepartmentRecord) -> Uuid {
        record.id
    }

    fn unique_key_of(record: &DepartmentRecord) -> String {
        record.code.clone()
    }

    fn unique_key_of_create(input: &CreateDepartment) -> String {
        input.code.clone()
    }

    fn normalize_create(input: CreateDepartment) -> Result<CreateDepartment, DomainError> {
        Ok(CreateDepartment {
            code: require_code(&input.code, "code")?,
            name: require_text(&input.name, "name", 128)?,
            parent_id: input.parent_id,
            sort_order: input.sort_order,
            leader: optional_text(input.leader, "leader", 64)?,
            remark: optional_text(input.remark, "remark", 512)?,
        })
    }

    fn merge(
        mut existing: DepartmentRecord,
        patch: DepartmentPatch,
    ) -> Result<DepartmentRecord, DomainError> {
        if let Some(code) = patch.code {
            existing.code = require_code(&code, "code")?;
        }
        if let Some(name) = patch.name {
            existing.name = require_text(&name, "name", 128)?;
        }
        if let Some(parent_id) = patch.parent_id {
            if parent_id == Some(existing.id) {
                return Err(DomainError::validation(
                    "a department cannot be its own parent",
                ));
            }
            existing.parent_id = parent_id;
        }
        if let Some(sort_order) = patch.sort_order {
            existing.sort_order = sort_order;
        }
        if let Some(leader) = patch.leader {
            existing.leader = optional_text(leader, "leader", 64)?;
        }
        if let Some(remark) = patch.remark {
            existing.remark = optional_text(remark, "remark", 512)?;
        }
        Ok(existing)
    }
}

#[cfg(test)]
mod fixture {
    use time::OffsetDateTime;

    use super::*;
    use crate::application::admin::testing::Fixture;

    impl Fixture for DepartmentResource {
        fn materialize(id: Uuid, input: CreateDepartment, now: OffsetDateTime) -> DepartmentRecord {
            DepartmentRecord {
                id,
                code: input.code,
                name: input.name,
                parent_id: input.parent_id,
                sort_order: input.sort_order,
                leader: input.leader,
                remark: input.remark,
                created_at: now,
                updated_at: now,
            }
        }

        fn matches(record: &DepartmentRecord, keyword: &str) -> bool {
            record.code.contains(keyword)
                || record.name.contains(keyword)
                || record
                    .leader
                    .as_deref()
                    .is_some_and(|text| text.contains(keyword))
        }

        fn created_at(record: &DepartmentRecord) -> OffsetDateTime {
            record.created_at
        }

        fn touch(record: &mut DepartmentRecord, now: OffsetDateTime) {
            record.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn existing() -> DepartmentRecord {
        DepartmentRecord {
            id: Uuid::new_v4(),
            code: "rnd".into(),
            name: "R&D".into(),
            parent_id: None,
            sort_order: 0,
            leader: None,
            remark: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn self_parenting_is_rejected() {
        let record = existing();
        let id = record.id;

        let result = DepartmentResource::merge(
            record,
            DepartmentPatch {
                parent_id: Some(Some(id)),
                ..DepartmentPatch::default()
            },
        );

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn reparenting_and_detaching_apply() {
        let parent = Uuid::new_v4();
        let moved = DepartmentResource::merge(
            existing(),
            DepartmentPatch {
                parent_id: Some(Some(parent)),
                sort_order: Some(3),
                ..DepartmentPatch::default()
            },
        )
        .unwrap();
        assert_eq!(moved.parent_id, Some(parent));
        assert_eq!(moved.sort_order, 3);

        let detached = DepartmentResource::merge(
            moved,
            DepartmentPatch {
                parent_id: Some(None),
                ..DepartmentPatch::default()
            },
        )
        .unwrap();
        assert_eq!(detached.parent_id, None);
    }
}
