use uuid::Uuid;

use crate::application::admin::resource::{Resource, optional_text, require_code, require_text};
use crate::domain::entities::UserRecord;
use crate::domain::error::DomainError;
use crate::domain::types::UserStatus;

#[derive(Debug, Clone, Default)]
pub struct CreateUser {
    pub username: String,
    pub nickname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<Uuid>,
    pub status: UserStatus,
    pub remark: Option<String>,
}

/// `username` is the login name and never changes.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub department_id: Option<Option<Uuid>>,
    pub status: Option<UserStatus>,
    pub remark: Option<Option<String>>,
}

pub struct UserResource;

impl Resource for UserResource {
    const ENTITY: &'static str = "user";
    const UNIQUE_FIELD: &'static str = "username";
    const DEFAULT_PAGE_SIZE: u32 = 10;

    type Record = UserRecord;
    type Create = CreateUser;
    type Patch = UserPatch;
    type UniqueKey = String;

    fn id_of(record: &UserRecord) -> Uuid {
        record.id
    }

    fn unique_key_of(record: &UserRecord) -> String {
        record.username.clone()
    }

    fn unique_key_of_create(input: &CreateUser) -> String {
        input.username.clone()
    }

    fn normalize_create(input: CreateUser) -> Result<CreateUser, DomainError> {
        Ok(CreateUser {
            username: require_code(&input.username, "username")?,
            nickname: require_text(&input.nickname, "nickname", 64)?,
            email: email(input.email)?,
            phone: phone(input.phone)?,
            department_id: input.department_id,
            status: input.status,
            remark: optional_text(input.remark, "remark", 512)?,
        })
    }

    fn merge(mut existing: UserRecord, patch: UserPatch) -> Result<UserRecord, DomainError> {
        if let Some(nickname) = patch.nickname {
            existing.nickname = require_text(&nickname, "nickname", 64)?;
        }
        if let Some(value) = patch.email {
            existing.email = email(value)?;
        }
        if let Some(value) = patch.phone {
            existing.phone = phone(value)?;
        }
        if let Some(department_id) = patch.department_id {
            existing.department_id = department_id;
        }
        if let Some(status) = patch.status {
            existing.status = status;
        }
        if let Some(remark) = patch.remark {
            existing.remark = optional_text(remark, "remark", 512)?;
        }
        Ok(existing)
    }
}

fn email(value: Option<String>) -> Result<Option<String>, DomainError> {
    let email = optional_text(value, "email", 254)?;
    if let Some(address) = &email {
        let well_formed = address
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(DomainError::validation(format!(
                "email `{address}` is not an address"
            )));
        }
    }
    Ok(email)
}

fn phone(value: Option<String>) -> Result<Option<String>, DomainError> {
    let phone = optional_text(value, "phone", 32)?;
    if let Some(number) = &phone {
        let plausible = number
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | ' ' | '(' | ')'));
        if !plausible {
            return Err(DomainError::validation(format!(
                "phone `{number}` contains unexpected characters"
            )));
        }
    }
    Ok(phone)
}

#[cfg(test)]
mod fixture {
    use time::OffsetDateTime;

    use super::*;
    use crate::application::admin::testing::Fixture;

    impl Fixture for UserResource {
        fn materialize(id: Uuid, input: CreateUser, now: OffsetDateTime) -> UserRecord {
            UserRecord {
                id,
                username: input.username,
                nickname: input.nickname,
                email: input.email,
                phone: input.phone,
                department_id: input.department_id,
                status: input.status,
                remark: input.remark,
                created_at: now,
                updated_at: now,
            }
        }

        fn matches(record: &UserRecord, keyword: &str) -> bool {
            record.username.contains(keyword)
                || record.nickname.contains(keyword)
                || record.email.as_deref().is_some_and(|v| v.contains(keyword))
                || record.phone.as_deref().is_some_and(|v| v.contains(keyword))
        }

        fn created_at(record: &UserRecord) -> OffsetDateTime {
            record.created_at
        }

        fn touch(record: &mut UserRecord, now: OffsetDateTime) {
            record.updated_at = now;
        }
    }
}
