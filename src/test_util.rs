// (c) Copyright 2025 Helsing GmbH. All rights reserved.
use crate::key::Keyed;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output into the test harness. Set `RUST_LOG` to see it.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A submitted user-role association.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct UserRoleDto {
    pub user_id: u64,
    pub role_code: String,
}

impl UserRoleDto {
    pub fn new(user_id: u64, role_code: &str) -> Self {
        Self {
            user_id,
            role_code: role_code.to_string(),
        }
    }
}

/// A stored user-role association, with its own row id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct UserRole {
    pub id: u64,
    pub user_id: u64,
    pub role_code: String,
}

impl UserRole {
    pub fn new(id: u64, user_id: u64, role_code: &str) -> Self {
        Self {
            id,
            user_id,
            role_code: role_code.to_string(),
        }
    }
}

/// `(user_id, role_code)` identifies a user-role association on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct UserRoleKey {
    pub user_id: u64,
    pub role_code: String,
}

impl UserRoleKey {
    pub fn from_dto(dto: &UserRoleDto) -> Self {
        Self {
            user_id: dto.user_id,
            role_code: dto.role_code.clone(),
        }
    }

    pub fn from_entity(row: &UserRole) -> Self {
        Self {
            user_id: row.user_id,
            role_code: row.role_code.clone(),
        }
    }
}

impl Keyed for UserRoleDto {
    type Key = UserRoleKey;

    fn key(&self) -> UserRoleKey {
        UserRoleKey::from_dto(self)
    }
}

impl Keyed for UserRole {
    type Key = UserRoleKey;

    fn key(&self) -> UserRoleKey {
        UserRoleKey::from_entity(self)
    }
}
