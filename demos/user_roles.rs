// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Replaces a user's role assignments twice against an in-memory table.
use keysync::{Diff, Handler, Keyed};
use std::{collections::BTreeMap, fmt};

/// A user-role association as submitted by a form.
#[derive(Debug)]
struct UserRoleDto {
    user_id: u64,
    role_code: String,
    granted_by: String,
}

/// A user-role association as stored.
#[derive(Debug, Clone)]
struct UserRole {
    id: u64,
    user_id: u64,
    role_code: String,
    granted_by: String,
}

/// `(user_id, role_code)` decides whether two records are the same association.
#[derive(Debug, PartialEq, Eq, Hash)]
struct UserRoleKey {
    user_id: u64,
    role_code: String,
}

impl Keyed for UserRoleDto {
    type Key = UserRoleKey;

    fn key(&self) -> UserRoleKey {
        UserRoleKey {
            user_id: self.user_id,
            role_code: self.role_code.clone(),
        }
    }
}

impl Keyed for UserRole {
    type Key = UserRoleKey;

    fn key(&self) -> UserRoleKey {
        UserRoleKey {
            user_id: self.user_id,
            role_code: self.role_code.clone(),
        }
    }
}

#[derive(Debug)]
struct ReadOnly(u64);

impl fmt::Display for ReadOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} is read-only", self.0)
    }
}

/// Stands in for a database table.
#[derive(Default)]
struct Store {
    rows: BTreeMap<u64, UserRole>,
    next_id: u64,
}

impl Handler<UserRoleDto, UserRole> for Store {
    type Error = ReadOnly;

    fn insert(&mut self, inserts: Vec<UserRoleDto>) -> Result<(), ReadOnly> {
        for dto in inserts {
            self.next_id += 1;
            println!("INSERT {} {} (by {})", dto.user_id, dto.role_code, dto.granted_by);
            self.rows.insert(
                self.next_id,
                UserRole {
                    id: self.next_id,
                    user_id: dto.user_id,
                    role_code: dto.role_code,
                    granted_by: dto.granted_by,
                },
            );
        }
        Ok(())
    }

    fn update(&mut self, updates: Vec<(UserRoleDto, UserRole)>) -> Result<(), ReadOnly> {
        for (dto, stored) in updates {
            let row = self.rows.get_mut(&stored.id).ok_or(ReadOnly(stored.id))?;
            println!("UPDATE row {}: granted_by {} -> {}", row.id, row.granted_by, dto.granted_by);
            row.granted_by = dto.granted_by;
        }
        Ok(())
    }

    fn delete(&mut self, deletes: Vec<UserRole>) -> Result<(), ReadOnly> {
        for row in deletes {
            println!("DELETE row {} ({} {})", row.id, row.user_id, row.role_code);
            self.rows.remove(&row.id);
        }
        Ok(())
    }
}

fn dto(user_id: u64, role_code: &str, granted_by: &str) -> UserRoleDto {
    UserRoleDto {
        user_id,
        role_code: role_code.to_string(),
        granted_by: granted_by.to_string(),
    }
}

fn main() {
    let mut store = Store::default();

    // first submission: everything is new
    let first = vec![dto(1, "ADMIN", "alice"), dto(1, "USER", "alice")];
    let stored: Vec<_> = store.rows.values().cloned().collect();
    if let Err(e) = Diff::compute_keyed(first, stored).apply(&mut store) {
        eprintln!("sync failed: {e}");
        return;
    }

    // second submission: ADMIN is kept (regranted by bob), USER is dropped, AUDITOR is new
    let second = vec![dto(1, "ADMIN", "bob"), dto(1, "AUDITOR", "bob")];
    let stored: Vec<_> = store.rows.values().cloned().collect();
    let diff = Diff::compute_keyed(second, stored);
    println!(
        "planned: {} insert(s), {} update(s), {} delete(s)",
        diff.inserts.len(),
        diff.updates.len(),
        diff.deletes.len()
    );
    if let Err(e) = diff.apply(&mut store) {
        eprintln!("sync failed: {e}");
        return;
    }

    for row in store.rows.values() {
        println!("{row:?}");
    }
}
