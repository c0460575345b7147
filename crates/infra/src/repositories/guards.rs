use guardpost_core::{DomainError, DomainResult, OrgId, RecordId};
use guardpost_guards::{Guard, GuardId, GuardRepository, GuardStatus, NewGuard};

use crate::tenant_store::{InMemoryTenantStore, TenantStore};

/// In-memory guard roster.
#[derive(Debug, Default)]
pub struct InMemoryGuardRepository {
    store: InMemoryTenantStore<GuardId, Guard>,
}

impl InMemoryGuardRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GuardRepository for InMemoryGuardRepository {
    fn create(&self, org_id: OrgId, new: NewGuard) -> DomainResult<Guard> {
        let duplicate = self
            .store
            .list(org_id)
            .into_iter()
            .any(|g| !g.deleted && g.badge_no == new.badge_no);
        if duplicate {
            return Err(DomainError::conflict(format!(
                "badge_no '{}' is already in use",
                new.badge_no
            )));
        }

        let guard = Guard {
            id: GuardId::new(RecordId::new()),
            org_id,
            badge_no: new.badge_no,
            full_name: new.full_name,
            national_id: new.national_id,
            phone: new.phone,
            branch_id: new.branch_id,
            hired_on: new.hired_on,
            monthly_rate: new.monthly_rate,
            status: GuardStatus::Active,
            deleted: false,
        };
        self.store.upsert(org_id, guard.id, guard.clone());
        Ok(guard)
    }

    fn update(&self, org_id: OrgId, guard: Guard) -> DomainResult<Guard> {
        if self.store.get(org_id, &guard.id).is_none() {
            return Err(DomainError::NotFound);
        }
        self.store.upsert(org_id, guard.id, guard.clone());
        Ok(guard)
    }

    fn get(&self, org_id: OrgId, id: GuardId) -> DomainResult<Guard> {
        match self.store.get(org_id, &id) {
            Some(guard) if !guard.deleted => Ok(guard),
            _ => Err(DomainError::NotFound),
        }
    }

    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Guard>> {
        let mut guards: Vec<Guard> = self
            .store
            .list(org_id)
            .into_iter()
            .filter(|g| !g.deleted)
            .collect();
        guards.sort_by(|a, b| a.badge_no.cmp(&b.badge_no));
        Ok(guards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_guard(badge_no: &str) -> NewGuard {
        NewGuard {
            badge_no: badge_no.to_string(),
            full_name: "Joseph Kamau".to_string(),
            national_id: "28817345".to_string(),
            phone: None,
            branch_id: None,
            hired_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            monthly_rate: 4_200_000,
        }
    }

    #[test]
    fn duplicate_badge_no_is_a_conflict() {
        let repo = InMemoryGuardRepository::new();
        let org_id = OrgId::new();

        repo.create(org_id, new_guard("G-0142")).unwrap();
        let err = repo.create(org_id, new_guard("G-0142")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Same badge in a different org is fine.
        repo.create(OrgId::new(), new_guard("G-0142")).unwrap();
    }

    #[test]
    fn list_excludes_soft_deleted_rows() {
        let repo = InMemoryGuardRepository::new();
        let org_id = OrgId::new();

        let kept = repo.create(org_id, new_guard("G-0001")).unwrap();
        let gone = repo.create(org_id, new_guard("G-0002")).unwrap();
        repo.update(
            org_id,
            Guard {
                deleted: true,
                ..gone
            },
        )
        .unwrap();

        let listed = repo.list(org_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, kept.id);
    }

    #[test]
    fn update_of_unknown_guard_is_not_found() {
        let repo = InMemoryGuardRepository::new();
        let org_id = OrgId::new();
        let guard = repo.create(org_id, new_guard("G-0001")).unwrap();

        let err = repo.update(OrgId::new(), guard).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }
}
