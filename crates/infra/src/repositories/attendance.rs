use guardpost_attendance::{
    AttendanceId, AttendanceRecord, AttendanceRepository, NewAttendance,
};
use guardpost_core::{DomainError, DomainResult, OrgId, RecordId, UserId};
use guardpost_guards::GuardId;

use crate::tenant_store::{InMemoryTenantStore, TenantStore};

/// In-memory attendance ledger.
#[derive(Debug, Default)]
pub struct InMemoryAttendanceRepository {
    store: InMemoryTenantStore<AttendanceId, AttendanceRecord>,
}

impl InMemoryAttendanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttendanceRepository for InMemoryAttendanceRepository {
    fn mark(
        &self,
        org_id: OrgId,
        new: NewAttendance,
        marked_by: UserId,
    ) -> DomainResult<AttendanceRecord> {
        let duplicate = self
            .store
            .list(org_id)
            .into_iter()
            .any(|r| r.guard_id == new.guard_id && r.date == new.date);
        if duplicate {
            return Err(DomainError::conflict(format!(
                "guard already has an attendance mark on {}",
                new.date
            )));
        }

        let record = AttendanceRecord {
            id: AttendanceId::new(RecordId::new()),
            org_id,
            guard_id: new.guard_id,
            date: new.date,
            status: new.status,
            marked_by,
            note: new.note,
        };
        self.store.upsert(org_id, record.id, record.clone());
        Ok(record)
    }

    fn list_for_guard(
        &self,
        org_id: OrgId,
        guard_id: GuardId,
    ) -> DomainResult<Vec<AttendanceRecord>> {
        let mut records: Vec<AttendanceRecord> = self
            .store
            .list(org_id)
            .into_iter()
            .filter(|r| r.guard_id == guard_id)
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}
