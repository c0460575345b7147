use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use guardpost_core::payload::require_fields;
use guardpost_core::{DomainError, DomainResult, Entity, OrgId, OrgScoped, RecordId, UserId};
use guardpost_guards::GuardId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceId(pub RecordId);

impl AttendanceId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AttendanceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
    OffDay,
}

/// One guard's attendance mark for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub org_id: OrgId,
    pub guard_id: GuardId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_by: UserId,
    pub note: Option<String>,
}

impl Entity for AttendanceRecord {
    type Id = AttendanceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OrgScoped for AttendanceRecord {
    fn org_id(&self) -> OrgId {
        self.org_id
    }
}

/// A single attendance mark to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub guard_id: GuardId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub note: Option<String>,
}

/// A leave request payload: an inclusive date range for one guard.
///
/// Approval materializes one `Leave` attendance record per day in the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRange {
    pub guard_id: GuardId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

impl LeaveRange {
    pub const REQUIRED_FIELDS: &'static [&'static str] = &["guard_id", "from", "to"];

    /// 62 days covers any two consecutive months; longer ranges are almost
    /// always data-entry mistakes.
    pub const MAX_DAYS: i64 = 62;

    pub fn from_payload(payload: &JsonValue) -> DomainResult<Self> {
        require_fields(payload, Self::REQUIRED_FIELDS)?;

        let range: LeaveRange = serde_json::from_value(payload.clone())
            .map_err(|e| DomainError::validation(format!("malformed leave payload: {e}")))?;

        if range.to < range.from {
            return Err(DomainError::validation("leave range ends before it starts"));
        }
        if range.day_count() > Self::MAX_DAYS {
            return Err(DomainError::validation(format!(
                "leave range exceeds {} days",
                Self::MAX_DAYS
            )));
        }

        Ok(range)
    }

    pub fn day_count(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Every date in the inclusive range.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from.iter_days().take_while(move |d| *d <= self.to)
    }
}

/// Org-scoped attendance persistence.
pub trait AttendanceRepository: Send + Sync {
    /// Insert one mark. Fails with `Conflict` when the guard already has a
    /// mark for that date.
    fn mark(
        &self,
        org_id: OrgId,
        new: NewAttendance,
        marked_by: UserId,
    ) -> DomainResult<AttendanceRecord>;

    fn list_for_guard(&self, org_id: OrgId, guard_id: GuardId)
        -> DomainResult<Vec<AttendanceRecord>>;
}
