//! `guardpost-attendance` — daily attendance marking and leave ranges.

pub mod attendance;

pub use attendance::{
    AttendanceId, AttendanceRecord, AttendanceRepository, AttendanceStatus, LeaveRange,
    NewAttendance,
};
