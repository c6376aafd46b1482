use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: u64,
    pub employee_id: u64,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub project_id: Option<u64>,
}

/// Attendance joined with its project name, as listed to the client.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AttendanceEntry {
    pub id: u64,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub project_id: Option<u64>,
    pub project_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendancePatch {
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
}

impl AttendancePatch {
    pub fn is_empty(&self) -> bool {
        self.check_in.is_none() && self.check_out.is_none()
    }

    pub fn apply(&self, attendance: &mut Attendance) {
        if let Some(check_in) = self.check_in {
            attendance.check_in = Some(check_in);
        }
        if let Some(check_out) = self.check_out {
            attendance.check_out = Some(check_out);
        }
    }
}

/// Half-open check-in window `[start, end)` covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayWindow {
    pub fn for_date(day: NaiveDate) -> Self {
        let start = day.and_time(chrono::NaiveTime::MIN);
        // Only NaiveDate::MAX has no successor.
        let end = day
            .checked_add_days(Days::new(1))
            .map(|next| next.and_time(chrono::NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MAX);
        Self { start, end }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn window_is_half_open_over_the_day() {
        let window = DayWindow::for_date(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());

        assert!(window.contains(at("2026-03-31 00:00:00")));
        assert!(window.contains(at("2026-03-31 23:59:59")));
        assert!(!window.contains(at("2026-04-01 00:00:00")));
        assert!(!window.contains(at("2026-03-30 23:59:59")));
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut attendance = Attendance {
            id: 7,
            employee_id: 1,
            check_in: Some(at("2026-03-31 08:00:00")),
            check_out: None,
            project_id: Some(3),
        };

        AttendancePatch {
            check_in: None,
            check_out: Some(at("2026-03-31 17:30:00")),
        }
        .apply(&mut attendance);

        assert_eq!(attendance.check_in, Some(at("2026-03-31 08:00:00")));
        assert_eq!(attendance.check_out, Some(at("2026-03-31 17:30:00")));
        assert_eq!(attendance.project_id, Some(3));
    }
}
