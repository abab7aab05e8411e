//! Domain types shared by every store backend.
//!
//! Everything in here is plain data plus the capacity rules that both backends
//! run inside their atomic sections ([`check_admission`], [`released_count`]).
//! Nothing in this module touches storage.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ReservationError;

/// Opaque identifier of a [`Slot`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    /// Wraps an existing id, e.g. one read back from storage.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random id for a newly created slot.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SlotId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of a teacher, owned by the profile collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(String);

impl TeacherId {
    /// Wraps the id issued by the profile collaborator.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeacherId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TeacherId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Current time truncated to microseconds, the finest precision every backend keeps.
pub fn current_timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    let micros = now.nanosecond() / 1_000 * 1_000;
    now.replace_nanosecond(micros).unwrap_or(now)
}

/// Display id of an application: `"{slot_id}_{teacher_id}"`.
///
/// Ids may themselves contain `_`, so two different pairs can share this string.
/// Stores key the ledger by the `(slot_id, teacher_id)` pair and only carry this
/// value along as a label.
pub fn application_key(slot_id: &SlotId, teacher_id: &TeacherId) -> String {
    format!("{}_{}", slot_id, teacher_id)
}

/// Largest `primary_capacity + waitlist_capacity` a slot may have.
///
/// Capacities are stored as 32-bit signed integers and the apply guard adds the two
/// columns together, so the sum has to fit as well.
pub const MAX_CAPACITY: u32 = i32::MAX as u32;

/// Rejects capacities whose total would not fit [`MAX_CAPACITY`].
pub fn check_capacity(primary: u32, waitlist: u32) -> Result<(), ReservationError> {
    let total = u64::from(primary) + u64::from(waitlist);
    if total > u64::from(MAX_CAPACITY) {
        return Err(ReservationError::CapacityTooLarge { capacity: total });
    }
    Ok(())
}

/// A schedulable counseling session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub school: String,
    pub region: String,
    /// `YYYY-MM-DD`; listings sort on it lexicographically.
    pub date: String,
    pub time_window: String,
    pub primary_capacity: u32,
    pub waitlist_capacity: u32,
    pub applied_count: u32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Slot {
    /// Builds a slot from an administrator's input, with no applications yet.
    ///
    /// # Errors
    ///
    /// [`ReservationError::CapacityTooLarge`] if the capacities exceed [`MAX_CAPACITY`].
    pub fn from_new(
        id: SlotId,
        new: NewSlot,
        now: OffsetDateTime,
    ) -> Result<Self, ReservationError> {
        check_capacity(new.primary_capacity, new.waitlist_capacity)?;
        Ok(Self {
            id,
            school: new.school,
            region: new.region,
            date: new.date,
            time_window: new.time_window,
            primary_capacity: new.primary_capacity,
            waitlist_capacity: new.waitlist_capacity,
            applied_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn total_capacity(&self) -> u32 {
        self.primary_capacity.saturating_add(self.waitlist_capacity)
    }

    pub fn status(&self) -> SlotStatus {
        SlotStatus::derive(
            self.applied_count,
            self.primary_capacity,
            self.waitlist_capacity,
        )
    }

    pub fn is_full(&self) -> bool {
        self.applied_count >= self.total_capacity()
    }

    /// Primary seats still free.
    pub fn remaining_primary(&self) -> u32 {
        self.primary_capacity.saturating_sub(self.applied_count)
    }

    /// Waitlist seats still free. Waitlist seats only fill once primary is exhausted.
    pub fn remaining_waitlist(&self) -> u32 {
        let used = self.applied_count.saturating_sub(self.primary_capacity);
        self.waitlist_capacity.saturating_sub(used)
    }

    pub fn remaining_seats(&self) -> u32 {
        self.total_capacity().saturating_sub(self.applied_count)
    }

    /// Applies an administrator's patch. `applied_count` is never touched.
    ///
    /// # Errors
    ///
    /// [`ReservationError::CapacityBelowApplied`] if the new capacities could no
    /// longer hold the current applicants, [`ReservationError::CapacityTooLarge`] if
    /// they exceed [`MAX_CAPACITY`]. `self` is left unchanged in both cases.
    pub fn apply_update(
        &mut self,
        update: SlotUpdate,
        now: OffsetDateTime,
    ) -> Result<(), ReservationError> {
        let primary = update.primary_capacity.unwrap_or(self.primary_capacity);
        let waitlist = update.waitlist_capacity.unwrap_or(self.waitlist_capacity);
        check_capacity(primary, waitlist)?;
        let capacity = primary.saturating_add(waitlist);
        if capacity < self.applied_count {
            return Err(ReservationError::CapacityBelowApplied {
                slot_id: self.id.clone(),
                applied: self.applied_count,
                capacity,
            });
        }

        if let Some(school) = update.school {
            self.school = school;
        }
        if let Some(region) = update.region {
            self.region = region;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(time_window) = update.time_window {
            self.time_window = time_window;
        }
        self.primary_capacity = primary;
        self.waitlist_capacity = waitlist;
        self.updated_at = now;
        Ok(())
    }
}

/// Administrator input for [`crate::ReservationStore::create_slot`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSlot {
    pub school: String,
    pub region: String,
    pub date: String,
    pub time_window: String,
    pub primary_capacity: u32,
    pub waitlist_capacity: u32,
}

/// Partial edit of a slot. `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotUpdate {
    pub school: Option<String>,
    pub region: Option<String>,
    pub date: Option<String>,
    pub time_window: Option<String>,
    pub primary_capacity: Option<u32>,
    pub waitlist_capacity: Option<u32>,
}

/// Read-time classification of a slot. Never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotStatus {
    Waiting,
    InProgress,
    WaitlistOpen,
    Closed,
}

impl SlotStatus {
    /// `closed` wins over `waitlist-open`, which wins over `in-progress`.
    pub fn derive(applied: u32, primary: u32, waitlist: u32) -> Self {
        if applied >= primary.saturating_add(waitlist) {
            Self::Closed
        } else if applied >= primary {
            Self::WaitlistOpen
        } else if applied > 0 {
            Self::InProgress
        } else {
            Self::Waiting
        }
    }

    /// Whether primary seats are still on offer.
    pub fn is_recruiting(self) -> bool {
        matches!(self, Self::Waiting | Self::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in-progress",
            Self::WaitlistOpen => "waitlist-open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only `Applied` is modeled; a cancelled application is deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
        }
    }

    /// Unknown stored values read back as `Applied`.
    pub fn parse(_value: &str) -> Self {
        Self::Applied
    }
}

/// A teacher's claim on a slot.
///
/// `teacher_email` and `teacher_name` are snapshots taken at apply time and are
/// not refreshed when the profile changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub slot_id: SlotId,
    pub teacher_id: TeacherId,
    pub teacher_email: String,
    pub teacher_name: String,
    pub status: ApplicationStatus,
    pub created_at: OffsetDateTime,
}

impl Application {
    /// The `"{slot_id}_{teacher_id}"` label, see [`application_key`].
    pub fn key(&self) -> String {
        application_key(&self.slot_id, &self.teacher_id)
    }
}

/// Input of [`crate::ReservationStore::apply`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub slot_id: SlotId,
    pub teacher_id: TeacherId,
    pub teacher_email: String,
    pub teacher_name: String,
}

impl NewApplication {
    /// Stamps the application with its apply time.
    pub fn into_application(self, now: OffsetDateTime) -> Application {
        Application {
            slot_id: self.slot_id,
            teacher_id: self.teacher_id,
            teacher_email: self.teacher_email,
            teacher_name: self.teacher_name,
            status: ApplicationStatus::Applied,
            created_at: now,
        }
    }
}

/// Roster entry: an application joined with live profile fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub application: Application,
    /// Empty when the profile is missing or could not be fetched.
    pub school: String,
    pub phone: String,
}

/// Decides whether a new application may be admitted to `slot`.
///
/// Both backends call this inside their atomic section, after reading the slot
/// and checking the ledger. The duplicate check comes before the capacity check.
pub fn check_admission(
    slot: &Slot,
    teacher_id: &TeacherId,
    already_applied: bool,
) -> Result<(), ReservationError> {
    if already_applied {
        return Err(ReservationError::AlreadyApplied {
            slot_id: slot.id.clone(),
            teacher_id: teacher_id.clone(),
        });
    }
    if slot.is_full() {
        return Err(ReservationError::SlotFull {
            slot_id: slot.id.clone(),
        });
    }
    Ok(())
}

/// Applied count after one cancellation, floored at zero.
pub fn released_count(applied: u32) -> u32 {
    applied.saturating_sub(1)
}

/// Dashboard totals over a set of slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub slots: usize,
    pub primary_seats: u64,
    pub waitlist_seats: u64,
    pub applied: u64,
    pub closed: usize,
}

pub fn summarize<'a>(slots: impl IntoIterator<Item = &'a Slot>) -> SlotSummary {
    slots
        .into_iter()
        .fold(SlotSummary::default(), |mut summary, slot| {
            summary.slots += 1;
            summary.primary_seats += u64::from(slot.primary_capacity);
            summary.waitlist_seats += u64::from(slot.waitlist_capacity);
            summary.applied += u64::from(slot.applied_count);
            if slot.status() == SlotStatus::Closed {
                summary.closed += 1;
            }
            summary
        })
}

/// Identifier of a [`Student`] on a slot's roster.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StudentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StudentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A student booked for counseling during a slot.
///
/// Grade, class and number are kept as entered; schools write them in
/// different ways.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub slot_id: SlotId,
    pub grade: String,
    pub class_num: String,
    pub number: String,
    pub name: String,
    pub gender: String,
    pub notes: String,
    pub created_at: OffsetDateTime,
}

/// Input of [`crate::ReservationStore::add_student`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub grade: String,
    pub class_num: String,
    pub number: String,
    pub name: String,
    pub gender: String,
    pub notes: String,
}

impl NewStudent {
    pub fn into_student(self, id: StudentId, slot_id: SlotId, now: OffsetDateTime) -> Student {
        Student {
            id,
            slot_id,
            grade: self.grade,
            class_num: self.class_num,
            number: self.number,
            name: self.name,
            gender: self.gender,
            notes: self.notes,
            created_at: now,
        }
    }
}

/// Turns a batch into roster entries that list back in input order.
///
/// Each entry is stamped one microsecond after the previous one, so ordering by
/// `created_at` keeps the batch order.
pub fn enroll_students(
    slot_id: &SlotId,
    students: impl IntoIterator<Item = NewStudent>,
    now: OffsetDateTime,
) -> Vec<Student> {
    students
        .into_iter()
        .enumerate()
        .map(|(offset, student)| {
            let created_at = now + time::Duration::microseconds(offset as i64);
            student.into_student(StudentId::generate(), slot_id.clone(), created_at)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(primary: u32, waitlist: u32, applied: u32) -> Slot {
        let now = OffsetDateTime::UNIX_EPOCH;
        let mut slot = Slot::from_new(
            SlotId::from("s1"),
            NewSlot {
                school: "Hanbit Elementary".into(),
                region: "Seoul".into(),
                date: "2026-02-16".into(),
                time_window: "09:00-12:00".into(),
                primary_capacity: primary,
                waitlist_capacity: waitlist,
            },
            now,
        )
        .unwrap();
        slot.applied_count = applied;
        slot
    }

    #[test]
    fn status_follows_applied_count() {
        assert_eq!(slot(2, 1, 0).status(), SlotStatus::Waiting);
        assert_eq!(slot(2, 1, 1).status(), SlotStatus::InProgress);
        assert_eq!(slot(2, 1, 2).status(), SlotStatus::WaitlistOpen);
        assert_eq!(slot(2, 1, 3).status(), SlotStatus::Closed);
    }

    #[test]
    fn status_without_waitlist_skips_waitlist_open() {
        assert_eq!(slot(2, 0, 1).status(), SlotStatus::InProgress);
        assert_eq!(slot(2, 0, 2).status(), SlotStatus::Closed);
    }

    #[test]
    fn zero_capacity_slot_is_closed() {
        assert_eq!(slot(0, 0, 0).status(), SlotStatus::Closed);
        assert_eq!(slot(0, 2, 0).status(), SlotStatus::WaitlistOpen);
    }

    #[test]
    fn status_strings() {
        assert_eq!(SlotStatus::WaitlistOpen.to_string(), "waitlist-open");
        assert_eq!(SlotStatus::InProgress.as_str(), "in-progress");
        assert!(SlotStatus::Waiting.is_recruiting());
        assert!(!SlotStatus::Closed.is_recruiting());
    }

    #[test]
    fn remaining_seats_split_by_band() {
        let s = slot(3, 2, 1);
        assert_eq!(s.remaining_primary(), 2);
        assert_eq!(s.remaining_waitlist(), 2);
        assert_eq!(s.remaining_seats(), 4);

        let s = slot(3, 2, 4);
        assert_eq!(s.remaining_primary(), 0);
        assert_eq!(s.remaining_waitlist(), 1);
        assert_eq!(s.remaining_seats(), 1);
    }

    #[test]
    fn admission_rejects_duplicates_before_capacity() {
        let full = slot(1, 0, 1);
        let teacher = TeacherId::from("t1");
        assert!(matches!(
            check_admission(&full, &teacher, true),
            Err(ReservationError::AlreadyApplied { .. })
        ));
        assert!(matches!(
            check_admission(&full, &teacher, false),
            Err(ReservationError::SlotFull { .. })
        ));
        assert!(check_admission(&slot(1, 0, 0), &teacher, false).is_ok());
    }

    #[test]
    fn release_is_floored_at_zero() {
        assert_eq!(released_count(2), 1);
        assert_eq!(released_count(0), 0);
    }

    #[test]
    fn update_keeps_applied_count() {
        let mut s = slot(2, 1, 2);
        let later = OffsetDateTime::UNIX_EPOCH + time::Duration::hours(1);
        s.apply_update(
            SlotUpdate {
                school: Some("Haeundae Middle".into()),
                primary_capacity: Some(4),
                ..Default::default()
            },
            later,
        )
        .unwrap();
        assert_eq!(s.school, "Haeundae Middle");
        assert_eq!(s.primary_capacity, 4);
        assert_eq!(s.waitlist_capacity, 1);
        assert_eq!(s.applied_count, 2);
        assert_eq!(s.updated_at, later);
    }

    #[test]
    fn update_below_applied_is_rejected() {
        let mut s = slot(2, 1, 3);
        let before = s.clone();
        let err = s
            .apply_update(
                SlotUpdate {
                    waitlist_capacity: Some(0),
                    school: Some("ignored".into()),
                    ..Default::default()
                },
                OffsetDateTime::UNIX_EPOCH,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ReservationError::CapacityBelowApplied {
                applied: 3,
                capacity: 2,
                ..
            }
        ));
        assert_eq!(s, before);
    }

    #[test]
    fn summary_counts_closed_slots() {
        let slots = [slot(2, 1, 3), slot(3, 0, 1), slot(1, 1, 0)];
        let summary = summarize(&slots);
        assert_eq!(summary.slots, 3);
        assert_eq!(summary.primary_seats, 6);
        assert_eq!(summary.waitlist_seats, 2);
        assert_eq!(summary.applied, 4);
        assert_eq!(summary.closed, 1);
    }

    #[test]
    fn capacities_must_fit_the_stored_range() {
        let new = NewSlot {
            primary_capacity: u32::MAX,
            ..Default::default()
        };
        let err = Slot::from_new(SlotId::from("big"), new, OffsetDateTime::UNIX_EPOCH)
            .unwrap_err();
        assert_eq!(
            err,
            ReservationError::CapacityTooLarge {
                capacity: u64::from(u32::MAX)
            }
        );

        // Each band fits on its own but the total does not.
        assert!(check_capacity(MAX_CAPACITY, 1).is_err());
        assert!(check_capacity(MAX_CAPACITY - 1, 1).is_ok());

        let mut s = slot(2, 1, 0);
        let before = s.clone();
        let err = s
            .apply_update(
                SlotUpdate {
                    waitlist_capacity: Some(MAX_CAPACITY),
                    ..Default::default()
                },
                OffsetDateTime::UNIX_EPOCH,
            )
            .unwrap_err();
        assert!(matches!(err, ReservationError::CapacityTooLarge { .. }));
        assert_eq!(s, before);
    }

    #[test]
    fn enrolled_batch_keeps_input_order() {
        let slot_id = SlotId::from("s1");
        let names = ["Hong", "Kim", "Lee"];
        let students = enroll_students(
            &slot_id,
            names.iter().map(|name| NewStudent {
                name: name.to_string(),
                grade: "3".into(),
                ..Default::default()
            }),
            OffsetDateTime::UNIX_EPOCH,
        );

        assert_eq!(students.len(), 3);
        assert!(students
            .windows(2)
            .all(|pair| pair[0].created_at < pair[1].created_at));
        assert!(students.iter().all(|s| s.slot_id == slot_id));
        assert_ne!(students[0].id, students[1].id);
        let listed: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn application_key_is_composite() {
        assert_eq!(
            application_key(&SlotId::from("abc"), &TeacherId::from("uid-9")),
            "abc_uid-9"
        );
    }
}
