use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::model::{
    summarize, Applicant, Application, NewApplication, NewSlot, NewStudent, Slot, SlotId,
    SlotSummary, SlotUpdate, Student, StudentId, TeacherId,
};
use crate::profile::ProfileDirectory;
use crate::store::ReservationStore;

/// Entry point for callers: the four reservation operations, slot administration and
/// student rosters.
///
/// Wraps a [`ReservationStore`] and a [`ProfileDirectory`]. Mutations go straight to
/// the store's atomic operations; the listing operations add the joins the store
/// does not do (slot lookup per application, live profile fields per applicant).
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
///
/// use slot_reservation_store::{
///     MemoryProfiles, MemoryStore, NewSlot, ReservationError, Reservations, SlotStatus,
///     TeacherId,
/// };
///
/// # async fn example() -> Result<(), ReservationError> {
/// let reservations = Reservations::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(MemoryProfiles::new()),
/// );
/// let slot = reservations
///     .create_slot(NewSlot {
///         school: "Cheomdan Middle".into(),
///         date: "2026-02-20".into(),
///         primary_capacity: 1,
///         ..Default::default()
///     })
///     .await?;
///
/// let teacher = TeacherId::from("teacher-1");
/// reservations
///     .apply(&slot.id, &teacher, "lee@example.org", "Lee")
///     .await?;
///
/// let slots = reservations.list_slots().await?;
/// assert_eq!(slots[0].status(), SlotStatus::Closed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Reservations {
    store: Arc<dyn ReservationStore>,
    profiles: Arc<dyn ProfileDirectory>,
}

impl Reservations {
    /// Wires a store and a profile directory together.
    pub fn new(store: Arc<dyn ReservationStore>, profiles: Arc<dyn ProfileDirectory>) -> Self {
        Self { store, profiles }
    }

    /// The backing store, for operations the facade does not wrap.
    pub fn store(&self) -> &Arc<dyn ReservationStore> {
        &self.store
    }

    /// Applies `teacher_id` to `slot_id`, snapshotting the given email and name.
    ///
    /// # Errors
    ///
    /// `SlotNotFound`, `AlreadyApplied`, `SlotFull` or `TransientStore`; on any error
    /// neither the slot nor the ledger has changed.
    #[instrument(skip(self, teacher_email, teacher_name))]
    pub async fn apply(
        &self,
        slot_id: &SlotId,
        teacher_id: &TeacherId,
        teacher_email: &str,
        teacher_name: &str,
    ) -> Result<Application> {
        self.store
            .apply(NewApplication {
                slot_id: slot_id.clone(),
                teacher_id: teacher_id.clone(),
                teacher_email: teacher_email.to_string(),
                teacher_name: teacher_name.to_string(),
            })
            .await
    }

    /// Withdraws an application. Cancelling something that does not exist succeeds.
    #[instrument(skip(self))]
    pub async fn cancel(&self, slot_id: &SlotId, teacher_id: &TeacherId) -> Result<()> {
        self.store.cancel(slot_id, teacher_id).await
    }

    /// All slots by ascending date.
    pub async fn list_slots(&self) -> Result<Vec<Slot>> {
        self.store.list_slots().await
    }

    /// Dashboard totals over all slots.
    pub async fn summary(&self) -> Result<SlotSummary> {
        let slots = self.store.list_slots().await?;
        Ok(summarize(&slots))
    }

    /// A teacher's applications joined with their slots.
    ///
    /// Applications whose slot no longer exists are left out without an error.
    #[instrument(skip(self))]
    pub async fn list_applications_for_teacher(
        &self,
        teacher_id: &TeacherId,
    ) -> Result<Vec<(Application, Slot)>> {
        let applications = self.store.applications_by_teacher(teacher_id).await?;
        let mut joined = Vec::with_capacity(applications.len());
        for application in applications {
            match self.store.get_slot(&application.slot_id).await? {
                Some(slot) => joined.push((application, slot)),
                None => debug!(slot_id = %application.slot_id, "skipping orphaned application"),
            }
        }
        Ok(joined)
    }

    /// Roster of a slot, newest application first, with live school and phone.
    ///
    /// A failed profile lookup is logged and leaves that applicant's fields blank.
    #[instrument(skip(self))]
    pub async fn list_applications_for_slot(&self, slot_id: &SlotId) -> Result<Vec<Applicant>> {
        let applications = self.store.applications_by_slot(slot_id).await?;
        let mut roster = Vec::with_capacity(applications.len());
        for application in applications {
            let (school, phone) = match self.profiles.profile(&application.teacher_id).await {
                Ok(Some(profile)) => (profile.school, profile.phone),
                Ok(None) => (String::new(), String::new()),
                Err(e) => {
                    warn!(
                        teacher_id = %application.teacher_id,
                        error = %e,
                        "profile lookup failed, leaving roster fields blank"
                    );
                    (String::new(), String::new())
                }
            };
            roster.push(Applicant {
                application,
                school,
                phone,
            });
        }
        Ok(roster)
    }

    /// One slot, or `None` if it does not exist.
    pub async fn get_slot(&self, slot_id: &SlotId) -> Result<Option<Slot>> {
        self.store.get_slot(slot_id).await
    }

    /// Creates a slot with a fresh id and no applications.
    #[instrument(skip(self))]
    pub async fn create_slot(&self, slot: NewSlot) -> Result<Slot> {
        self.store.create_slot(slot).await
    }

    /// Edits descriptive fields or capacities; `applied_count` is left alone.
    #[instrument(skip(self))]
    pub async fn update_slot(&self, slot_id: &SlotId, update: SlotUpdate) -> Result<Slot> {
        self.store.update_slot(slot_id, update).await
    }

    /// Deletes a slot together with its applications and student roster.
    #[instrument(skip(self))]
    pub async fn delete_slot(&self, slot_id: &SlotId) -> Result<()> {
        self.store.delete_slot(slot_id).await
    }

    /// Students booked on a slot, in the order they were added.
    pub async fn list_students(&self, slot_id: &SlotId) -> Result<Vec<Student>> {
        self.store.list_students(slot_id).await
    }

    #[instrument(skip(self, student))]
    pub async fn add_student(&self, slot_id: &SlotId, student: NewStudent) -> Result<Student> {
        self.store.add_student(slot_id, student).await
    }

    /// Adds a batch, e.g. rows parsed from an uploaded sheet, all or nothing.
    #[instrument(skip(self, students), fields(count = students.len()))]
    pub async fn add_students(
        &self,
        slot_id: &SlotId,
        students: Vec<NewStudent>,
    ) -> Result<Vec<Student>> {
        self.store.add_students(slot_id, students).await
    }

    #[instrument(skip(self))]
    pub async fn delete_student(&self, slot_id: &SlotId, student_id: &StudentId) -> Result<()> {
        self.store.delete_student(slot_id, student_id).await
    }

    /// Empties a slot's roster, returning the number of students removed.
    #[instrument(skip(self))]
    pub async fn delete_all_students(&self, slot_id: &SlotId) -> Result<u64> {
        self.store.delete_all_students(slot_id).await
    }

    /// Roster size of every slot, for the dashboard's per-slot student column.
    pub async fn student_counts(&self) -> Result<BTreeMap<SlotId, u64>> {
        let slot_ids: Vec<SlotId> = self
            .store
            .list_slots()
            .await?
            .into_iter()
            .map(|slot| slot.id)
            .collect();
        self.store.student_counts(&slot_ids).await
    }
}
