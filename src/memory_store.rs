use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{ReservationError, Result};
use crate::model::{
    check_admission, current_timestamp, enroll_students, released_count, Application,
    NewApplication, NewSlot, NewStudent, Slot, SlotId, SlotUpdate, Student, StudentId,
    TeacherId,
};
use crate::store::ReservationStore;

type LedgerKey = (SlotId, TeacherId);

#[derive(Debug, Default)]
struct Ledger {
    slots: BTreeMap<SlotId, Slot>,
    applications: BTreeMap<LedgerKey, Application>,
    students: BTreeMap<SlotId, Vec<Student>>,
}

impl Ledger {
    fn require_slot(&self, slot_id: &SlotId) -> Result<()> {
        if self.slots.contains_key(slot_id) {
            Ok(())
        } else {
            Err(ReservationError::SlotNotFound {
                slot_id: slot_id.clone(),
            })
        }
    }
}

fn ledger_key(slot_id: &SlotId, teacher_id: &TeacherId) -> LedgerKey {
    (slot_id.clone(), teacher_id.clone())
}

/// Non-persistent store kept for the lifetime of the process.
///
/// Every operation holds a single lock across its read-check-write, so operations
/// are serialized and the capacity check can never race an increment. Clones
/// share the same state.
///
/// ```
/// use slot_reservation_store::{MemoryStore, NewSlot, ReservationStore};
///
/// # async fn example() -> Result<(), slot_reservation_store::ReservationError> {
/// let store = MemoryStore::new();
/// let slot = store
///     .create_slot(NewSlot {
///         school: "Dunsan High".into(),
///         date: "2026-02-18".into(),
///         primary_capacity: 4,
///         waitlist_capacity: 2,
///         ..Default::default()
///     })
///     .await?;
/// assert_eq!(slot.applied_count, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Ledger>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a fixed set of slots, e.g. demo data.
    ///
    /// Seeded counts are taken as given; no applications back them.
    pub fn with_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        let slots = slots
            .into_iter()
            .map(|slot| (slot.id.clone(), slot))
            .collect();
        Self {
            inner: Arc::new(Mutex::new(Ledger {
                slots,
                ..Ledger::default()
            })),
        }
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn apply(&self, application: NewApplication) -> Result<Application> {
        let mut ledger = self.inner.lock().await;
        let key = ledger_key(&application.slot_id, &application.teacher_id);
        let already_applied = ledger.applications.contains_key(&key);

        let slot = ledger
            .slots
            .get_mut(&application.slot_id)
            .ok_or_else(|| ReservationError::SlotNotFound {
                slot_id: application.slot_id.clone(),
            })?;
        check_admission(slot, &application.teacher_id, already_applied)?;

        let now = current_timestamp();
        slot.applied_count += 1;
        slot.updated_at = now;
        let applied_count = slot.applied_count;

        let application = application.into_application(now);
        ledger.applications.insert(key, application.clone());

        info!(
            slot_id = %application.slot_id,
            teacher_id = %application.teacher_id,
            applied_count,
            "application admitted"
        );
        Ok(application)
    }

    async fn cancel(&self, slot_id: &SlotId, teacher_id: &TeacherId) -> Result<()> {
        let mut ledger = self.inner.lock().await;
        let key = ledger_key(slot_id, teacher_id);
        if !ledger.slots.contains_key(slot_id) || !ledger.applications.contains_key(&key) {
            debug!(%slot_id, %teacher_id, "nothing to cancel");
            return Ok(());
        }

        ledger.applications.remove(&key);
        if let Some(slot) = ledger.slots.get_mut(slot_id) {
            slot.applied_count = released_count(slot.applied_count);
            slot.updated_at = current_timestamp();
            info!(
                %slot_id,
                %teacher_id,
                applied_count = slot.applied_count,
                "application cancelled"
            );
        }
        Ok(())
    }

    async fn get_slot(&self, slot_id: &SlotId) -> Result<Option<Slot>> {
        Ok(self.inner.lock().await.slots.get(slot_id).cloned())
    }

    async fn list_slots(&self) -> Result<Vec<Slot>> {
        let ledger = self.inner.lock().await;
        let mut slots: Vec<Slot> = ledger.slots.values().cloned().collect();
        // BTreeMap order already breaks ties by id; the sort is stable.
        slots.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(slots)
    }

    async fn create_slot(&self, slot: NewSlot) -> Result<Slot> {
        let slot = Slot::from_new(SlotId::generate(), slot, current_timestamp())?;
        self.inner
            .lock()
            .await
            .slots
            .insert(slot.id.clone(), slot.clone());
        info!(slot_id = %slot.id, school = %slot.school, "slot created");
        Ok(slot)
    }

    async fn update_slot(&self, slot_id: &SlotId, update: SlotUpdate) -> Result<Slot> {
        let mut ledger = self.inner.lock().await;
        let slot = ledger
            .slots
            .get_mut(slot_id)
            .ok_or_else(|| ReservationError::SlotNotFound {
                slot_id: slot_id.clone(),
            })?;
        slot.apply_update(update, current_timestamp())?;
        info!(%slot_id, "slot updated");
        Ok(slot.clone())
    }

    async fn delete_slot(&self, slot_id: &SlotId) -> Result<()> {
        let mut ledger = self.inner.lock().await;
        if ledger.slots.remove(slot_id).is_none() {
            debug!(%slot_id, "slot already gone");
            return Ok(());
        }
        let before = ledger.applications.len();
        ledger
            .applications
            .retain(|_, application| &application.slot_id != slot_id);
        let removed = before - ledger.applications.len();
        let removed_students = ledger.students.remove(slot_id).map_or(0, |s| s.len());
        info!(
            %slot_id,
            removed_applications = removed,
            removed_students,
            "slot deleted"
        );
        Ok(())
    }

    async fn get_application(
        &self,
        slot_id: &SlotId,
        teacher_id: &TeacherId,
    ) -> Result<Option<Application>> {
        let key = ledger_key(slot_id, teacher_id);
        Ok(self.inner.lock().await.applications.get(&key).cloned())
    }

    async fn applications_by_teacher(&self, teacher_id: &TeacherId) -> Result<Vec<Application>> {
        let ledger = self.inner.lock().await;
        let mut applications: Vec<Application> = ledger
            .applications
            .values()
            .filter(|application| &application.teacher_id == teacher_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.key().cmp(&b.key()))
        });
        Ok(applications)
    }

    async fn applications_by_slot(&self, slot_id: &SlotId) -> Result<Vec<Application>> {
        let ledger = self.inner.lock().await;
        let mut applications: Vec<Application> = ledger
            .applications
            .values()
            .filter(|application| &application.slot_id == slot_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }

    async fn list_students(&self, slot_id: &SlotId) -> Result<Vec<Student>> {
        let ledger = self.inner.lock().await;
        Ok(ledger.students.get(slot_id).cloned().unwrap_or_default())
    }

    async fn add_student(&self, slot_id: &SlotId, student: NewStudent) -> Result<Student> {
        let mut ledger = self.inner.lock().await;
        ledger.require_slot(slot_id)?;
        let student =
            student.into_student(StudentId::generate(), slot_id.clone(), current_timestamp());
        ledger
            .students
            .entry(slot_id.clone())
            .or_default()
            .push(student.clone());
        info!(%slot_id, student_id = %student.id, "student added");
        Ok(student)
    }

    async fn add_students(
        &self,
        slot_id: &SlotId,
        students: Vec<NewStudent>,
    ) -> Result<Vec<Student>> {
        let mut ledger = self.inner.lock().await;
        ledger.require_slot(slot_id)?;
        let students = enroll_students(slot_id, students, current_timestamp());
        ledger
            .students
            .entry(slot_id.clone())
            .or_default()
            .extend(students.iter().cloned());
        info!(%slot_id, count = students.len(), "students added");
        Ok(students)
    }

    async fn delete_student(&self, slot_id: &SlotId, student_id: &StudentId) -> Result<()> {
        let mut ledger = self.inner.lock().await;
        if let Some(roster) = ledger.students.get_mut(slot_id) {
            let before = roster.len();
            roster.retain(|student| &student.id != student_id);
            if roster.len() < before {
                info!(%slot_id, %student_id, "student removed");
                return Ok(());
            }
        }
        debug!(%slot_id, %student_id, "student already gone");
        Ok(())
    }

    async fn delete_all_students(&self, slot_id: &SlotId) -> Result<u64> {
        let removed = self
            .inner
            .lock()
            .await
            .students
            .remove(slot_id)
            .map_or(0, |roster| roster.len() as u64);
        info!(%slot_id, removed, "roster cleared");
        Ok(removed)
    }

    async fn student_counts(&self, slot_ids: &[SlotId]) -> Result<BTreeMap<SlotId, u64>> {
        let ledger = self.inner.lock().await;
        Ok(slot_ids
            .iter()
            .map(|slot_id| {
                let count = ledger.students.get(slot_id).map_or(0, |roster| roster.len());
                (slot_id.clone(), count as u64)
            })
            .collect())
    }
}
