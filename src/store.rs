use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    Application, NewApplication, NewSlot, NewStudent, Slot, SlotId, SlotUpdate, Student,
    StudentId, TeacherId,
};

/// Storage backend for slots, the application ledger and per-slot student rosters.
///
/// Implementations own atomicity: [`apply`](Self::apply), [`cancel`](Self::cancel),
/// [`update_slot`](Self::update_slot) and [`delete_slot`](Self::delete_slot) each run
/// as one indivisible unit with respect to every other call on the same store.
/// The capacity rules themselves live in [`crate::model`] so all backends agree.
///
/// Two implementations ship with the crate:
///
/// - [`crate::SeaOrmStore`]: PostgreSQL (or SQLite) through Sea-ORM transactions.
/// - [`crate::MemoryStore`]: process-lifetime state for demos and tests.
#[async_trait]
pub trait ReservationStore: Debug + Send + Sync {
    /// Admits a teacher to a slot.
    ///
    /// Reads the slot and the ledger entry, rejects duplicates and full slots, then
    /// inserts the application and increments `applied_count` together.
    ///
    /// # Errors
    ///
    /// * [`SlotNotFound`](crate::ReservationError::SlotNotFound) - no such slot.
    /// * [`AlreadyApplied`](crate::ReservationError::AlreadyApplied) - the pair already has an application.
    /// * [`SlotFull`](crate::ReservationError::SlotFull) - primary and waitlist seats are taken.
    /// * [`TransientStore`](crate::ReservationError::TransientStore) - the backend failed.
    async fn apply(&self, application: NewApplication) -> Result<Application>;

    /// Withdraws a teacher's application.
    ///
    /// Succeeds without changes when the slot or the application does not exist.
    /// Otherwise deletes the application and decrements `applied_count`, floored at 0.
    async fn cancel(&self, slot_id: &SlotId, teacher_id: &TeacherId) -> Result<()>;

    async fn get_slot(&self, slot_id: &SlotId) -> Result<Option<Slot>>;

    /// All slots by ascending date, ties broken by id.
    async fn list_slots(&self) -> Result<Vec<Slot>>;

    async fn create_slot(&self, slot: NewSlot) -> Result<Slot>;

    /// Patches a slot without touching `applied_count`.
    async fn update_slot(&self, slot_id: &SlotId, update: SlotUpdate) -> Result<Slot>;

    /// Deletes a slot together with its applications and students. Missing slots are a
    /// no-op.
    async fn delete_slot(&self, slot_id: &SlotId) -> Result<()>;

    async fn get_application(
        &self,
        slot_id: &SlotId,
        teacher_id: &TeacherId,
    ) -> Result<Option<Application>>;

    /// A teacher's applications, oldest first. May include orphans.
    async fn applications_by_teacher(&self, teacher_id: &TeacherId) -> Result<Vec<Application>>;

    /// A slot's applications, newest first.
    async fn applications_by_slot(&self, slot_id: &SlotId) -> Result<Vec<Application>>;

    /// A slot's students in the order they were added.
    async fn list_students(&self, slot_id: &SlotId) -> Result<Vec<Student>>;

    /// Adds one student to a slot's roster.
    ///
    /// # Errors
    ///
    /// [`SlotNotFound`](crate::ReservationError::SlotNotFound) if the slot is gone.
    async fn add_student(&self, slot_id: &SlotId, student: NewStudent) -> Result<Student>;

    /// Adds a whole batch in one transaction; either every student is stored or none.
    async fn add_students(
        &self,
        slot_id: &SlotId,
        students: Vec<NewStudent>,
    ) -> Result<Vec<Student>>;

    /// Removes one student. Unknown ids are a no-op.
    async fn delete_student(&self, slot_id: &SlotId, student_id: &StudentId) -> Result<()>;

    /// Clears a slot's roster and returns how many students were removed.
    async fn delete_all_students(&self, slot_id: &SlotId) -> Result<u64>;

    /// Roster sizes for the given slots. Every requested id is present, with 0 for
    /// slots that have no students or do not exist.
    async fn student_counts(&self, slot_ids: &[SlotId]) -> Result<BTreeMap<SlotId, u64>>;
}
