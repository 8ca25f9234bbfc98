//! In-memory schedule store.
//!
//! A complete [`ScheduleStore`] over process memory. Used by tests and by
//! hosts that want to run the grid offline. Supports failure injection so
//! error paths can be exercised.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    AssignmentDraft, AssignmentPatch, MoveTaskRequest, ScheduleStore, StoreError, StoreResult,
};
use crate::models::{Assignment, Person, Phase};

#[derive(Debug, Default)]
struct Inner {
    people: Vec<Person>,
    phases: Vec<Phase>,
    assignments: Vec<Assignment>,
    log: Vec<String>,
}

/// Schedule store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with data.
    pub fn with_data(
        people: Vec<Person>,
        phases: Vec<Phase>,
        assignments: Vec<Assignment>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                people,
                phases,
                assignments,
                log: Vec::new(),
            }),
            ..Self::default()
        }
    }

    /// Makes every subsequent read fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current assignments (for inspection).
    pub async fn assignments(&self) -> Vec<Assignment> {
        self.inner.lock().await.assignments.clone()
    }

    /// Names of the write operations performed so far, in order.
    pub async fn write_log(&self) -> Vec<String> {
        self.inner.lock().await.log.clone()
    }

    fn check_read(&self, operation: &'static str) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                operation,
                message: "injected read failure".into(),
            });
        }
        Ok(())
    }

    fn check_write(&self, operation: &'static str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected {
                operation,
                message: "injected write failure".into(),
            });
        }
        Ok(())
    }
}

fn new_assignment_id() -> String {
    format!("asg-{}", Uuid::new_v4())
}

fn reject_empty(operation: &'static str, days: u32) -> StoreResult<()> {
    if days == 0 {
        return Err(StoreError::Rejected {
            operation,
            message: "assigned days must be positive".into(),
        });
    }
    Ok(())
}

impl ScheduleStore for MemoryStore {
    async fn list_people(&self) -> StoreResult<Vec<Person>> {
        self.check_read("list_people")?;
        Ok(self.inner.lock().await.people.clone())
    }

    async fn list_phases(&self, project_id: &str) -> StoreResult<Vec<Phase>> {
        self.check_read("list_phases")?;
        let inner = self.inner.lock().await;
        Ok(inner
            .phases
            .iter()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_assignments(&self, phase_id: &str) -> StoreResult<Vec<Assignment>> {
        self.check_read("list_assignments")?;
        let inner = self.inner.lock().await;
        Ok(inner
            .assignments
            .iter()
            .filter(|a| a.phase_id.as_deref() == Some(phase_id))
            .cloned()
            .collect())
    }

    async fn list_all_assignments(&self) -> StoreResult<Vec<Assignment>> {
        self.check_read("list_all_assignments")?;
        Ok(self.inner.lock().await.assignments.clone())
    }

    async fn create_assignment(
        &self,
        phase_id: &str,
        draft: AssignmentDraft,
    ) -> StoreResult<Assignment> {
        self.check_write("create_assignment")?;
        reject_empty("create_assignment", draft.assigned_days)?;
        let mut inner = self.inner.lock().await;
        if !inner.phases.iter().any(|p| p.id == phase_id) {
            return Err(StoreError::NotFound {
                kind: "phase",
                id: phase_id.to_string(),
            });
        }
        let created = Assignment {
            id: new_assignment_id(),
            phase_id: Some(phase_id.to_string()),
            person_id: draft.person_id,
            start_date: draft.start_date,
            assigned_days: draft.assigned_days,
            parent_assignment_id: draft.parent_assignment_id,
        };
        inner.assignments.push(created.clone());
        inner.log.push(format!("create {phase_id}"));
        Ok(created)
    }

    async fn update_assignment(
        &self,
        phase_id: &str,
        assignment_id: &str,
        patch: AssignmentPatch,
    ) -> StoreResult<Assignment> {
        self.check_write("update_assignment")?;
        if let Some(days) = patch.assigned_days {
            reject_empty("update_assignment", days)?;
        }
        let mut inner = self.inner.lock().await;
        let target = inner
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment_id && a.phase_id.as_deref() == Some(phase_id))
            .ok_or_else(|| StoreError::NotFound {
                kind: "assignment",
                id: assignment_id.to_string(),
            })?;
        patch.apply_to(target);
        let updated = target.clone();
        inner.log.push(format!("update {assignment_id}"));
        Ok(updated)
    }

    async fn delete_assignment(&self, phase_id: &str, assignment_id: &str) -> StoreResult<()> {
        self.check_write("delete_assignment")?;
        let mut inner = self.inner.lock().await;
        let idx = inner
            .assignments
            .iter()
            .position(|a| a.id == assignment_id && a.phase_id.as_deref() == Some(phase_id))
            .ok_or_else(|| StoreError::NotFound {
                kind: "assignment",
                id: assignment_id.to_string(),
            })?;
        inner.assignments.remove(idx);
        inner.log.push(format!("delete {assignment_id}"));
        Ok(())
    }

    async fn move_task(&self, request: MoveTaskRequest) -> StoreResult<()> {
        self.check_write("move_task")?;
        if let Some(days) = request.new_duration_days {
            reject_empty("move_task", days)?;
        }
        let mut inner = self.inner.lock().await;
        let idx = inner
            .assignments
            .iter()
            .position(|a| a.id == request.task_id && a.is_legacy_task())
            .ok_or_else(|| StoreError::NotFound {
                kind: "task",
                id: request.task_id.clone(),
            })?;

        let mut task = if request.copy {
            let mut copy = inner.assignments[idx].clone();
            copy.id = new_assignment_id();
            copy.parent_assignment_id = request.parent_assignment_id.clone();
            copy
        } else {
            inner.assignments[idx].clone()
        };
        if let Some(start) = request.new_start_date {
            task.start_date = start;
        }
        if let Some(person) = request.new_primary_person_id {
            task.person_id = person;
        }
        if let Some(days) = request.new_duration_days {
            task.assigned_days = days;
        }

        if request.copy {
            inner.assignments.push(task);
            inner.log.push(format!("copy {}", request.task_id));
        } else {
            inner.assignments[idx] = task;
            inner.log.push(format!("move {}", request.task_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn store() -> MemoryStore {
        MemoryStore::with_data(
            vec![Person::new("p1"), Person::new("p2")],
            vec![
                Phase::new("ph1", "alpha").with_estimate(10),
                Phase::new("ph2", "beta").with_estimate(3),
            ],
            vec![
                Assignment::new("a1", "ph1", "p1", d(2025, 1, 6), 4),
                Assignment::legacy_task("t1", "p2", d(2025, 1, 6), 2),
            ],
        )
    }

    #[tokio::test]
    async fn test_listing() {
        let s = store();
        assert_eq!(s.list_people().await.unwrap().len(), 2);
        assert_eq!(s.list_phases("alpha").await.unwrap().len(), 1);
        assert_eq!(s.list_assignments("ph1").await.unwrap().len(), 1);
        assert_eq!(s.list_all_assignments().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let s = store();
        let created = s
            .create_assignment("ph2", AssignmentDraft::new("p2", d(2025, 1, 8), 3))
            .await
            .unwrap();
        assert!(created.id.starts_with("asg-"));
        assert_eq!(created.phase_id.as_deref(), Some("ph2"));

        let updated = s
            .update_assignment(
                "ph2",
                &created.id,
                AssignmentPatch {
                    start_date: Some(d(2025, 1, 9)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.start_date, d(2025, 1, 9));

        s.delete_assignment("ph2", &created.id).await.unwrap();
        assert_eq!(s.assignments().await.len(), 2);
        assert_eq!(s.write_log().await.len(), 3);
    }

    #[tokio::test]
    async fn test_not_found_and_rejected() {
        let s = store();
        let err = s
            .create_assignment("nope", AssignmentDraft::new("p1", d(2025, 1, 1), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "phase", .. }));

        let err = s
            .create_assignment("ph1", AssignmentDraft::new("p1", d(2025, 1, 1), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected { .. }));

        let err = s.delete_assignment("ph2", "a1").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "assignment", .. }));
    }

    #[tokio::test]
    async fn test_move_and_copy_legacy_task() {
        let s = store();
        s.move_task(MoveTaskRequest {
            task_id: "t1".into(),
            new_start_date: Some(d(2025, 1, 10)),
            new_primary_person_id: Some("p1".into()),
            ..Default::default()
        })
        .await
        .unwrap();
        let all = s.assignments().await;
        let t1 = all.iter().find(|a| a.id == "t1").unwrap();
        assert_eq!(t1.person_id, "p1");
        assert_eq!(t1.start_date, d(2025, 1, 10));

        s.move_task(MoveTaskRequest {
            task_id: "t1".into(),
            new_start_date: Some(d(2025, 2, 3)),
            copy: true,
            parent_assignment_id: Some("t1".into()),
            ..Default::default()
        })
        .await
        .unwrap();
        let all = s.assignments().await;
        assert_eq!(all.len(), 3);
        let copied = all.iter().find(|a| a.start_date == d(2025, 2, 3)).unwrap();
        assert_ne!(copied.id, "t1");
        assert_eq!(copied.parent_assignment_id.as_deref(), Some("t1"));

        // Phase assignments are not legacy tasks
        let err = s
            .move_task(MoveTaskRequest {
                task_id: "a1".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "task", .. }));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let s = store();
        s.set_fail_reads(true);
        assert!(s.list_people().await.is_err());
        s.set_fail_reads(false);
        assert!(s.list_people().await.is_ok());

        s.set_fail_writes(true);
        assert!(s.delete_assignment("ph1", "a1").await.is_err());
        assert_eq!(s.assignments().await.len(), 2);
    }
}
