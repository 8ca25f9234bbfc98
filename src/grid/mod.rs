//! Grid coordinator.
//!
//! Owns the viewport, the current snapshot, and the drag gesture. Derives
//! the renderable layout on demand and turns gestures into
//! [`MutationIntent`]s that are either committed to the external store or,
//! in what-if mode, applied to a local scratch copy.
//!
//! # Commit Protocol
//! 1. The intent is sent to the store.
//! 2. On success the whole snapshot is refetched; nothing is patched locally.
//! 3. On failure a `StoreFailed` event is emitted, the snapshot is refetched
//!    to discard any stale local view, and the error is returned.
//!
//! Stale commits (an assignment changed by someone else since the last
//! refresh) are not detected; the store's answer is trusted.
//!
//! # Submodules
//!
//! - [`Viewport`]: date range, zoom, and pixel geometry
//! - [`ScheduleMode`]: live vs. what-if snapshot
//! - [`GridEvent`] / [`GridObserver`]: change notifications
//! - [`MutationIntent`]: proposed store mutations

mod events;
mod intent;
mod mode;
mod viewport;

pub use events::{GridEvent, GridObserver, SubscriptionId};
pub use intent::{DropModifiers, MutationIntent};
pub use mode::ScheduleMode;
pub use viewport::Viewport;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::balance::AutoBalancer;
use crate::config::{ConfigError, GridConfig};
use crate::drag::{
    preview_rect, resolve_drop_in_rows, DragItem, DragState, DropPreview, DropTarget, Point,
};
use crate::error::{GridError, GridResult};
use crate::kpi::GridKpi;
use crate::layout::{build_layout, ColorTable, GridLayout};
use crate::models::{Assignment, Phase, ScheduleSnapshot};
use crate::split::{split, SplitMode, SplitResult};
use crate::store::pool::run_bounded;
use crate::store::{AssignmentDraft, AssignmentPatch, MoveTaskRequest, ScheduleStore, StoreResult};
use crate::timeline::{Segmentation, Zoom};
use crate::validation::{validate_snapshot, ValidationResult};

/// Orchestrates layout, gestures, and store mutations for one grid.
pub struct GridCoordinator<S: ScheduleStore> {
    store: Arc<S>,
    config: GridConfig,
    viewport: Viewport,
    colors: ColorTable,
    mode: ScheduleMode,
    drag: DragState,
    observers: Vec<(SubscriptionId, Box<dyn GridObserver>)>,
    next_subscription: u64,
}

impl<S: ScheduleStore> GridCoordinator<S> {
    /// Creates a coordinator showing `[from, to)` with an empty snapshot.
    ///
    /// Call [`refresh`](Self::refresh) to load data.
    pub fn new(
        store: Arc<S>,
        config: GridConfig,
        from: NaiveDate,
        to: NaiveDate,
    ) -> GridResult<Self> {
        config.validate()?;
        let viewport = Viewport::from_config(&config, from, to);
        Ok(Self {
            store,
            config,
            viewport,
            colors: ColorTable::default(),
            mode: ScheduleMode::default(),
            drag: DragState::Idle,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Sets the project color table.
    pub fn with_colors(mut self, colors: ColorTable) -> Self {
        self.colors = colors;
        self
    }

    /// The store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Current viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Live or what-if state.
    pub fn mode(&self) -> &ScheduleMode {
        &self.mode
    }

    /// The snapshot being displayed.
    pub fn snapshot(&self) -> &ScheduleSnapshot {
        self.mode.snapshot()
    }

    /// Current drag gesture state.
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    // ======================== Viewport ========================

    /// Changes the visible date range.
    pub fn set_range(&mut self, from: NaiveDate, to: NaiveDate) {
        self.viewport.from = from;
        self.viewport.to = to;
        self.viewport_changed();
    }

    /// Changes the zoom level.
    pub fn set_zoom(&mut self, zoom: Zoom) {
        self.viewport.zoom = zoom;
        self.viewport_changed();
    }

    /// Changes the column width (px). Must be positive.
    pub fn set_column_width(&mut self, column_width_px: f64) -> GridResult<()> {
        if !(column_width_px > 0.0) {
            return Err(ConfigError::Invalid {
                field: "column_width_px",
                reason: "must be positive".into(),
            }
            .into());
        }
        self.viewport.column_width_px = column_width_px;
        self.viewport_changed();
        Ok(())
    }

    /// Moves the grid origin (host scrolled or resized).
    pub fn set_grid_origin(&mut self, origin: Point) {
        self.viewport.grid_origin = origin;
    }

    fn viewport_changed(&self) {
        let vp = &self.viewport;
        debug!(from = %vp.from, to = %vp.to, zoom = ?vp.zoom, "viewport changed");
        self.emit(&GridEvent::ViewportChanged {
            from: vp.from,
            to: vp.to,
            zoom: vp.zoom,
        });
    }

    // ======================== Derived views ========================

    /// Columns and month headers for the viewport.
    pub fn columns(&self) -> Segmentation {
        self.viewport.segmentation()
    }

    /// Renderable layout of the displayed snapshot.
    pub fn layout(&self) -> GridLayout {
        build_layout(
            self.mode.snapshot(),
            &self.columns(),
            &self.config.calendar,
            &self.colors,
            self.viewport.geometry(),
        )
    }

    /// Phases with no assignment, for the backlog list.
    pub fn unscheduled_phases(&self) -> Vec<&Phase> {
        self.mode.snapshot().unscheduled_phases()
    }

    /// Integrity issues in the displayed snapshot.
    pub fn validate(&self) -> ValidationResult {
        validate_snapshot(self.mode.snapshot())
    }

    /// Workload indicators over the viewport.
    pub fn kpi(&self) -> GridKpi {
        GridKpi::calculate(
            self.mode.snapshot(),
            &self.config.calendar,
            self.viewport.from,
            self.viewport.to,
            self.config.standard_week_hours,
        )
    }

    /// Create intents placing every unscheduled phase, starting at the
    /// viewport's first day. Nothing is committed.
    pub fn propose_auto_balance(&self) -> Vec<MutationIntent> {
        AutoBalancer::new(&self.config.calendar, self.viewport.from)
            .propose(self.mode.snapshot())
            .into_iter()
            .map(MutationIntent::from)
            .collect()
    }

    // ======================== Store sync ========================

    /// Refetches people, phases, and assignments from the store.
    ///
    /// Per-project phase lists and per-phase assignment lists are fetched
    /// with at most `fetch_concurrency` requests in flight. In what-if mode
    /// only the base snapshot is replaced; the scratch copy is kept.
    pub async fn refresh(&mut self) -> GridResult<()> {
        let started = Instant::now();
        let snapshot = match fetch_snapshot(&self.store, &self.config).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(%error, "snapshot refresh failed");
                self.emit(&GridEvent::StoreFailed {
                    error: error.clone(),
                });
                return Err(error.into());
            }
        };

        if let Err(issues) = validate_snapshot(&snapshot) {
            for issue in &issues {
                warn!(kind = ?issue.kind, "{}", issue.message);
            }
        }

        let event = GridEvent::SnapshotRefreshed {
            people: snapshot.people.len(),
            phases: snapshot.phases.len(),
            assignments: snapshot.assignments.len(),
        };
        info!(
            people = snapshot.people.len(),
            phases = snapshot.phases.len(),
            assignments = snapshot.assignments.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "snapshot refreshed"
        );
        self.mode.replace_base(Arc::new(snapshot));
        self.emit(&event);
        Ok(())
    }

    // ======================== Drag gesture ========================

    /// Starts dragging a backlog phase or a placed assignment.
    ///
    /// The natural duration is the phase's remaining days (or
    /// `default_phase_days` when nothing remains) or the assignment's own
    /// length.
    pub fn drag_start(&mut self, item: DragItem) -> GridResult<()> {
        let snapshot = self.mode.snapshot();
        let natural_days = match &item {
            DragItem::Phase { phase_id } => {
                let remaining = snapshot
                    .remaining_days(phase_id)
                    .ok_or_else(|| GridError::UnknownPhase(phase_id.clone()))?;
                if remaining == 0 {
                    self.config.default_phase_days
                } else {
                    remaining
                }
            }
            DragItem::Assignment { assignment_id } => snapshot
                .assignment(assignment_id)
                .map(|a| a.assigned_days)
                .ok_or_else(|| GridError::UnknownAssignment(assignment_id.clone()))?,
        };

        debug!(?item, natural_days, "drag started");
        self.drag = DragState::Dragging {
            item,
            natural_days,
            preview: None,
        };
        Ok(())
    }

    /// Updates the live preview. `None` when not dragging or off-grid.
    pub fn drag_move(&mut self, pointer: Point) -> Option<DropPreview> {
        let DragState::Dragging { natural_days, .. } = self.drag else {
            return None;
        };

        let preview = self.resolve_target(pointer).and_then(|(target, layout)| {
            let row = layout.rows.get(target.person_index)?;
            Some(preview_rect(
                target,
                self.viewport.zoom,
                self.viewport.column_width_px,
                row.top,
                self.viewport.lane_height_px,
                natural_days,
            ))
        });

        if let DragState::Dragging { preview: slot, .. } = &mut self.drag {
            *slot = preview;
        }
        preview
    }

    /// Finishes the gesture and proposes a mutation.
    ///
    /// Returns `None` (and goes back to idle) when the pointer is off-grid
    /// or the item lands where it already is. Otherwise the state moves to
    /// `Committing` until [`commit`](Self::commit) or
    /// [`drag_cancel`](Self::drag_cancel).
    pub fn drag_end(&mut self, pointer: Point, modifiers: DropModifiers) -> Option<MutationIntent> {
        if !self.drag.is_dragging() {
            return None;
        }
        let DragState::Dragging {
            item, natural_days, ..
        } = std::mem::take(&mut self.drag)
        else {
            return None;
        };

        let Some((target, _)) = self.resolve_target(pointer) else {
            debug!("drop outside grid");
            return None;
        };
        let snapshot = self.mode.snapshot();
        let person = snapshot.people.get(target.person_index)?;

        let intent = match &item {
            DragItem::Phase { phase_id } => Some(MutationIntent::Create {
                phase_id: phase_id.clone(),
                person_id: person.id.clone(),
                start_date: target.date,
                assigned_days: natural_days,
            }),
            DragItem::Assignment { assignment_id } => snapshot
                .assignment(assignment_id)
                .and_then(|a| drop_existing(a, &person.id, target.date, modifiers)),
        };

        match intent {
            Some(intent) => {
                debug!(kind = intent.kind(), date = %target.date, "drop resolved");
                self.drag = DragState::Committing { item };
                Some(intent)
            }
            None => {
                debug!("drop left the item in place");
                None
            }
        }
    }

    /// Abandons the gesture without side effects.
    pub fn drag_cancel(&mut self) {
        if self.drag != DragState::Idle {
            debug!("drag cancelled");
        }
        self.drag = DragState::Idle;
    }

    fn resolve_target(&self, pointer: Point) -> Option<(DropTarget, GridLayout)> {
        let layout = self.layout();
        let target = resolve_drop_in_rows(
            pointer,
            self.viewport.grid_origin,
            self.viewport.zoom,
            self.viewport.column_width_px,
            &layout.row_heights(),
            &layout.segmentation.columns,
        )?;
        Some((target, layout))
    }

    // ======================== Mutations ========================

    /// Commits an intent.
    ///
    /// In what-if mode only the scratch copy changes. Always returns the
    /// drag state to idle.
    pub async fn commit(&mut self, intent: MutationIntent) -> GridResult<()> {
        let result = self.apply(intent).await;
        self.drag = DragState::Idle;
        result
    }

    async fn apply(&mut self, intent: MutationIntent) -> GridResult<()> {
        if let MutationIntent::Create {
            phase_id,
            assigned_days: 0,
            ..
        } = &intent
        {
            return Err(GridError::EmptyAssignment(phase_id.clone()));
        }

        let before = self.mode.unscheduled_by_phase();
        if let Some(scratch) = self.mode.scratch_mut() {
            let touched = simulate(scratch, &intent)?;
            info!(kind = intent.kind(), "what-if change applied");
            self.announce_changes(&before, touched, true);
            return Ok(());
        }

        let submitted = self.submit(&intent).await;
        if submitted.is_ok() {
            info!(kind = intent.kind(), "mutation committed");
        }
        self.finish_live(&before, submitted).await
    }

    async fn submit(&self, intent: &MutationIntent) -> StoreResult<Vec<String>> {
        match intent {
            MutationIntent::Create {
                phase_id,
                person_id,
                start_date,
                assigned_days,
            } => {
                let draft = AssignmentDraft::new(person_id.clone(), *start_date, *assigned_days);
                let created = self.store.create_assignment(phase_id, draft).await?;
                Ok(vec![created.id])
            }
            MutationIntent::Move {
                phase_id,
                assignment_id,
                person_id,
                start_date,
            } => {
                let patch = AssignmentPatch {
                    person_id: Some(person_id.clone()),
                    start_date: Some(*start_date),
                    assigned_days: None,
                };
                self.store
                    .update_assignment(phase_id, assignment_id, patch)
                    .await?;
                Ok(vec![assignment_id.clone()])
            }
            MutationIntent::MoveTask {
                task_id,
                person_id,
                start_date,
                copy,
            } => {
                self.store
                    .move_task(MoveTaskRequest {
                        task_id: task_id.clone(),
                        new_start_date: Some(*start_date),
                        new_primary_person_id: Some(person_id.clone()),
                        new_duration_days: None,
                        copy: *copy,
                        parent_assignment_id: None,
                    })
                    .await?;
                Ok(vec![task_id.clone()])
            }
            MutationIntent::Delete {
                phase_id,
                assignment_id,
            } => {
                self.store.delete_assignment(phase_id, assignment_id).await?;
                Ok(vec![assignment_id.clone()])
            }
        }
    }

    async fn finish_live(
        &mut self,
        before: &HashMap<String, bool>,
        submitted: StoreResult<Vec<String>>,
    ) -> GridResult<()> {
        match submitted {
            Ok(touched) => {
                self.refresh().await?;
                self.announce_changes(before, touched, false);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "store rejected mutation; refetching");
                self.emit(&GridEvent::StoreFailed {
                    error: error.clone(),
                });
                if let Err(refetch) = self.refresh().await {
                    warn!(error = %refetch, "rollback refetch failed");
                }
                Err(error.into())
            }
        }
    }

    // ======================== Split ========================

    /// Computes a split of an assignment in the displayed snapshot.
    ///
    /// Nothing is sent anywhere; pass the result to
    /// [`commit_split`](Self::commit_split).
    pub fn request_split(
        &self,
        assignment_id: &str,
        mode: SplitMode,
        person_id_right: &str,
    ) -> GridResult<SplitResult> {
        let snapshot = self.mode.snapshot();
        let original = snapshot
            .assignment(assignment_id)
            .ok_or_else(|| GridError::UnknownAssignment(assignment_id.to_string()))?;
        if snapshot.person(person_id_right).is_none() {
            return Err(GridError::UnknownPerson(person_id_right.to_string()));
        }
        Ok(split(original, mode, person_id_right)?)
    }

    /// Commits a split: the original becomes the left part and the right
    /// part is created.
    ///
    /// The pair is checked against the original in the displayed snapshot
    /// first; a pair that no longer conserves its days, start date, or
    /// phase is rejected with [`GridError::InvalidSplit`] before any write.
    ///
    /// If creating the right part fails, the original is restored so no
    /// effort is lost.
    pub async fn commit_split(&mut self, parts: SplitResult) -> GridResult<()> {
        let original = self
            .mode
            .snapshot()
            .assignment(&parts.left.id)
            .cloned()
            .ok_or_else(|| GridError::UnknownAssignment(parts.left.id.clone()))?;
        parts.verify_against(&original)?;

        let before = self.mode.unscheduled_by_phase();
        if let Some(scratch) = self.mode.scratch_mut() {
            let touched = vec![parts.left.id.clone(), parts.right.id.clone()];
            if let Some(left) = scratch.assignment_mut(&parts.left.id) {
                *left = parts.left;
            }
            scratch.insert_assignment(parts.right);
            info!(assignment = %original.id, "what-if split applied");
            self.announce_changes(&before, touched, true);
            return Ok(());
        }

        let submitted = self.submit_split(&original, &parts).await;
        if submitted.is_ok() {
            info!(assignment = %original.id, "split committed");
        }
        self.finish_live(&before, submitted).await
    }

    async fn submit_split(
        &self,
        original: &Assignment,
        parts: &SplitResult,
    ) -> StoreResult<Vec<String>> {
        let (left, right) = (&parts.left, &parts.right);

        let Some(phase_id) = original.phase_id.as_deref() else {
            // Legacy task: shorten in place, then copy the remainder over.
            self.store
                .move_task(MoveTaskRequest {
                    task_id: original.id.clone(),
                    new_duration_days: Some(left.assigned_days),
                    ..Default::default()
                })
                .await?;
            let copied = self
                .store
                .move_task(MoveTaskRequest {
                    task_id: original.id.clone(),
                    new_start_date: Some(right.start_date),
                    new_primary_person_id: Some(right.person_id.clone()),
                    new_duration_days: Some(right.assigned_days),
                    copy: true,
                    parent_assignment_id: right.parent_assignment_id.clone(),
                })
                .await;
            if let Err(error) = copied {
                let restore = MoveTaskRequest {
                    task_id: original.id.clone(),
                    new_duration_days: Some(original.assigned_days),
                    ..Default::default()
                };
                if let Err(undo) = self.store.move_task(restore).await {
                    warn!(error = %undo, task = %original.id, "failed to restore split task");
                }
                return Err(error);
            }
            return Ok(vec![original.id.clone()]);
        };

        let patch = AssignmentPatch {
            person_id: Some(left.person_id.clone()),
            start_date: Some(left.start_date),
            assigned_days: Some(left.assigned_days),
        };
        self.store
            .update_assignment(phase_id, &left.id, patch)
            .await?;

        match self
            .store
            .create_assignment(phase_id, AssignmentDraft::from(right))
            .await
        {
            Ok(created) => Ok(vec![left.id.clone(), created.id]),
            Err(error) => {
                let restore = AssignmentPatch {
                    person_id: Some(original.person_id.clone()),
                    start_date: Some(original.start_date),
                    assigned_days: Some(original.assigned_days),
                };
                if let Err(undo) = self
                    .store
                    .update_assignment(phase_id, &original.id, restore)
                    .await
                {
                    warn!(
                        error = %undo,
                        assignment = %original.id,
                        "failed to restore split original"
                    );
                }
                Err(error)
            }
        }
    }

    // ======================== What-if ========================

    /// Switches to what-if mode. No-op if already active.
    pub fn enter_what_if(&mut self) {
        if self.mode.is_simulated() {
            return;
        }
        self.mode = std::mem::take(&mut self.mode).simulate();
        info!("what-if mode entered");
        self.emit(&GridEvent::WhatIfEntered);
    }

    /// Leaves what-if mode, discarding every local change.
    pub fn exit_what_if(&mut self) {
        if !self.mode.is_simulated() {
            return;
        }
        self.mode = std::mem::take(&mut self.mode).discard();
        info!("what-if mode exited; scratch discarded");
        self.emit(&GridEvent::WhatIfExited);
    }

    /// Whether what-if mode is active.
    pub fn is_what_if(&self) -> bool {
        self.mode.is_simulated()
    }

    // ======================== Observers ========================

    /// Registers an observer.
    pub fn subscribe(&mut self, observer: impl GridObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let count = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != count
    }

    fn emit(&self, event: &GridEvent) {
        for (_, observer) in &self.observers {
            observer.on_event(event);
        }
    }

    fn announce_changes(
        &self,
        before: &HashMap<String, bool>,
        assignment_ids: Vec<String>,
        simulated: bool,
    ) {
        self.emit(&GridEvent::AssignmentsChanged {
            assignment_ids,
            simulated,
        });

        let snapshot = self.mode.snapshot();
        for phase in &snapshot.phases {
            let Some(&was_unscheduled) = before.get(&phase.id) else {
                continue;
            };
            let unscheduled = phase.is_unscheduled(&snapshot.assignments);
            if was_unscheduled && !unscheduled {
                self.emit(&GridEvent::PhaseScheduled {
                    phase_id: phase.id.clone(),
                });
            } else if !was_unscheduled && unscheduled {
                self.emit(&GridEvent::PhaseUnscheduled {
                    phase_id: phase.id.clone(),
                });
            }
        }
    }
}

/// Proposal for dropping an already-placed assignment.
fn drop_existing(
    assignment: &Assignment,
    person_id: &str,
    date: NaiveDate,
    modifiers: DropModifiers,
) -> Option<MutationIntent> {
    let unchanged = assignment.person_id == person_id && assignment.start_date == date;
    if unchanged && !modifiers.copy {
        return None;
    }
    match (&assignment.phase_id, modifiers.copy) {
        (None, copy) => Some(MutationIntent::MoveTask {
            task_id: assignment.id.clone(),
            person_id: person_id.to_string(),
            start_date: date,
            copy,
        }),
        (Some(phase_id), true) => Some(MutationIntent::Create {
            phase_id: phase_id.clone(),
            person_id: person_id.to_string(),
            start_date: date,
            assigned_days: assignment.assigned_days,
        }),
        (Some(phase_id), false) => Some(MutationIntent::Move {
            phase_id: phase_id.clone(),
            assignment_id: assignment.id.clone(),
            person_id: person_id.to_string(),
            start_date: date,
        }),
    }
}

/// Applies an intent to the what-if scratch copy.
fn simulate(scratch: &mut ScheduleSnapshot, intent: &MutationIntent) -> GridResult<Vec<String>> {
    match intent {
        MutationIntent::Create {
            phase_id,
            person_id,
            start_date,
            assigned_days,
        } => {
            if scratch.phase(phase_id).is_none() {
                return Err(GridError::UnknownPhase(phase_id.clone()));
            }
            require_person(scratch, person_id)?;
            let id = simulated_id();
            scratch.insert_assignment(Assignment::new(
                id.clone(),
                phase_id.clone(),
                person_id.clone(),
                *start_date,
                *assigned_days,
            ));
            Ok(vec![id])
        }
        MutationIntent::Move {
            assignment_id,
            person_id,
            start_date,
            ..
        } => {
            require_person(scratch, person_id)?;
            let target = scratch
                .assignment_mut(assignment_id)
                .ok_or_else(|| GridError::UnknownAssignment(assignment_id.clone()))?;
            target.person_id = person_id.clone();
            target.start_date = *start_date;
            Ok(vec![assignment_id.clone()])
        }
        MutationIntent::MoveTask {
            task_id,
            person_id,
            start_date,
            copy,
        } => {
            require_person(scratch, person_id)?;
            let task = scratch
                .assignment_mut(task_id)
                .ok_or_else(|| GridError::UnknownAssignment(task_id.clone()))?;
            if *copy {
                let mut copied = task.clone();
                copied.id = simulated_id();
                copied.person_id = person_id.clone();
                copied.start_date = *start_date;
                let id = copied.id.clone();
                scratch.insert_assignment(copied);
                Ok(vec![id])
            } else {
                task.person_id = person_id.clone();
                task.start_date = *start_date;
                Ok(vec![task_id.clone()])
            }
        }
        MutationIntent::Delete { assignment_id, .. } => {
            scratch
                .remove_assignment(assignment_id)
                .ok_or_else(|| GridError::UnknownAssignment(assignment_id.clone()))?;
            Ok(vec![assignment_id.clone()])
        }
    }
}

fn require_person(snapshot: &ScheduleSnapshot, person_id: &str) -> GridResult<()> {
    match snapshot.person(person_id) {
        Some(_) => Ok(()),
        None => Err(GridError::UnknownPerson(person_id.to_string())),
    }
}

fn simulated_id() -> String {
    format!("sim-{}", Uuid::new_v4())
}

async fn fetch_snapshot<S: ScheduleStore>(
    store: &Arc<S>,
    config: &GridConfig,
) -> StoreResult<ScheduleSnapshot> {
    let people = store.list_people().await?;

    let projects = config.projects.clone();
    let per_project = run_bounded(projects, config.fetch_concurrency, |project: String| {
        let store = Arc::clone(store);
        async move { store.list_phases(&project).await }
    })
    .await?;
    let phases: Vec<Phase> = per_project.into_iter().flatten().collect();

    let phase_ids: Vec<String> = phases.iter().map(|ph| ph.id.clone()).collect();
    let per_phase = run_bounded(phase_ids, config.fetch_concurrency, |phase_id: String| {
        let store = Arc::clone(store);
        async move { store.list_assignments(&phase_id).await }
    })
    .await?;
    let mut assignments: Vec<Assignment> = per_phase.into_iter().flatten().collect();

    if config.include_legacy_tasks {
        let all = store.list_all_assignments().await?;
        assignments.extend(all.into_iter().filter(Assignment::is_legacy_task));
    }

    debug!(
        projects = config.projects.len(),
        phases = phases.len(),
        "fetched schedule data"
    );
    Ok(ScheduleSnapshot::from_parts(people, phases, assignments))
}
