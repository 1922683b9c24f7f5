//! Per-record scene lifecycle.
//!
//! One `SceneLifecycle` outlives many viewed records. Entering a record
//! disposes whatever came before it, bumps a generation counter and hands
//! out a [`LoadTicket`]; async completions must present their ticket, so a
//! fetch that finishes after disposal (or after the user moved to another
//! record) cannot touch a dead scene.

/// Phases a viewed record moves through, in order. `Failed` and `Disposed`
/// are reachable from any phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenePhase {
    Idle,
    LoadingMetadata,
    MetadataReady,
    SceneMounted,
    ModelLoading,
    ModelReady,
    /// Terminal for this record; carries the user-visible message.
    Failed(String),
    Disposed,
}

/// Ties an async completion to the generation that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub struct SceneLifecycle {
    phase: ScenePhase,
    generation: u64,
    record_id: Option<String>,
    active_render_loops: u32,
    attached_surfaces: u32,
}

impl Default for SceneLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneLifecycle {
    pub fn new() -> Self {
        Self {
            phase: ScenePhase::Idle,
            generation: 0,
            record_id: None,
            active_render_loops: 0,
            attached_surfaces: 0,
        }
    }

    pub fn phase(&self) -> &ScenePhase {
        &self.phase
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    /// Render-loop callbacks currently scheduled. Must be zero after
    /// disposal and never exceed one.
    pub fn active_render_loops(&self) -> u32 {
        self.active_render_loops
    }

    /// Render surfaces currently attached. Same bounds as the loop count.
    pub fn attached_surfaces(&self) -> u32 {
        self.attached_surfaces
    }

    /// The user-visible failure message, when in `Failed`.
    pub fn visible_error(&self) -> Option<&str> {
        match &self.phase {
            ScenePhase::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// True while the scene holds a surface; resize handling applies.
    pub fn is_mounted(&self) -> bool {
        self.attached_surfaces > 0
    }

    pub fn is_render_loop_active(&self) -> bool {
        self.active_render_loops > 0
    }

    /// Enters the lifecycle for a record, disposing any previous scene
    /// first. The returned ticket authorizes completions for this record
    /// only.
    pub fn begin(&mut self, record_id: &str) -> LoadTicket {
        self.dispose();
        self.generation += 1;
        self.record_id = Some(record_id.to_string());
        self.phase = ScenePhase::LoadingMetadata;
        LoadTicket(self.generation)
    }

    /// Whether a completion holding this ticket may still act.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
            && !matches!(self.phase, ScenePhase::Disposed | ScenePhase::Failed(_))
    }

    /// Metadata fetch resolved.
    pub fn metadata_ready(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) || self.phase != ScenePhase::LoadingMetadata {
            return false;
        }
        self.phase = ScenePhase::MetadataReady;
        true
    }

    /// A render surface became available; the scene graph is constructed
    /// and the render loop starts.
    pub fn mount_scene(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) || self.phase != ScenePhase::MetadataReady {
            return false;
        }
        self.attached_surfaces += 1;
        self.active_render_loops += 1;
        self.phase = ScenePhase::SceneMounted;
        true
    }

    /// Asset fetch and decode started.
    pub fn model_loading(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) || self.phase != ScenePhase::SceneMounted {
            return false;
        }
        self.phase = ScenePhase::ModelLoading;
        true
    }

    /// Asset decoded, framed and added to the scene.
    pub fn model_ready(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) || self.phase != ScenePhase::ModelLoading {
            return false;
        }
        self.phase = ScenePhase::ModelReady;
        true
    }

    /// Any fetch or decode failure. The message is user-visible. Mounted
    /// resources stay attached until `dispose` runs.
    pub fn fail(&mut self, ticket: LoadTicket, reason: impl Into<String>) -> bool {
        if ticket.0 != self.generation || self.phase == ScenePhase::Disposed {
            return false;
        }
        self.phase = ScenePhase::Failed(reason.into());
        true
    }

    /// Tears the scene down: render loop cancelled, surface detached,
    /// renderer and controls released. Safe to call any number of times,
    /// from any phase.
    pub fn dispose(&mut self) {
        if self.phase == ScenePhase::Disposed {
            return;
        }
        self.active_render_loops = 0;
        self.attached_surfaces = 0;
        // Invalidate outstanding tickets even before the next begin().
        self.generation += 1;
        self.phase = ScenePhase::Disposed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted(lifecycle: &mut SceneLifecycle, id: &str) -> LoadTicket {
        let ticket = lifecycle.begin(id);
        assert!(lifecycle.metadata_ready(ticket));
        assert!(lifecycle.mount_scene(ticket));
        ticket
    }

    #[test]
    fn test_happy_path_phases() {
        let mut lifecycle = SceneLifecycle::new();
        assert_eq!(*lifecycle.phase(), ScenePhase::Idle);

        let ticket = lifecycle.begin("m-1");
        assert_eq!(*lifecycle.phase(), ScenePhase::LoadingMetadata);
        assert!(lifecycle.metadata_ready(ticket));
        assert!(lifecycle.mount_scene(ticket));
        assert!(lifecycle.model_loading(ticket));
        assert!(lifecycle.model_ready(ticket));
        assert_eq!(*lifecycle.phase(), ScenePhase::ModelReady);
        assert_eq!(lifecycle.active_render_loops(), 1);
        assert_eq!(lifecycle.attached_surfaces(), 1);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut lifecycle = SceneLifecycle::new();
        let ticket = mounted(&mut lifecycle, "m-1");
        assert!(lifecycle.model_loading(ticket));

        lifecycle.dispose();
        lifecycle.dispose();
        lifecycle.dispose();

        assert_eq!(*lifecycle.phase(), ScenePhase::Disposed);
        assert_eq!(lifecycle.active_render_loops(), 0);
        assert_eq!(lifecycle.attached_surfaces(), 0);
    }

    #[test]
    fn test_remount_does_not_leak() {
        let mut lifecycle = SceneLifecycle::new();
        let first = mounted(&mut lifecycle, "m-1");

        // Viewed identifier changes while the first record is mid-load.
        let second = lifecycle.begin("m-2");
        assert!(lifecycle.metadata_ready(second));
        assert!(lifecycle.mount_scene(second));

        assert_eq!(lifecycle.active_render_loops(), 1);
        assert_eq!(lifecycle.attached_surfaces(), 1);
        // The first record's ticket is dead.
        assert!(!lifecycle.is_current(first));
        assert!(!lifecycle.model_loading(first));
    }

    #[test]
    fn test_late_completion_after_dispose_is_noop() {
        let mut lifecycle = SceneLifecycle::new();
        let ticket = mounted(&mut lifecycle, "m-1");
        assert!(lifecycle.model_loading(ticket));

        lifecycle.dispose();

        assert!(!lifecycle.model_ready(ticket));
        assert!(!lifecycle.fail(ticket, "late network error"));
        assert_eq!(*lifecycle.phase(), ScenePhase::Disposed);
    }

    #[test]
    fn test_stale_ticket_ignored_across_records() {
        let mut lifecycle = SceneLifecycle::new();
        let first = lifecycle.begin("m-1");
        let second = lifecycle.begin("m-2");

        assert!(!lifecycle.metadata_ready(first));
        assert!(lifecycle.metadata_ready(second));
    }

    #[test]
    fn test_metadata_failure_is_visible() {
        let mut lifecycle = SceneLifecycle::new();
        let ticket = lifecycle.begin("m-1");
        assert!(lifecycle.fail(ticket, "product not found (ID: m-1)"));
        assert_eq!(
            lifecycle.visible_error(),
            Some("product not found (ID: m-1)")
        );
    }

    #[test]
    fn test_asset_failure_is_visible_and_keeps_mount() {
        let mut lifecycle = SceneLifecycle::new();
        let ticket = mounted(&mut lifecycle, "m-1");
        assert!(lifecycle.model_loading(ticket));
        assert!(lifecycle.fail(ticket, "asset load failed: 404"));

        assert!(lifecycle.visible_error().is_some());
        // Surface stays attached until dispose.
        assert_eq!(lifecycle.attached_surfaces(), 1);
        lifecycle.dispose();
        assert_eq!(lifecycle.attached_surfaces(), 0);
    }

    #[test]
    fn test_out_of_order_transitions_rejected() {
        let mut lifecycle = SceneLifecycle::new();
        let ticket = lifecycle.begin("m-1");
        // Cannot mount before metadata is in.
        assert!(!lifecycle.mount_scene(ticket));
        // Cannot finish a model that never started loading.
        assert!(lifecycle.metadata_ready(ticket));
        assert!(!lifecycle.model_ready(ticket));
    }
}
