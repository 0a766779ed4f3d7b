//! Per-view session state machine.
//!
//! One [`ViewSession`] lives per editor view. It mirrors the host's notion
//! of what file the buffer holds and what language it is, attaches the
//! gutter while the buffer is checkable, launches checker runs on save,
//! and commits parsed results into the overlay the host paints from.
//!
//! Everything here runs on the host's event loop. The only background work
//! is the checker task, whose terminal event re-enters through
//! [`poll_events`](ViewSession::poll_events); the session never blocks on
//! it. At most one run is in flight per view, and starting a new run
//! cancels the old one by dropping its handle, so a superseded run has no
//! path back into the overlay.

use std::path::{Path, PathBuf};

use sidelight_checker::{CheckEvent, RunningCheck, discover_project_root, parse};
use sidelight_types::{CheckerConfig, TextEdit};

use crate::overlay::{GutterPaint, OverlayIndex};
use crate::subscriptions::{HostView, SignalKind, SubscriptionSet};

/// Per-view diagnostics session.
///
/// Hosts drive it with notifications (`set_location`, `set_language`,
/// `notify_saved`, `notify_loaded`, `buffer_edited`), poll it from their
/// tick, and read it through the paint and tooltip queries. Construction
/// is inert; [`activate`](Self::activate) connects it to a view.
pub struct ViewSession {
    config: CheckerConfig,
    location: Option<PathBuf>,
    language: Option<String>,
    attached: bool,
    base_subs: SubscriptionSet,
    attach_subs: SubscriptionSet,
    overlay: OverlayIndex,
    running: Option<RunningCheck>,
}

impl ViewSession {
    #[must_use]
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            config,
            location: None,
            language: None,
            attached: false,
            base_subs: SubscriptionSet::new(),
            attach_subs: SubscriptionSet::new(),
            overlay: OverlayIndex::new(),
            running: None,
        }
    }

    /// Connect to a view. Call once per session.
    ///
    /// Subscribes to the signals that can change whether the buffer is
    /// checkable; the per-attachment `Changed` subscription is managed
    /// separately as the buffer moves in and out of checkability.
    pub fn activate(&mut self, host: &mut dyn HostView) {
        self.base_subs.acquire(host, SignalKind::Saved);
        self.base_subs.acquire(host, SignalKind::Loaded);
        self.base_subs.acquire(host, SignalKind::LanguageChanged);
        self.refresh_attachment(host);
    }

    /// Disconnect from the view, releasing everything `activate` and any
    /// attachment acquired.
    pub fn deactivate(&mut self, host: &mut dyn HostView) {
        self.cancel_check();
        if self.attached {
            self.attach_subs.release_all(host);
            host.detach_gutter();
            self.attached = false;
        }
        self.overlay.clear();
        self.base_subs.release_all(host);
    }

    /// The host's file for this buffer changed (set, save-as, or cleared).
    ///
    /// Hosts set the location before delivering the `Saved` or `Loaded`
    /// notification that accompanies the change; this call itself only
    /// resettles state, it does not start a check.
    pub fn set_location(&mut self, host: &mut dyn HostView, location: Option<PathBuf>) {
        if self.location == location {
            return;
        }
        // Anything in flight or on screen was for the old file.
        self.cancel_check();
        self.overlay.clear();
        self.location = location;
        self.refresh_attachment(host);
    }

    /// The buffer's language id changed.
    pub fn set_language(&mut self, host: &mut dyn HostView, language: Option<String>) {
        if self.language == language {
            return;
        }
        self.language = language;
        self.refresh_attachment(host);
    }

    /// The buffer was written to disk: the moment to (re)check.
    pub fn notify_saved(&mut self, host: &mut dyn HostView) {
        let was_attached = self.attached;
        self.refresh_attachment(host);
        // A fresh attachment already started its first check.
        if self.attached && was_attached {
            self.start_check();
        }
    }

    /// A file was loaded into the buffer, replacing its contents.
    ///
    /// Old overlay positions are meaningless against the new text, so the
    /// overlay clears immediately rather than waiting for the next commit.
    pub fn notify_loaded(&mut self, host: &mut dyn HostView) {
        self.cancel_check();
        self.overlay.clear();
        let was_attached = self.attached;
        self.refresh_attachment(host);
        if self.attached && was_attached {
            self.start_check();
        }
    }

    /// The buffer text changed; shift overlay anchors accordingly.
    pub fn buffer_edited(&mut self, edit: &TextEdit) {
        self.overlay.apply_edit(edit);
    }

    /// Drain pending checker events, up to `budget`.
    ///
    /// Non-blocking; call from the host's tick. A nonzero return means
    /// overlay state may have changed and the gutter is worth redrawing.
    pub fn poll_events(&mut self, budget: usize) -> usize {
        let mut count = 0;
        while count < budget {
            let event = match self.running.as_mut() {
                Some(run) => run.try_next_event(),
                None => None,
            };
            match event {
                Some(event) => {
                    self.handle_event(event);
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    fn handle_event(&mut self, event: CheckEvent) {
        match event {
            CheckEvent::Completed { stdout } => {
                let Some(run) = self.running.take() else { return };
                let Some(active) = self.location.as_deref() else {
                    tracing::debug!("Discarding completed run: view no longer has a location");
                    return;
                };
                if run.file() != active {
                    tracing::debug!(
                        "Discarding completed run for {} after a location change",
                        run.file().display()
                    );
                    return;
                }
                let diagnostics = parse::parse_output(&stdout, active);
                tracing::debug!(
                    path = %active.display(),
                    count = diagnostics.len(),
                    "Diagnostics updated"
                );
                self.overlay.replace(diagnostics);
            }
            CheckEvent::CheckerMissing { command } => {
                self.running = None;
                tracing::warn!("Checker '{command}' not found in PATH; diagnostics unavailable");
            }
            CheckEvent::Failed { message } => {
                self.running = None;
                tracing::warn!("Checker run failed: {message}");
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Paint for a single gutter line.
    #[must_use]
    pub fn paint_for_line(&self, line: u32) -> Option<GutterPaint> {
        self.overlay.paint_for_line(line)
    }

    /// Paint for a range of gutter lines.
    #[must_use]
    pub fn paint_for_lines(&self, first: u32, last: u32) -> Option<GutterPaint> {
        self.overlay.paint_for_lines(first, last)
    }

    /// Tooltip markup for one line, or `None` when there is nothing there.
    #[must_use]
    pub fn tooltip_for_line(&self, line: u32) -> Option<String> {
        self.overlay.tooltip_for_line(line)
    }

    /// Direct access to the overlay for richer queries.
    #[must_use]
    pub fn overlay(&self) -> &OverlayIndex {
        &self.overlay
    }

    /// Number of findings currently committed.
    #[must_use]
    pub fn diagnostic_count(&self) -> usize {
        self.overlay.len()
    }

    /// Whether the gutter is attached (the buffer is checkable).
    #[must_use]
    pub fn attached(&self) -> bool {
        self.attached
    }

    /// Whether a check is in flight.
    #[must_use]
    pub fn is_checking(&self) -> bool {
        self.running.is_some()
    }

    /// The file this session currently mirrors.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn is_checkable(&self) -> bool {
        let Some(file) = self.location.as_deref() else {
            return false;
        };
        if !self.config.matches_language(self.language.as_deref()) {
            return false;
        }
        discover_project_root(file, self.config.root_markers()).is_some()
    }

    /// Reconcile attachment with checkability, attaching or detaching the
    /// gutter and the `Changed` subscription as needed.
    fn refresh_attachment(&mut self, host: &mut dyn HostView) {
        let checkable = self.is_checkable();
        if checkable == self.attached {
            return;
        }
        if checkable {
            tracing::info!(
                "Attaching diagnostics gutter ({})",
                self.location.as_deref().unwrap_or(Path::new("?")).display()
            );
            host.attach_gutter();
            self.attach_subs.acquire(host, SignalKind::Changed);
            self.attached = true;
            self.start_check();
        } else {
            tracing::info!("Detaching diagnostics gutter");
            self.attach_subs.release_all(host);
            host.detach_gutter();
            self.attached = false;
            self.cancel_check();
            self.overlay.clear();
        }
    }

    /// Launch a run for the current location, cancelling any run already
    /// in flight. At most one run per view.
    fn start_check(&mut self) {
        self.cancel_check();
        let Some(file) = self.location.clone() else {
            return;
        };
        let Some(root) = discover_project_root(&file, self.config.root_markers()) else {
            return;
        };
        tracing::info!("Checking {} (root {})", file.display(), root.display());
        self.running = Some(RunningCheck::start(&self.config, &file, &root));
    }

    fn cancel_check(&mut self) {
        if let Some(run) = self.running.take() {
            tracing::debug!("Cancelling in-flight check for {}", run.file().display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::RecordingHost;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// A config whose command never resolves, so attach-time checks stay
    /// inert no matter what is installed on the machine.
    fn inert_config() -> CheckerConfig {
        CheckerConfig::with_command("sidelight-missing-checker-for-tests").unwrap()
    }

    fn python_file() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.py");
        fs::write(&file, "x = 1\n").unwrap();
        (dir, file)
    }

    /// Drive an activated, checkable session: attach and return the host.
    fn attached_session(file: PathBuf) -> (ViewSession, RecordingHost) {
        let mut host = RecordingHost::default();
        let mut session = ViewSession::new(inert_config());
        session.activate(&mut host);
        session.set_language(&mut host, Some("python".to_string()));
        session.set_location(&mut host, Some(file));
        (session, host)
    }

    async fn drain_one_event(session: &mut ViewSession) {
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                if session.poll_events(8) > 0 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("no checker event arrived in time");
    }

    #[test]
    fn test_activate_connects_base_signals_only() {
        let mut host = RecordingHost::default();
        let mut session = ViewSession::new(inert_config());
        session.activate(&mut host);

        assert_eq!(
            host.live_signals(),
            [SignalKind::LanguageChanged, SignalKind::Loaded, SignalKind::Saved]
        );
        assert!(!host.gutter_attached);
        assert!(!session.attached());
    }

    #[test]
    fn test_language_without_location_does_not_attach() {
        let mut host = RecordingHost::default();
        let mut session = ViewSession::new(inert_config());
        session.activate(&mut host);
        session.set_language(&mut host, Some("python".to_string()));
        assert!(!session.attached());
        assert!(!host.gutter_attached);
    }

    #[tokio::test]
    async fn test_checkable_buffer_attaches_and_starts_first_check() {
        let (_dir, file) = python_file();
        let (session, host) = attached_session(file.clone());

        assert!(session.attached());
        assert!(host.gutter_attached);
        assert_eq!(host.gutter_attach_count, 1);
        assert!(host.live_signals().contains(&SignalKind::Changed));
        assert!(session.is_checking());
        assert_eq!(session.location(), Some(file.as_path()));
    }

    #[tokio::test]
    async fn test_language_prefix_attaches() {
        let (_dir, file) = python_file();
        let mut host = RecordingHost::default();
        let mut session = ViewSession::new(inert_config());
        session.activate(&mut host);
        session.set_language(&mut host, Some("python3".to_string()));
        session.set_location(&mut host, Some(file));
        assert!(session.attached());
    }

    #[tokio::test]
    async fn test_other_language_never_attaches() {
        let (_dir, file) = python_file();
        let mut host = RecordingHost::default();
        let mut session = ViewSession::new(inert_config());
        session.activate(&mut host);
        session.set_language(&mut host, Some("rust".to_string()));
        session.set_location(&mut host, Some(file));
        assert!(!session.attached());
        assert!(!session.is_checking());
    }

    #[tokio::test]
    async fn test_losing_the_language_detaches_cancels_and_clears() {
        let (_dir, file) = python_file();
        let (mut session, mut host) = attached_session(file);
        assert!(session.is_checking());

        session.set_language(&mut host, None);

        assert!(!session.attached());
        assert!(!host.gutter_attached);
        assert!(!session.is_checking());
        assert_eq!(session.diagnostic_count(), 0);
        // Base subscriptions survive; only the attachment scope released.
        assert_eq!(
            host.live_signals(),
            [SignalKind::LanguageChanged, SignalKind::Loaded, SignalKind::Saved]
        );
    }

    #[tokio::test]
    async fn test_clearing_the_location_detaches() {
        let (_dir, file) = python_file();
        let (mut session, mut host) = attached_session(file);

        session.set_location(&mut host, None);

        assert!(!session.attached());
        assert!(!session.is_checking());
        assert_eq!(session.location(), None);
    }

    #[tokio::test]
    async fn test_deactivate_releases_everything() {
        let (_dir, file) = python_file();
        let (mut session, mut host) = attached_session(file);

        session.deactivate(&mut host);

        assert!(host.fully_released());
        assert!(!session.is_checking());
        assert_eq!(session.diagnostic_count(), 0);
    }

    #[tokio::test]
    async fn test_deactivate_without_attachment_releases_base_set() {
        let mut host = RecordingHost::default();
        let mut session = ViewSession::new(inert_config());
        session.activate(&mut host);
        session.deactivate(&mut host);
        assert!(host.fully_released());
    }

    #[tokio::test]
    async fn test_missing_checker_consumes_the_run_and_keeps_the_view() {
        let (_dir, file) = python_file();
        let (mut session, _host) = attached_session(file);

        drain_one_event(&mut session).await;

        // The run resolved to "checker missing": nothing committed, no
        // run left, and the view stays attached and usable.
        assert!(!session.is_checking());
        assert_eq!(session.diagnostic_count(), 0);
        assert!(session.attached());
        assert_eq!(session.poll_events(8), 0);
    }

    #[tokio::test]
    async fn test_saving_while_attached_restarts_the_check() {
        let (_dir, file) = python_file();
        let (mut session, mut host) = attached_session(file);
        drain_one_event(&mut session).await;
        assert!(!session.is_checking());

        session.notify_saved(&mut host);
        assert!(session.is_checking());
    }

    #[tokio::test]
    async fn test_loading_clears_the_overlay_and_rechecks() {
        let (_dir, file) = python_file();
        let (mut session, mut host) = attached_session(file);
        drain_one_event(&mut session).await;

        session.notify_loaded(&mut host);
        assert_eq!(session.diagnostic_count(), 0);
        assert!(session.is_checking());
    }

    #[test]
    fn test_queries_are_empty_before_any_commit() {
        let session = ViewSession::new(inert_config());
        assert_eq!(session.paint_for_line(1), None);
        assert_eq!(session.paint_for_lines(1, 100), None);
        assert_eq!(session.tooltip_for_line(1), None);
        assert_eq!(session.diagnostic_count(), 0);
    }

    #[test]
    fn test_edits_before_attachment_are_harmless() {
        let mut session = ViewSession::new(inert_config());
        session.buffer_edited(&TextEdit::Insert {
            at: sidelight_types::Position::new(1, 0),
            lines: 1,
            trailing_cols: 0,
        });
        assert_eq!(session.diagnostic_count(), 0);
    }

    #[test]
    fn test_poll_without_a_run_returns_zero() {
        let mut session = ViewSession::new(inert_config());
        assert_eq!(session.poll_events(32), 0);
    }
}
