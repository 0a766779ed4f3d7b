//! Host signal subscriptions.
//!
//! The engine never talks to a toolkit directly. The host implements
//! [`HostView`], and a session records every connection it makes in a
//! [`SubscriptionSet`] so deactivation releases exactly what activation
//! acquired. Two sets exist per session: base subscriptions that live for
//! the whole activation, and attach-scoped ones that come and go with the
//! buffer being checkable. Releasing a set drains it, so a second release
//! is a no-op rather than a double disconnect.

/// Buffer and view signals a session asks the host to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// The buffer was written to disk.
    Saved,
    /// A file was loaded (or reloaded) into the buffer.
    Loaded,
    /// The buffer's language id changed.
    LanguageChanged,
    /// The buffer text changed.
    Changed,
}

/// Opaque handle for one host-side signal connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// The seam between a session and the host's view widget.
///
/// `connect` asks the host to start delivering a signal (by calling the
/// matching `ViewSession` method) and returns a handle for `disconnect`.
/// The gutter methods install and remove the host's renderer for the
/// paint instructions this engine computes.
pub trait HostView {
    fn connect(&mut self, signal: SignalKind) -> SubscriptionId;
    fn disconnect(&mut self, id: SubscriptionId);
    fn attach_gutter(&mut self);
    fn detach_gutter(&mut self);
}

/// A scoped batch of subscriptions.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    ids: Vec<SubscriptionId>,
}

impl SubscriptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Connect `signal` on the host and retain the handle.
    pub fn acquire(&mut self, host: &mut dyn HostView, signal: SignalKind) {
        let id = host.connect(signal);
        self.ids.push(id);
    }

    /// Disconnect every retained handle, leaving the set empty.
    pub fn release_all(&mut self, host: &mut dyn HostView) {
        for id in self.ids.drain(..) {
            host.disconnect(id);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Recording fake for tests: tracks live connections and panics on a
/// double disconnect.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    next_id: u64,
    pub(crate) live: std::collections::HashMap<SubscriptionId, SignalKind>,
    pub(crate) disconnect_count: usize,
    pub(crate) gutter_attached: bool,
    pub(crate) gutter_attach_count: usize,
}

#[cfg(test)]
impl RecordingHost {
    pub(crate) fn live_signals(&self) -> Vec<SignalKind> {
        let mut signals: Vec<SignalKind> = self.live.values().copied().collect();
        signals.sort_by_key(|signal| format!("{signal:?}"));
        signals
    }

    pub(crate) fn fully_released(&self) -> bool {
        self.live.is_empty() && !self.gutter_attached
    }
}

#[cfg(test)]
impl HostView for RecordingHost {
    fn connect(&mut self, signal: SignalKind) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.live.insert(id, signal);
        id
    }

    fn disconnect(&mut self, id: SubscriptionId) {
        assert!(
            self.live.remove(&id).is_some(),
            "disconnect of unknown or already-released subscription {id:?}"
        );
        self.disconnect_count += 1;
    }

    fn attach_gutter(&mut self) {
        assert!(!self.gutter_attached, "gutter attached twice");
        self.gutter_attached = true;
        self.gutter_attach_count += 1;
    }

    fn detach_gutter(&mut self) {
        assert!(self.gutter_attached, "gutter detached while not attached");
        self.gutter_attached = false;
    }
}
