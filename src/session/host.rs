//! Listener registration with the embedding host.

/// Input channels a session listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerChannel {
    Pointer,
    Keyboard,
    Paste,
}

impl ListenerChannel {
    pub const ALL: [ListenerChannel; 3] = [
        ListenerChannel::Pointer,
        ListenerChannel::Keyboard,
        ListenerChannel::Paste,
    ];
}

/// Handle returned by the host for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Event source the session subscribes to while it is open.
///
/// The host routes events on subscribed channels to the session's
/// `handle_pointer`, `handle_key` and `paste_image` methods.
pub trait EventHost {
    fn subscribe(&mut self, channel: ListenerChannel) -> ListenerId;
    fn unsubscribe(&mut self, id: ListenerId);
}
