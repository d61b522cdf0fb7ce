use crate::NodeId;
use std::cell::Cell;

/// Event types a listener can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Custom(String),
}

/// Event delivered to listeners during dispatch.
#[derive(Debug)]
pub struct Event {
    kind: EventKind,
    target: NodeId,
    current_target: Cell<NodeId>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: Cell::new(target),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Node the event was dispatched on.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listeners are currently running.
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub(crate) fn set_current_target(&self, node_id: NodeId) {
        self.current_target.set(node_id);
    }
}
