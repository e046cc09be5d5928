use super::*;
use std::rc::Rc;

/// Flags used when constructing an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// A synthetic event travelling through a [`Document`].
#[derive(Debug, Clone)]
pub struct Event {
    event_type: String,
    target: NodeId,
    current_target: NodeId,
    phase: EventPhase,
    bubbles: bool,
    cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    pub(crate) fn new(event_type: &str, target: NodeId, init: EventInit) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            phase: EventPhase::None,
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Has no effect on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub(crate) fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(crate) fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    pub(crate) fn enter(&mut self, current_target: NodeId, phase: EventPhase) {
        self.current_target = current_target;
        self.phase = phase;
    }

    pub(crate) fn finish(&mut self) {
        self.current_target = self.target;
        self.phase = EventPhase::None;
    }
}

/// Handle returned by [`Document::add_event_listener`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub(crate) type ListenerCallback = Rc<dyn Fn(&mut Event)>;

#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) capture: bool,
    pub(crate) callback: ListenerCallback,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
    next_id: u64,
}

impl ListenerStore {
    pub(crate) fn add(
        &mut self,
        node_id: NodeId,
        event: &str,
        capture: bool,
        callback: ListenerCallback,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(Listener {
                id,
                capture,
                callback,
            });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let found = self.map.iter().find_map(|(node_id, events)| {
            events
                .iter()
                .find(|(_, listeners)| listeners.iter().any(|listener| listener.id == id))
                .map(|(event, _)| (*node_id, event.clone()))
        });
        let Some((node_id, event)) = found else {
            return false;
        };

        if let Some(events) = self.map.get_mut(&node_id) {
            if let Some(listeners) = events.get_mut(&event) {
                listeners.retain(|listener| listener.id != id);
                if listeners.is_empty() {
                    events.remove(&event);
                }
            }
            if events.is_empty() {
                self.map.remove(&node_id);
            }
        }
        true
    }

    /// Snapshot of the listeners for one phase, so callbacks may not observe later changes.
    pub(crate) fn get(&self, node_id: NodeId, event: &str, capture: bool) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter(|listener| listener.capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
