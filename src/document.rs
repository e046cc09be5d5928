use super::*;
use crate::events::{Event, EventInit, EventPhase, ListenerId};
use crate::trace::TraceCategory;
use std::rc::Rc;

/// An in-memory document tree together with its event listeners.
///
/// This is the context every helper in the crate operates on. Nodes are
/// addressed by [`NodeId`]; the document owns them for its whole lifetime.
#[derive(Debug, Clone)]
pub struct Document {
    dom: Dom,
    listeners: ListenerStore,
    trace: TraceLog,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document containing only the document node.
    pub fn new() -> Self {
        Self {
            dom: Dom::new(),
            listeners: ListenerStore::default(),
            trace: TraceLog::default(),
        }
    }

    pub fn from_html(html: &str) -> Result<Self> {
        let mut dom = parse_html(html)?;
        dom.rebuild_id_index();
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            trace: TraceLog::default(),
        })
    }

    /// The document node itself. It is not an element and never matches a selector.
    pub fn root(&self) -> NodeId {
        self.dom.root
    }

    pub fn body(&self) -> Option<NodeId> {
        self.dom.query_selector_all("body").ok()?.into_iter().next()
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_trace_dom(&mut self, enabled: bool) {
        self.trace.dom = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace.to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.trace.set_limit(max_entries)
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace.take()
    }

    pub fn create_element(&mut self, tag_name: &str) -> Result<NodeId> {
        let valid = tag_name
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_alphabetic())
            && tag_name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(Error::InvalidNode(format!("invalid tag name: {tag_name:?}")));
        }
        Ok(self.dom.create_detached_element(tag_name.to_string()))
    }

    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.dom.create_detached_text(text.to_string())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.dom.append_child(parent, child)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.dom.remove_child(parent, child)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.parent(node)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.dom.children(node).to_vec()
    }

    /// Inclusive: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.dom.is_valid_node(ancestor) && self.dom.contains(ancestor, node)
    }

    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.dom.previous_element_sibling(node)
    }

    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.dom.next_element_sibling(node)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.dom.element(node).is_some()
    }

    /// Lowercase tag name, `None` for non-element nodes.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.dom.tag_name(node)
    }

    /// `DIV` for elements, `#text` and `#document` otherwise.
    pub fn node_name(&self, node: NodeId) -> String {
        self.dom.node_name(node)
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        self.dom.require_element(node, "getAttribute")?;
        Ok(self.dom.attr(node, name))
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.dom.set_attr(node, name, value)
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.dom.remove_attr(node, name)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.by_id(id)
    }

    pub fn class_list(&self, node: NodeId) -> Result<Vec<String>> {
        self.dom.class_list(node)
    }

    pub fn class_list_contains(&self, node: NodeId, class_name: &str) -> Result<bool> {
        self.dom.class_contains(node, class_name)
    }

    pub fn class_list_add(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        if self.dom.class_add(node, class_name)? {
            self.trace_dom(node, "class add", || format!("class={class_name}"));
        }
        Ok(())
    }

    pub fn class_list_remove(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        if self.dom.class_remove(node, class_name)? {
            self.trace_dom(node, "class remove", || format!("class={class_name}"));
        }
        Ok(())
    }

    pub fn class_list_toggle(&mut self, node: NodeId, class_name: &str) -> Result<bool> {
        let added = self.dom.class_toggle(node, class_name)?;
        self.trace_dom(node, "class toggle", || {
            format!("class={class_name} present={added}")
        });
        Ok(added)
    }

    /// Reads one inline style declaration; accepts `camelCase` or `kebab-case` names.
    pub fn style_property(&self, node: NodeId, name: &str) -> Result<String> {
        self.dom.style_get(node, name)
    }

    /// Writes one inline style declaration. Invalid names or values are ignored, an
    /// empty value removes the declaration.
    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        if self.dom.style_set(node, name, value)? {
            self.trace_dom(node, "style set", || format!("prop={name} value={value}"));
        } else {
            self.trace_dom(node, "style ignored", || format!("prop={name} value={value}"));
        }
        Ok(())
    }

    pub fn text_content(&self, node: NodeId) -> Result<String> {
        self.dom.ensure_node(node)?;
        Ok(self.dom.text_content(node))
    }

    pub fn set_text_content(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.dom.set_text_content(node, value)
    }

    pub fn inner_html(&self, node: NodeId) -> Result<String> {
        self.dom.inner_html(node)
    }

    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        self.dom.set_inner_html(node, html)
    }

    pub fn outer_html(&self, node: NodeId) -> Result<String> {
        self.dom.ensure_node(node)?;
        Ok(self.dom.dump_node(node))
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.dom.query_selector_all(selector)?.into_iter().next())
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    /// First descendant of `root` (excluding `root`) matching `selector`.
    pub fn query_selector_from(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self
            .dom
            .query_selector_all_from(root, selector)?
            .into_iter()
            .next())
    }

    pub fn query_selector_all_from(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all_from(root, selector)
    }

    /// `false` for non-element nodes; malformed selectors are still reported.
    pub fn matches(&self, node: NodeId, selector: &str) -> Result<bool> {
        self.dom.matches_selector(node, selector)
    }

    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        self.dom.closest(node, selector)
    }

    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        capture: bool,
        callback: impl Fn(&mut Event) + 'static,
    ) -> Result<ListenerId> {
        self.dom.ensure_node(node)?;
        Ok(self
            .listeners
            .add(node, event_type, capture, Rc::new(callback)))
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Dispatches synchronously through capture, target and (when `bubbles`) bubble
    /// phases, returning the event as it stands after the last listener ran.
    pub fn dispatch_event(
        &mut self,
        target: NodeId,
        event_type: &str,
        init: EventInit,
    ) -> Result<Event> {
        self.dom.ensure_node(target)?;
        let mut event = Event::new(event_type, target, init);

        let mut path = Vec::new();
        let mut cursor = self.dom.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        path.reverse();

        let outcome = self.propagate(&path, &mut event);
        self.trace_event_done(&event, outcome);
        event.finish();
        Ok(event)
    }

    /// `ancestors` runs from the outermost node down to the target's parent.
    fn propagate(&mut self, ancestors: &[NodeId], event: &mut Event) -> &'static str {
        let target = event.target();

        for node in ancestors {
            event.enter(*node, EventPhase::Capturing);
            self.invoke_listeners(*node, event, true);
            if event.propagation_stopped() {
                return "propagation_stopped";
            }
        }

        // Target phase: capture listeners first.
        for capture in [true, false] {
            event.enter(target, EventPhase::AtTarget);
            self.invoke_listeners(target, event, capture);
            if event.propagation_stopped() {
                return "propagation_stopped";
            }
        }

        if event.bubbles() {
            for node in ancestors.iter().rev() {
                event.enter(*node, EventPhase::Bubbling);
                self.invoke_listeners(*node, event, false);
                if event.propagation_stopped() {
                    return "propagation_stopped";
                }
            }
        }

        "completed"
    }

    fn invoke_listeners(&mut self, node: NodeId, event: &mut Event, capture: bool) {
        let listeners = self.listeners.get(node, event.event_type(), capture);
        for listener in listeners {
            if self.trace.wants(TraceCategory::Events) {
                let phase = match event.phase() {
                    EventPhase::Capturing => "capture",
                    EventPhase::AtTarget => "target",
                    EventPhase::Bubbling => "bubble",
                    EventPhase::None => "none",
                };
                let target_label = self.dom.node_label(event.target());
                let current_label = self.dom.node_label(event.current_target());
                self.trace.record(TraceCategory::Events, || {
                    format!(
                        "[event] {} target={} current={} phase={}",
                        event.event_type(),
                        target_label,
                        current_label,
                        phase
                    )
                });
            }
            (listener.callback)(event);
            if event.immediate_propagation_stopped() {
                break;
            }
        }
    }

    fn trace_event_done(&mut self, event: &Event, outcome: &str) {
        if !self.trace.wants(TraceCategory::Events) {
            return;
        }
        let target_label = self.dom.node_label(event.target());
        self.trace.record(TraceCategory::Events, || {
            format!(
                "[event] done {} target={} outcome={} bubbles={} cancelable={} default_prevented={}",
                event.event_type(),
                target_label,
                outcome,
                event.bubbles(),
                event.cancelable(),
                event.default_prevented()
            )
        });
    }

    fn trace_dom(&mut self, node: NodeId, action: &str, detail: impl FnOnce() -> String) {
        if !self.trace.wants(TraceCategory::Dom) {
            return;
        }
        let label = self.dom.node_label(node);
        self.trace.record(TraceCategory::Dom, || {
            format!("[dom] {action} target={label} {}", detail())
        });
    }

    pub(crate) fn dom(&self) -> &Dom {
        &self.dom
    }

    pub(crate) fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }
}
