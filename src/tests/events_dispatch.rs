use super::*;
use std::cell::RefCell;
use std::rc::Rc;

const NESTED_HTML: &str = "<div id='outer'><div id='inner'><button id='btn'>go</button></div></div>";

type Calls = Rc<RefCell<Vec<String>>>;

fn record(
    doc: &mut Document,
    node: NodeId,
    event_type: &str,
    capture: bool,
    calls: &Calls,
    label: &'static str,
) -> Result<ListenerId> {
    let calls = Rc::clone(calls);
    doc.add_event_listener(node, event_type, capture, move |_| {
        calls.borrow_mut().push(label.to_string());
    })
}

fn taken(calls: &Calls) -> Vec<String> {
    std::mem::take(&mut *calls.borrow_mut())
}

#[test]
fn dispatch_runs_capture_target_then_bubble() -> Result<()> {
    let mut doc = Document::from_html(NESTED_HTML)?;
    let outer = id(&doc, "outer")?;
    let inner = id(&doc, "inner")?;
    let btn = id(&doc, "btn")?;
    let calls = Calls::default();

    record(&mut doc, outer, "click", false, &calls, "outer-bubble")?;
    record(&mut doc, outer, "click", true, &calls, "outer-capture")?;
    record(&mut doc, inner, "click", true, &calls, "inner-capture")?;
    record(&mut doc, inner, "click", false, &calls, "inner-bubble")?;
    record(&mut doc, btn, "click", false, &calls, "btn-bubble")?;
    record(&mut doc, btn, "click", true, &calls, "btn-capture")?;
    record(&mut doc, btn, "focus", false, &calls, "btn-focus")?;

    let init = EventInit {
        bubbles: true,
        cancelable: false,
    };
    doc.dispatch_event(btn, "click", init)?;
    assert_eq!(
        taken(&calls),
        vec![
            "outer-capture",
            "inner-capture",
            "btn-capture",
            "btn-bubble",
            "inner-bubble",
            "outer-bubble",
        ]
    );

    doc.dispatch_event(btn, "click", EventInit::default())?;
    assert_eq!(
        taken(&calls),
        vec!["outer-capture", "inner-capture", "btn-capture", "btn-bubble"]
    );
    Ok(())
}

#[test]
fn listeners_see_target_current_target_and_phase() -> Result<()> {
    let mut doc = Document::from_html(NESTED_HTML)?;
    let outer = id(&doc, "outer")?;
    let btn = id(&doc, "btn")?;
    let seen = Rc::new(RefCell::new(Vec::new()));

    for (node, capture) in [(outer, true), (btn, false), (outer, false)] {
        let seen = Rc::clone(&seen);
        doc.add_event_listener(node, "ping", capture, move |event| {
            seen.borrow_mut()
                .push((event.target(), event.current_target(), event.phase()));
        })?;
    }

    let event = trigger(&mut doc, btn)?;
    assert_eq!(
        *seen.borrow(),
        vec![
            (btn, outer, EventPhase::Capturing),
            (btn, btn, EventPhase::AtTarget),
            (btn, outer, EventPhase::Bubbling),
        ]
    );
    assert_eq!(event.phase(), EventPhase::None);
    assert_eq!(event.current_target(), btn);
    assert_eq!(event.event_type(), "ping");
    Ok(())
}

fn trigger(doc: &mut Document, target: NodeId) -> Result<Event> {
    doc.dispatch_event(
        target,
        "ping",
        EventInit {
            bubbles: true,
            cancelable: false,
        },
    )
}

#[test]
fn stop_propagation_finishes_current_node_only() -> Result<()> {
    let mut doc = Document::from_html(NESTED_HTML)?;
    let outer = id(&doc, "outer")?;
    let btn = id(&doc, "btn")?;
    let calls = Calls::default();

    doc.add_event_listener(btn, "click", false, |event| event.stop_propagation())?;
    record(&mut doc, btn, "click", false, &calls, "btn-second")?;
    record(&mut doc, outer, "click", false, &calls, "outer")?;

    trigger_event(&mut doc, btn, "click")?;
    assert_eq!(taken(&calls), vec!["btn-second"]);
    Ok(())
}

#[test]
fn stop_immediate_propagation_skips_remaining_listeners() -> Result<()> {
    let mut doc = Document::from_html(NESTED_HTML)?;
    let outer = id(&doc, "outer")?;
    let btn = id(&doc, "btn")?;
    let calls = Calls::default();

    record(&mut doc, outer, "click", true, &calls, "outer-capture")?;
    doc.add_event_listener(btn, "click", false, |event| {
        event.stop_immediate_propagation();
    })?;
    record(&mut doc, btn, "click", false, &calls, "btn-second")?;
    record(&mut doc, outer, "click", false, &calls, "outer-bubble")?;

    trigger_event(&mut doc, btn, "click")?;
    assert_eq!(taken(&calls), vec!["outer-capture"]);
    Ok(())
}

#[test]
fn capture_listener_can_stop_before_target() -> Result<()> {
    let mut doc = Document::from_html(NESTED_HTML)?;
    let inner = id(&doc, "inner")?;
    let btn = id(&doc, "btn")?;
    let calls = Calls::default();

    doc.add_event_listener(inner, "click", true, |event| event.stop_propagation())?;
    record(&mut doc, btn, "click", false, &calls, "btn")?;

    trigger_event(&mut doc, btn, "click")?;
    assert!(taken(&calls).is_empty());
    Ok(())
}

#[test]
fn prevent_default_requires_cancelable() -> Result<()> {
    let mut doc = Document::from_html(NESTED_HTML)?;
    let btn = id(&doc, "btn")?;
    doc.add_event_listener(btn, "submit", false, |event| event.prevent_default())?;

    let plain = doc.dispatch_event(btn, "submit", EventInit::default())?;
    assert!(!plain.default_prevented());
    assert!(!plain.cancelable());

    let cancelable = doc.dispatch_event(
        btn,
        "submit",
        EventInit {
            bubbles: false,
            cancelable: true,
        },
    )?;
    assert!(cancelable.default_prevented());
    Ok(())
}

#[test]
fn removed_listeners_are_not_called() -> Result<()> {
    let mut doc = Document::from_html(NESTED_HTML)?;
    let btn = id(&doc, "btn")?;
    let calls = Calls::default();

    let first = record(&mut doc, btn, "click", false, &calls, "first")?;
    record(&mut doc, btn, "click", false, &calls, "second")?;

    assert!(doc.remove_event_listener(first));
    assert!(!doc.remove_event_listener(first));

    trigger_event(&mut doc, btn, "click")?;
    assert_eq!(taken(&calls), vec!["second"]);
    Ok(())
}

#[test]
fn trigger_event_bubbles_and_is_not_cancelable() -> Result<()> {
    let mut doc = Document::from_html(NESTED_HTML)?;
    let outer = id(&doc, "outer")?;
    let btn = id(&doc, "btn")?;
    let flags = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&flags);
    doc.add_event_listener(outer, "custom:open", false, move |event| {
        event.prevent_default();
        sink.borrow_mut().push((
            event.event_type().to_string(),
            event.bubbles(),
            event.cancelable(),
            event.default_prevented(),
        ));
    })?;

    trigger_event(&mut doc, btn, "custom:open")?;
    assert_eq!(
        *flags.borrow(),
        vec![("custom:open".to_string(), true, false, false)]
    );
    Ok(())
}

#[test]
fn dispatch_on_detached_node_reaches_only_its_own_tree() -> Result<()> {
    let mut doc = Document::from_html(NESTED_HTML)?;
    let outer = id(&doc, "outer")?;
    let calls = Calls::default();

    let wrapper = doc.create_element("section")?;
    let child = doc.create_element("span")?;
    doc.append_child(wrapper, child)?;
    record(&mut doc, wrapper, "click", false, &calls, "wrapper")?;
    record(&mut doc, outer, "click", false, &calls, "outer")?;

    trigger_event(&mut doc, child, "click")?;
    assert_eq!(taken(&calls), vec!["wrapper"]);
    Ok(())
}

#[test]
fn unknown_nodes_are_rejected() {
    let mut doc = Document::new();
    let err = trigger_event(&mut doc, NodeId(99), "click").expect_err("node is unknown");
    assert!(matches!(err, Error::InvalidNode(_)));

    let err = doc
        .add_event_listener(NodeId(99), "click", false, |_| {})
        .expect_err("node is unknown");
    assert!(matches!(err, Error::InvalidNode(_)));
}
