use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use vanilla_dom::{
    ClassSpec, Document, Error, NodeId, Query, add_classes, apply_css, get_dom, node_index,
    parent_match, query_selector_end, remove_classes, trigger_event,
};

const DROPDOWN_HTML: &str = r#"
<html>
  <body id='page'>
    <div id='dropdown' class='dropdown'>
      <input id='control' type='text'>
      <div id='options' class='options'>
        <div class='option' data-value='a'><span>Alpha</span></div>
        <div class='option' data-value='b'><span>Beta</span></div>
        <div class='option' data-value='c'><span>Gamma</span></div>
      </div>
    </div>
  </body>
</html>
"#;

fn required(node: Option<NodeId>, what: &str) -> vanilla_dom::Result<NodeId> {
    node.ok_or_else(|| Error::InvalidNode(format!("missing {what}")))
}

#[test]
fn dropdown_click_selects_option_through_delegation() -> vanilla_dom::Result<()> {
    let mut doc = Document::from_html(DROPDOWN_HTML)?;
    let dropdown = required(get_dom(&mut doc, "#dropdown")?, "dropdown")?;
    let options = required(doc.get_element_by_id("options"), "options")?;

    let clicked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicked);
    doc.add_event_listener(options, "click", false, move |event| {
        sink.borrow_mut().push(event.target());
    })?;

    let last = required(query_selector_end(&doc, options, ".option span", 1)?, "last span")?;
    trigger_event(&mut doc, last, "click")?;

    let target = clicked.borrow()[0];
    let option = required(
        parent_match(&doc, target, ".option", Some(dropdown))?,
        "option",
    )?;
    assert_eq!(doc.get_attribute(option, "data-value")?, Some("c".to_string()));
    assert_eq!(node_index(&doc, Some(option), None)?, 2);
    assert_eq!(node_index(&doc, Some(option), Some(".option"))?, 2);

    add_classes(&mut doc, option, &["selected active".into()])?;
    let all = doc.query_selector_all(".option")?;
    remove_classes(&mut doc, all.clone(), &[ClassSpec::from(vec!["active"])])?;
    assert_eq!(doc.query_selector_all(".selected")?, vec![option]);
    assert!(doc.query_selector_all(".active")?.is_empty());
    Ok(())
}

#[test]
fn rendered_option_markup_is_attached_and_styled() -> vanilla_dom::Result<()> {
    let mut doc = Document::from_html(DROPDOWN_HTML)?;
    let options = required(doc.get_element_by_id("options"), "options")?;

    let rendered = required(
        get_dom(&mut doc, "  <div class='option' data-value='d'><span>Delta</span></div> ")?,
        "rendered option",
    )?;
    assert_eq!(doc.parent(rendered), None);
    doc.append_child(options, rendered)?;

    let css = BTreeMap::from([("display", "block"), ("maxHeight", "200px")]);
    apply_css(&mut doc, options, &css)?;
    assert_eq!(
        doc.get_attribute(options, "style")?,
        Some("display: block; max-height: 200px;".to_string())
    );

    let last = required(query_selector_end(&doc, options, ".option", 1)?, "last option")?;
    assert_eq!(last, rendered);
    assert_eq!(doc.text_content(last)?, "Delta");
    assert_eq!(get_dom(&mut doc, Query::Wrapped(vec![last]))?, Some(last));
    Ok(())
}

#[test]
fn wrapper_bound_rejects_targets_outside_the_widget() -> vanilla_dom::Result<()> {
    let mut doc = Document::from_html(DROPDOWN_HTML)?;
    let dropdown = required(doc.get_element_by_id("dropdown"), "dropdown")?;
    let body = required(doc.body(), "body")?;

    let stray = doc.create_element("div")?;
    doc.append_child(body, stray)?;
    add_classes(&mut doc, stray, &["option".into()])?;

    assert_eq!(parent_match(&doc, stray, ".option", Some(dropdown))?, None);
    assert_eq!(parent_match(&doc, stray, ".option", None)?, Some(stray));
    Ok(())
}

#[test]
fn errors_render_readable_messages() {
    let mut doc = Document::new();
    let err = get_dom(&mut doc, "div >").expect_err("dangling combinator");
    assert_eq!(err.to_string(), "unsupported selector: div >");

    let el = doc.create_element("div").expect("valid tag");
    let err = add_classes(&mut doc, el, &[vec!["a b"].into()]).expect_err("bad token");
    assert_eq!(err.to_string(), "invalid class token: \"a b\"");

    let boxed: Box<dyn std::error::Error> = Box::new(err);
    assert!(boxed.source().is_none());
}
