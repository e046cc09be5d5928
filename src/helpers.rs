use super::*;

/// Dispatches a generic bubbling, non-cancelable event named `event_type` on `target`.
pub fn trigger_event(doc: &mut Document, target: NodeId, event_type: &str) -> Result<()> {
    let init = EventInit {
        bubbles: true,
        cancelable: false,
    };
    doc.dispatch_event(target, event_type, init)?;
    Ok(())
}

/// Assigns each `(property, value)` pair to the inline style of `element`, in order.
///
/// Invalid names or values are skipped without error; an empty value clears the
/// property.
pub fn apply_css<I, K, V>(doc: &mut Document, element: NodeId, css: I) -> Result<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (name, value) in css {
        doc.set_style_property(element, name.as_ref(), value.as_ref())?;
    }
    Ok(())
}

/// Nearest inclusive ancestor of `target` matching `selector`.
///
/// When `wrapper` is given and does not contain `target`, nothing is searched.
/// The walk ends at the first node that is not an element.
pub fn parent_match(
    doc: &Document,
    target: NodeId,
    selector: &str,
    wrapper: Option<NodeId>,
) -> Result<Option<NodeId>> {
    if wrapper.is_some_and(|wrapper| !doc.contains(wrapper, target)) {
        return Ok(None);
    }
    if !doc.is_element(target) {
        return Ok(None);
    }

    let groups = parse_selector_groups(selector)?;
    let mut cursor = Some(target);
    while let Some(node) = cursor {
        if !doc.is_element(node) {
            break;
        }
        if doc.dom().matches_groups(node, &groups) {
            return Ok(Some(node));
        }
        cursor = doc.parent(node);
    }
    Ok(None)
}

/// First (`direction <= 0`) or last (`direction > 0`) descendant of `root` matching `query`.
pub fn query_selector_end(
    doc: &Document,
    root: NodeId,
    query: &str,
    direction: i32,
) -> Result<Option<NodeId>> {
    let matches = doc.query_selector_all_from(root, query)?;
    Ok(get_tail(&matches, direction).copied())
}

pub fn get_tail<T>(items: &[T], direction: i32) -> Option<&T> {
    if direction > 0 {
        items.last()
    } else {
        items.first()
    }
}

/// `true` when the map has no entries.
///
/// ```
/// use std::collections::HashMap;
///
/// let empty: HashMap<&str, i32> = HashMap::new();
/// assert!(vanilla_dom::is_empty_object(&empty));
/// assert!(!vanilla_dom::is_empty_object(&HashMap::from([("a", 1)])));
/// ```
pub fn is_empty_object<'a, M>(obj: &'a M) -> bool
where
    &'a M: IntoIterator,
{
    obj.into_iter().next().is_none()
}

/// Zero-based index of `element` among its preceding element siblings matching
/// `amongst`, which defaults to the element's own node name. `-1` for `None`.
pub fn node_index(doc: &Document, element: Option<NodeId>, amongst: Option<&str>) -> Result<isize> {
    let Some(element) = element else {
        return Ok(-1);
    };
    doc.dom().ensure_node(element)?;

    let mut cursor = doc.previous_element_sibling(element);
    if cursor.is_none() {
        return Ok(0);
    }

    let selector = match amongst.filter(|selector| !selector.is_empty()) {
        Some(selector) => selector.to_string(),
        None => doc.node_name(element),
    };
    let groups = parse_selector_groups(&selector)?;

    let mut index = 0;
    while let Some(sibling) = cursor {
        if doc.dom().matches_groups(sibling, &groups) {
            index += 1;
        }
        cursor = doc.previous_element_sibling(sibling);
    }
    Ok(index)
}
