use super::*;

/// Anything [`get_dom`] can turn into a single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// An indexable wrapper around already-resolved elements; its first member wins.
    Wrapped(Vec<NodeId>),
    Element(NodeId),
    /// Markup parsed into a detached container.
    Html(String),
    Selector(String),
}

impl From<&str> for Query {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for Query {
    fn from(value: String) -> Self {
        if value.contains('<') {
            Self::Html(value)
        } else {
            Self::Selector(value)
        }
    }
}

impl From<NodeId> for Query {
    fn from(value: NodeId) -> Self {
        Self::Element(value)
    }
}

impl From<Vec<NodeId>> for Query {
    fn from(value: Vec<NodeId>) -> Self {
        Self::Wrapped(value)
    }
}

impl From<&[NodeId]> for Query {
    fn from(value: &[NodeId]) -> Self {
        Self::Wrapped(value.to_vec())
    }
}

/// Resolves `query` into one element, or `None` when nothing matches.
///
/// Markup is trimmed and parsed inside a detached `div`; the first element child
/// is detached from it and returned, so leading whitespace never yields a text
/// node. Selectors are evaluated against the whole document.
pub fn get_dom(doc: &mut Document, query: impl Into<Query>) -> Result<Option<NodeId>> {
    match query.into() {
        Query::Wrapped(members) => Ok(members.first().copied()),
        Query::Element(node) => Ok(doc.is_element(node).then_some(node)),
        Query::Html(markup) => {
            let dom = doc.dom_mut();
            let container = dom.create_detached_element("div".to_string());
            dom.set_inner_html(container, markup.trim())?;
            let first = dom
                .children(container)
                .iter()
                .copied()
                .find(|child| dom.element(*child).is_some());
            if let Some(element) = first {
                dom.detach(element)?;
            }
            Ok(first)
        }
        Query::Selector(selector) => doc.query_selector(&selector),
    }
}
