//! DOM helper functions written against an injected, in-memory [`Document`].
//!
//! The helpers mirror a handful of small "vanilla" utilities commonly found in
//! widget code: resolving a flexible query into an element ([`get_dom`]),
//! dispatching events ([`trigger_event`]), applying inline styles
//! ([`apply_css`]), bulk class mutation ([`add_classes`], [`remove_classes`]),
//! ancestor lookup ([`parent_match`]), first/last selection
//! ([`query_selector_end`], [`get_tail`]) and sibling indexing ([`node_index`]).
//!
//! ```
//! use vanilla_dom::{Document, Query, add_classes, get_dom};
//!
//! let mut doc = Document::from_html("<div id='a'></div>")?;
//! let el = get_dom(&mut doc, Query::from("#a"))?.expect("element");
//! add_classes(&mut doc, el, &["open active".into()])?;
//! assert_eq!(doc.get_attribute(el, "class")?, Some("open active".to_string()));
//! # Ok::<(), vanilla_dom::Error>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::error::Error as StdError;
use std::fmt;

mod classes;
mod document;
mod dom;
mod events;
mod helpers;
mod html;
mod query;
mod selector;
mod trace;

pub use classes::{ClassSpec, OneOrMany, add_classes, cast_as_array, classes_array, remove_classes};
pub use document::Document;
pub use events::{Event, EventInit, EventPhase, ListenerId};
pub use helpers::{
    apply_css, get_tail, is_empty_object, node_index, parent_match, query_selector_end,
    trigger_event,
};
pub use query::{Query, get_dom};

use dom::{Dom, Element, NodeType};
use events::ListenerStore;
use html::parse_html;
use selector::{SelectorPart, parse_selector_groups};
use trace::TraceLog;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    InvalidClassToken(String),
    InvalidNode(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::InvalidClassToken(token) => write!(f, "invalid class token: {token:?}"),
            Self::InvalidNode(msg) => write!(f, "invalid node: {msg}"),
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl StdError for Error {}

/// Handle to a node owned by a [`Document`].
///
/// Ids are only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[cfg(test)]
mod tests;
