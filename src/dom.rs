use super::*;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Runs a recursive tree walk on a freshly grown stack when the current one runs low.
pub(crate) fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, f)
}

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    // Insertion ordered, names lowercased.
    pub(crate) attrs: Vec<(String, String)>,
}

impl Element {
    pub(crate) fn new(tag_name: String, attrs: Vec<(String, String)>) -> Self {
        Self { tag_name, attrs }
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| key == name)
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: String) {
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_string(), value));
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(pos).1)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, Vec<NodeId>>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub(crate) fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        let id = self.create_node(Some(parent), NodeType::Element(Element::new(tag_name, attrs)));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attr("id"))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
        {
            if self.is_connected(id) {
                self.id_index.entry(id_attr).or_default().push(id);
            }
        }
        id
    }

    pub(crate) fn create_detached_element(&mut self, tag_name: String) -> NodeId {
        self.create_node(
            None,
            NodeType::Element(Element::new(tag_name.to_ascii_lowercase(), Vec::new())),
        )
    }

    pub(crate) fn create_detached_text(&mut self, text: String) -> NodeId {
        self.create_node(None, NodeType::Text(text))
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn is_valid_node(&self, node_id: NodeId) -> bool {
        node_id.0 < self.nodes.len()
    }

    pub(crate) fn ensure_node(&self, node_id: NodeId) -> Result<()> {
        if self.is_valid_node(node_id) {
            Ok(())
        } else {
            Err(Error::InvalidNode(format!(
                "node {} does not belong to this document",
                node_id.0
            )))
        }
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn require_element(&self, node_id: NodeId, operation: &str) -> Result<&Element> {
        self.ensure_node(node_id)?;
        self.element(node_id)
            .ok_or_else(|| Error::InvalidNode(format!("{operation} target is not an element")))
    }

    pub(crate) fn require_element_mut(
        &mut self,
        node_id: NodeId,
        operation: &str,
    ) -> Result<&mut Element> {
        self.ensure_node(node_id)?;
        self.element_mut(node_id)
            .ok_or_else(|| Error::InvalidNode(format!("{operation} target is not an element")))
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn node_name(&self, node_id: NodeId) -> String {
        match self.nodes.get(node_id.0).map(|node| &node.node_type) {
            Some(NodeType::Element(element)) => element.tag_name.to_ascii_uppercase(),
            Some(NodeType::Text(_)) => "#text".to_string(),
            Some(NodeType::Document) => "#document".to_string(),
            None => String::new(),
        }
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Inclusive containment, as `Node.contains`.
    pub(crate) fn contains(&self, ancestor: NodeId, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        self.contains(self.root, node_id)
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).and_then(|nodes| nodes.first().copied())
    }

    /// Every connected element carrying `id`, in document order.
    pub(crate) fn by_id_all(&self, id: &str) -> Vec<NodeId> {
        self.id_index.get(id).cloned().unwrap_or_default()
    }

    pub(crate) fn rebuild_id_index(&mut self) {
        let mut next: HashMap<String, Vec<NodeId>> = HashMap::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let NodeType::Element(element) = &self.nodes[node.0].node_type {
                if let Some(id) = element.attr("id").filter(|id| !id.is_empty()) {
                    next.entry(id.to_string()).or_default().push(node);
                }
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        self.id_index = next;
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        with_stack(|| match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        })
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        self.require_element(node_id, "textContent")?;
        self.detach_children(node_id);
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        self.rebuild_id_index();
        Ok(())
    }

    pub(crate) fn inner_html(&self, node_id: NodeId) -> Result<String> {
        self.require_element(node_id, "innerHTML")?;
        let mut out = String::new();
        for child in &self.nodes[node_id.0].children {
            out.push_str(&self.dump_node(*child));
        }
        Ok(out)
    }

    pub(crate) fn set_inner_html(&mut self, node_id: NodeId, html: &str) -> Result<()> {
        self.require_element(node_id, "innerHTML")?;
        let fragment = parse_html(html)?;

        self.detach_children(node_id);
        let children = fragment.nodes[fragment.root.0].children.clone();
        for child in children {
            self.clone_subtree_from_dom(&fragment, child, Some(node_id))?;
        }

        self.rebuild_id_index();
        Ok(())
    }

    fn detach_children(&mut self, node_id: NodeId) {
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
    }

    fn clone_subtree_from_dom(
        &mut self,
        source: &Dom,
        source_node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        with_stack(|| {
            let node_type = match &source.nodes[source_node.0].node_type {
                NodeType::Document => {
                    return Err(Error::InvalidNode(
                        "cannot clone a document node into an element".into(),
                    ));
                }
                other => other.clone(),
            };

            let node = self.create_node(parent, node_type);
            for child in &source.nodes[source_node.0].children {
                self.clone_subtree_from_dom(source, *child, Some(node))?;
            }
            Ok(node)
        })
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attr(&name.to_ascii_lowercase()).map(str::to_string))
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        if lowered.is_empty() || !lowered.bytes().all(crate::html::is_attr_name_char) {
            return Err(Error::InvalidNode(format!("invalid attribute name: {name}")));
        }
        self.require_element_mut(node_id, "setAttribute")?
            .set_attr(&lowered, value.to_string());
        if lowered == "id" && self.is_connected(node_id) {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        self.require_element_mut(node_id, "removeAttribute")?
            .remove_attr(&lowered);
        if lowered == "id" && self.is_connected(node_id) {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_node(parent)?;
        self.ensure_node(child)?;
        if matches!(self.nodes[parent.0].node_type, NodeType::Text(_)) {
            return Err(Error::InvalidNode(
                "appendChild target cannot have children".into(),
            ));
        }
        if child == self.root {
            return Err(Error::InvalidNode("cannot append the document node".into()));
        }

        // Parent must not be inside child's subtree.
        if self.contains(child, parent) {
            return Err(Error::InvalidNode("appendChild would create a cycle".into()));
        }

        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.rebuild_id_index();
        Ok(())
    }

    pub(crate) fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.ensure_node(parent)?;
        self.ensure_node(child)?;
        if self.parent(child) != Some(parent) {
            return Err(Error::InvalidNode(
                "removeChild target is not a direct child".into(),
            ));
        }
        self.nodes[parent.0].children.retain(|id| *id != child);
        self.nodes[child.0].parent = None;
        self.rebuild_id_index();
        Ok(())
    }

    pub(crate) fn detach(&mut self, node: NodeId) -> Result<()> {
        match self.parent(node) {
            Some(parent) => self.remove_child(parent, node),
            None => Ok(()),
        }
    }

    pub(crate) fn style_get(&self, node_id: NodeId, key: &str) -> Result<String> {
        let element = self.require_element(node_id, "style")?;
        let name = js_prop_to_css_name(key);
        let decls = parse_style_declarations(element.attr("style"));
        Ok(decls
            .iter()
            .find(|(prop, _)| prop == &name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default())
    }

    /// Returns `false` when the declaration was rejected and nothing changed.
    pub(crate) fn style_set(&mut self, node_id: NodeId, key: &str, value: &str) -> Result<bool> {
        let name = js_prop_to_css_name(key);
        let element = self.require_element_mut(node_id, "style")?;
        if !is_valid_style_property(&name) || !is_valid_style_value(value) {
            return Ok(false);
        }

        let value = value.trim();
        let mut decls = parse_style_declarations(element.attr("style"));
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == &name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name, value.to_string()));
        }

        if decls.is_empty() {
            element.remove_attr("style");
        } else {
            element.set_attr("style", serialize_style_declarations(&decls));
        }

        Ok(true)
    }

    pub(crate) fn class_list(&self, node_id: NodeId) -> Result<Vec<String>> {
        let element = self.require_element(node_id, "classList")?;
        Ok(class_tokens(element.attr("class")))
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> Result<bool> {
        let element = self.require_element(node_id, "classList")?;
        Ok(has_class(element, class_name))
    }

    /// Returns whether the class list changed.
    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        validate_class_token(class_name)?;
        let element = self.require_element_mut(node_id, "classList")?;
        let mut classes = class_tokens(element.attr("class"));
        if classes.iter().any(|name| name == class_name) {
            return Ok(false);
        }
        classes.push(class_name.to_string());
        set_class_attr(element, &classes);
        Ok(true)
    }

    /// Returns whether the class list changed.
    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        validate_class_token(class_name)?;
        let element = self.require_element_mut(node_id, "classList")?;
        let mut classes = class_tokens(element.attr("class"));
        let before = classes.len();
        classes.retain(|name| name != class_name);
        if classes.len() == before {
            return Ok(false);
        }
        set_class_attr(element, &classes);
        Ok(true)
    }

    pub(crate) fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        if self.class_contains(node_id, class_name)? {
            self.class_remove(node_id, class_name)?;
            Ok(false)
        } else {
            self.class_add(node_id, class_name)?;
            Ok(true)
        }
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.by_id_all(id));
            }
        }

        let mut ids = Vec::new();
        self.collect_elements_dfs(self.root, &mut ids);
        Ok(self.filter_matches(ids, &groups))
    }

    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        self.ensure_node(root)?;
        let groups = parse_selector_groups(selector)?;

        let mut ids = Vec::new();
        self.collect_elements_descendants_dfs(root, &mut ids);
        Ok(self.filter_matches(ids, &groups))
    }

    fn filter_matches(&self, candidates: Vec<NodeId>, groups: &[Vec<SelectorPart>]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for candidate in candidates {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(candidate, steps))
                && seen.insert(candidate)
            {
                matched.push(candidate);
            }
        }
        matched
    }

    pub(crate) fn matches_selector(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        let groups = parse_selector_groups(selector)?;
        Ok(self.matches_groups(node_id, &groups))
    }

    pub(crate) fn matches_groups(&self, node_id: NodeId, groups: &[Vec<SelectorPart>]) -> bool {
        self.element(node_id).is_some()
            && groups
                .iter()
                .any(|steps| self.matches_selector_chain(node_id, steps))
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if self.element(node_id).is_none() {
            return Ok(None);
        }

        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if self.matches_groups(current, &groups) {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        with_stack(|| {
            if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
                out.push(node_id);
            }
            for child in &self.nodes[node_id.0].children {
                self.collect_elements_dfs(*child, out);
            }
        })
    }

    pub(crate) fn collect_elements_descendants_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = &self.nodes[parent.0].children;
        let pos = children.iter().position(|id| *id == node_id)?;
        children
            .iter()
            .skip(pos + 1)
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = &self.nodes[parent.0].children;
        let pos = children.iter().position(|id| *id == node_id)?;
        children[..pos]
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        with_stack(|| match &self.nodes[node_id.0].node_type {
            NodeType::Document => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out
            }
            NodeType::Text(text) => escape_text(text),
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                for (k, v) in &element.attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(v));
                    out.push('"');
                }
                out.push('>');
                if crate::html::is_void_tag(&element.tag_name) {
                    return out;
                }
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        })
    }

    /// Short `tag#id.class` label used in trace lines.
    pub(crate) fn node_label(&self, node_id: NodeId) -> String {
        match self.nodes.get(node_id.0).map(|node| &node.node_type) {
            Some(NodeType::Document) => "#document".to_string(),
            Some(NodeType::Text(_)) => "#text".to_string(),
            Some(NodeType::Element(element)) => {
                let mut label = element.tag_name.clone();
                if let Some(id) = element.attr("id").filter(|id| !id.is_empty()) {
                    label.push('#');
                    label.push_str(id);
                } else if let Some(first) = class_tokens(element.attr("class")).first() {
                    label.push('.');
                    label.push_str(first);
                }
                label
            }
            None => format!("<invalid:{}>", node_id.0),
        }
    }
}

pub(crate) fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attr("class")
        .map(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

pub(crate) fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in class_attr.unwrap_or_default().split_ascii_whitespace() {
        if !out.iter().any(|existing| existing == token) {
            out.push(token.to_string());
        }
    }
    out
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    element.set_attr("class", classes.join(" "));
}

fn validate_class_token(class_name: &str) -> Result<()> {
    if class_name.is_empty() || class_name.bytes().any(|b| b.is_ascii_whitespace()) {
        return Err(Error::InvalidClassToken(class_name.to_string()));
    }
    Ok(())
}

pub(crate) fn js_prop_to_css_name(prop: &str) -> String {
    let prop = prop.trim();
    if prop.starts_with("--") {
        return prop.to_string();
    }
    let mut out = String::new();
    for ch in prop.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn is_valid_style_property(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

fn is_valid_style_value(value: &str) -> bool {
    !value.contains([';', '{', '}'])
}

pub(crate) fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    for decl in style_attr.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
            out[pos].1 = value;
        } else {
            out.push((name, value));
        }
    }

    out
}

fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
    out
}
