use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
    DashMatch { key: String, value: String },
}

#[derive(Debug, Clone, Copy)]
enum SelectorAttrOp {
    Eq,
    StartsWith,
    EndsWith,
    Contains,
    Includes,
    DashMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    Empty,
    Root,
    NthChild(NthChildSelector),
    NthLastChild(NthChildSelector),
    NthOfType(NthChildSelector),
    NthLastOfType(NthChildSelector),
    Not(Vec<Vec<SelectorPart>>),
    Is(Vec<Vec<SelectorPart>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NthChildSelector {
    Exact(usize),
    Odd,
    Even,
    AnPlusB(i64, i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }

    fn is_blank(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && !self.universal
            && self.pseudo_classes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

const SIMPLE_PSEUDO_CLASSES: [&str; 8] = [
    "first-child",
    "last-child",
    "only-child",
    "first-of-type",
    "last-of-type",
    "only-of-type",
    "empty",
    "root",
];

fn simple_pseudo_class(name: &str) -> Option<SelectorPseudoClass> {
    Some(match name {
        "first-child" => SelectorPseudoClass::FirstChild,
        "last-child" => SelectorPseudoClass::LastChild,
        "only-child" => SelectorPseudoClass::OnlyChild,
        "first-of-type" => SelectorPseudoClass::FirstOfType,
        "last-of-type" => SelectorPseudoClass::LastOfType,
        "only-of-type" => SelectorPseudoClass::OnlyOfType,
        "empty" => SelectorPseudoClass::Empty,
        "root" => SelectorPseudoClass::Root,
        _ => return None,
    })
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let groups = split_selector_groups(selector)?;
    let mut parsed = Vec::with_capacity(groups.len());
    for group in groups {
        parsed.push(parse_selector_chain(&group)?);
    }
    Ok(parsed)
}

pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let tokens = tokenize_selector(selector)?;
    let mut steps = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokens {
        let combinator = match token.as_str() {
            ">" => Some(SelectorCombinator::Child),
            "+" => Some(SelectorCombinator::AdjacentSibling),
            "~" => Some(SelectorCombinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending_combinator.is_some() || steps.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(combinator);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if steps.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        steps.push(SelectorPart { step, combinator });
    }

    if steps.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(steps)
}

/// Splits on top-level commas, ignoring those inside brackets, parentheses or quotes.
pub(crate) fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut depth = NestingDepth::default();

    for ch in selector.chars() {
        if !depth.track(ch) {
            return Err(Error::UnsupportedSelector(selector.into()));
        }
        if ch == ',' && depth.is_top_level() {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            groups.push(trimmed.to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    let trimmed = current.trim();
    if !depth.is_balanced() || trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = NestingDepth::default();

    for ch in selector.chars() {
        if !depth.track(ch) {
            return Err(Error::UnsupportedSelector(selector.into()));
        }
        match ch {
            '>' | '+' | '~' if depth.is_top_level() => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
                tokens.push(ch.to_string());
            }
            ch if ch.is_ascii_whitespace() && depth.is_top_level() => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !depth.is_balanced() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }

    Ok(tokens)
}

#[derive(Debug, Default)]
struct NestingDepth {
    brackets: usize,
    parens: usize,
    quote: Option<char>,
}

impl NestingDepth {
    /// Returns `false` on an unbalanced closing bracket or parenthesis.
    fn track(&mut self, ch: char) -> bool {
        if let Some(quote) = self.quote {
            if ch == quote {
                self.quote = None;
            }
            return true;
        }
        match ch {
            '\'' | '"' if self.brackets > 0 || self.parens > 0 => self.quote = Some(ch),
            '[' => self.brackets += 1,
            ']' => match self.brackets.checked_sub(1) {
                Some(depth) => self.brackets = depth,
                None => return false,
            },
            '(' => self.parens += 1,
            ')' => match self.parens.checked_sub(1) {
                Some(depth) => self.parens = depth,
                None => return false,
            },
            _ => {}
        }
        true
    }

    fn is_top_level(&self) -> bool {
        self.brackets == 0 && self.parens == 0 && self.quote.is_none()
    }

    fn is_balanced(&self) -> bool {
        self.is_top_level()
    }
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    if part.is_empty() {
        return Err(Error::UnsupportedSelector(part.into()));
    }

    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || step.tag.is_some() || i != 0 {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let Some((id, next)) = parse_selector_ident(part, i + 1) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                i = next;
            }
            b'.' => {
                let Some((class_name, next)) = parse_selector_ident(part, i + 1) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let Some((pseudo, next)) = parse_selector_pseudo(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if i != 0 {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                let Some((tag, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if step.is_blank() {
        return Err(Error::UnsupportedSelector(part.into()));
    }
    Ok(step)
}

fn parse_selector_pseudo(part: &str, start: usize) -> Option<(SelectorPseudoClass, usize)> {
    if part.as_bytes().get(start)? != &b':' {
        return None;
    }
    let start = start + 1;
    let tail = part.get(start..)?;

    for name in SIMPLE_PSEUDO_CLASSES {
        if let Some(rest) = tail.strip_prefix(name) {
            if rest.is_empty() || is_selector_continuation(rest.as_bytes().first()?) {
                return Some((simple_pseudo_class(name)?, start + name.len()));
            }
        }
    }

    if let Some((inners, next)) = parse_pseudo_selector_list(part, start, "not(") {
        return Some((SelectorPseudoClass::Not(inners), next));
    }
    if let Some((inners, next)) = parse_pseudo_selector_list(part, start, "is(") {
        return Some((SelectorPseudoClass::Is(inners), next));
    }

    let nth_variants: [(&str, fn(NthChildSelector) -> SelectorPseudoClass); 4] = [
        ("nth-last-of-type(", SelectorPseudoClass::NthLastOfType),
        ("nth-of-type(", SelectorPseudoClass::NthOfType),
        ("nth-last-child(", SelectorPseudoClass::NthLastChild),
        ("nth-child(", SelectorPseudoClass::NthChild),
    ];
    for (prefix, build) in nth_variants {
        let Some(body) = tail.strip_prefix(prefix) else {
            continue;
        };
        let close_pos = find_matching_paren(body)?;
        let selector = parse_nth_child_selector(body[..close_pos].trim())?;
        let next = start + prefix.len() + close_pos + 1;
        if let Some(ch) = part.as_bytes().get(next) {
            if !is_selector_continuation(ch) {
                return None;
            }
        }
        return Some((build(selector), next));
    }

    None
}

fn parse_pseudo_selector_list(
    part: &str,
    start: usize,
    prefix: &str,
) -> Option<(Vec<Vec<SelectorPart>>, usize)> {
    let rest = part.get(start..)?.strip_prefix(prefix)?;
    let close_pos = find_matching_paren(rest)?;
    let body = rest[..close_pos].trim();
    if body.is_empty() {
        return None;
    }

    let groups = split_selector_groups(body).ok()?;
    let mut selectors = Vec::with_capacity(groups.len());
    for group in &groups {
        selectors.push(parse_selector_chain(group).ok()?);
    }

    let next = start + prefix.len() + close_pos + 1;
    if let Some(ch) = part.as_bytes().get(next) {
        if !is_selector_continuation(ch) {
            return None;
        }
    }
    Some((selectors, next))
}

fn find_matching_paren(body: &str) -> Option<usize> {
    let mut paren_depth = 1usize;
    let mut bracket_depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (idx, b) in body.bytes().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'\'' | b'"' => quote = Some(b),
            b'[' => bracket_depth += 1,
            b']' => bracket_depth = bracket_depth.checked_sub(1)?,
            b'(' if bracket_depth == 0 => paren_depth += 1,
            b')' if bracket_depth == 0 => {
                paren_depth = paren_depth.checked_sub(1)?;
                if paren_depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_nth_child_selector(raw: &str) -> Option<NthChildSelector> {
    let compact = raw
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.as_str() {
        "" => None,
        "odd" => Some(NthChildSelector::Odd),
        "even" => Some(NthChildSelector::Even),
        other if other.contains('n') => parse_nth_child_expression(other),
        other if other.starts_with(['+', '-']) => None,
        other => match other.parse::<usize>().ok()? {
            0 => None,
            value => Some(NthChildSelector::Exact(value)),
        },
    }
}

fn parse_nth_child_expression(expr: &str) -> Option<NthChildSelector> {
    if expr.matches('n').count() != 1 {
        return None;
    }

    let n_pos = expr.find('n')?;
    let (a_part, rest) = expr.split_at(n_pos);
    let b_part = &rest[1..];

    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        _ => a_part.parse::<i64>().ok()?,
    };

    if b_part.is_empty() {
        return Some(NthChildSelector::AnPlusB(a, 0));
    }

    let (sign, raw_b) = if let Some(rest) = b_part.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = b_part.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    if raw_b.is_empty() || raw_b.starts_with(['+', '-']) {
        return None;
    }
    let b = raw_b.parse::<i64>().ok()?;
    Some(NthChildSelector::AnPlusB(a, b * sign))
}

fn is_selector_continuation(next: &u8) -> bool {
    matches!(next, b'.' | b'#' | b'[' | b':')
}

fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_selector_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b >= 0x80
}

fn is_selector_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':'
}

fn skip_selector_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let unsupported = || Error::UnsupportedSelector(src.into());
    let bytes = src.as_bytes();
    let mut i = open_bracket + 1;

    skip_selector_ws(bytes, &mut i);
    let key_start = i;
    while i < bytes.len() && is_selector_attr_name_char(bytes[i]) {
        i += 1;
    }
    if key_start == i {
        return Err(unsupported());
    }
    let key = src.get(key_start..i).ok_or_else(unsupported)?.to_ascii_lowercase();

    skip_selector_ws(bytes, &mut i);
    if bytes.get(i) == Some(&b']') {
        return Ok((SelectorAttrCondition::Exists { key }, i + 1));
    }

    let (op, next) = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'='), _) => (SelectorAttrOp::Eq, i + 1),
        (Some(b'^'), Some(b'=')) => (SelectorAttrOp::StartsWith, i + 2),
        (Some(b'$'), Some(b'=')) => (SelectorAttrOp::EndsWith, i + 2),
        (Some(b'*'), Some(b'=')) => (SelectorAttrOp::Contains, i + 2),
        (Some(b'~'), Some(b'=')) => (SelectorAttrOp::Includes, i + 2),
        (Some(b'|'), Some(b'=')) => (SelectorAttrOp::DashMatch, i + 2),
        _ => return Err(unsupported()),
    };

    i = next;
    skip_selector_ws(bytes, &mut i);
    let (value, after_value) = parse_selector_attr_value(src, i)?;
    i = after_value;
    skip_selector_ws(bytes, &mut i);
    if bytes.get(i) != Some(&b']') {
        return Err(unsupported());
    }

    let cond = match op {
        SelectorAttrOp::Eq => SelectorAttrCondition::Eq { key, value },
        SelectorAttrOp::StartsWith => SelectorAttrCondition::StartsWith { key, value },
        SelectorAttrOp::EndsWith => SelectorAttrCondition::EndsWith { key, value },
        SelectorAttrOp::Contains => SelectorAttrCondition::Contains { key, value },
        SelectorAttrOp::Includes => SelectorAttrCondition::Includes { key, value },
        SelectorAttrOp::DashMatch => SelectorAttrCondition::DashMatch { key, value },
    };

    Ok((cond, i + 1))
}

fn parse_selector_attr_value(src: &str, start: usize) -> Result<(String, usize)> {
    let bytes = src.as_bytes();
    let Some(&first) = bytes.get(start) else {
        return Err(Error::UnsupportedSelector(src.into()));
    };

    if first == b'"' || first == b'\'' {
        let mut i = start + 1;
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                i = (i + 2).min(bytes.len());
                continue;
            }
            if bytes[i] == first {
                let raw = src
                    .get(start + 1..i)
                    .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
                return Ok((unescape_selector_value(raw), i + 1));
            }
            i += 1;
        }
        return Err(Error::UnsupportedSelector(src.into()));
    }

    let mut i = start;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b']' {
        i += 1;
    }
    let raw = src
        .get(start..i)
        .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
    if raw.is_empty() {
        return Err(Error::UnsupportedSelector(src.into()));
    }
    Ok((raw.to_string(), i))
}

fn unescape_selector_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }
        out.push(ch);
    }
    out
}

impl Dom {
    pub(crate) fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some((last, rest)) = steps.split_last() else {
            return false;
        };
        self.matches_step(node_id, &last.step)
            && self.matches_chain_context(node_id, last.combinator, rest)
    }

    /// `node_id` already matched the step following `steps`. Every candidate the
    /// combinator allows is tried until the remaining steps match from one of them.
    fn matches_chain_context(
        &self,
        node_id: NodeId,
        combinator: Option<SelectorCombinator>,
        steps: &[SelectorPart],
    ) -> bool {
        let Some((part, rest)) = steps.split_last() else {
            return true;
        };
        let matches_from = |candidate: NodeId| {
            self.matches_step(candidate, &part.step)
                && self.matches_chain_context(candidate, part.combinator, rest)
        };

        match combinator.unwrap_or(SelectorCombinator::Descendant) {
            SelectorCombinator::Child => self.parent(node_id).is_some_and(matches_from),
            SelectorCombinator::Descendant => {
                let mut cursor = self.parent(node_id);
                while let Some(parent) = cursor {
                    if matches_from(parent) {
                        return true;
                    }
                    cursor = self.parent(parent);
                }
                false
            }
            SelectorCombinator::AdjacentSibling => self
                .previous_element_sibling(node_id)
                .is_some_and(matches_from),
            SelectorCombinator::GeneralSibling => {
                let mut cursor = self.previous_element_sibling(node_id);
                while let Some(sibling) = cursor {
                    if matches_from(sibling) {
                        return true;
                    }
                    cursor = self.previous_element_sibling(sibling);
                }
                false
            }
        }
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attr("id") != Some(id.as_str()) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !dom::has_class(element, class_name))
        {
            return false;
        }

        if !step.attrs.iter().all(|cond| attr_condition_matches(element, cond)) {
            return false;
        }

        step.pseudo_classes
            .iter()
            .all(|pseudo| self.matches_pseudo(node_id, pseudo))
    }

    fn matches_pseudo(&self, node_id: NodeId, pseudo: &SelectorPseudoClass) -> bool {
        match pseudo {
            SelectorPseudoClass::FirstChild => self.previous_element_sibling(node_id).is_none(),
            SelectorPseudoClass::LastChild => self.next_element_sibling(node_id).is_none(),
            SelectorPseudoClass::OnlyChild => {
                self.previous_element_sibling(node_id).is_none()
                    && self.next_element_sibling(node_id).is_none()
            }
            SelectorPseudoClass::FirstOfType => self
                .type_position(node_id)
                .is_some_and(|(index, _)| index == 1),
            SelectorPseudoClass::LastOfType => self
                .type_position(node_id)
                .is_some_and(|(index, total)| index == total),
            SelectorPseudoClass::OnlyOfType => self
                .type_position(node_id)
                .is_some_and(|(_, total)| total == 1),
            SelectorPseudoClass::Empty => self.children(node_id).iter().all(|child| {
                matches!(&self.nodes[child.0].node_type, NodeType::Text(text) if text.is_empty())
            }),
            SelectorPseudoClass::Root => self.parent(node_id) == Some(self.root),
            SelectorPseudoClass::NthChild(selector) => self
                .child_position(node_id)
                .is_some_and(|(index, _)| selector.matches_index(index)),
            SelectorPseudoClass::NthLastChild(selector) => self
                .child_position(node_id)
                .is_some_and(|(index, total)| selector.matches_index(total + 1 - index)),
            SelectorPseudoClass::NthOfType(selector) => self
                .type_position(node_id)
                .is_some_and(|(index, _)| selector.matches_index(index)),
            SelectorPseudoClass::NthLastOfType(selector) => self
                .type_position(node_id)
                .is_some_and(|(index, total)| selector.matches_index(total + 1 - index)),
            SelectorPseudoClass::Not(inners) => !inners
                .iter()
                .any(|inner| self.matches_selector_chain(node_id, inner)),
            SelectorPseudoClass::Is(inners) => inners
                .iter()
                .any(|inner| self.matches_selector_chain(node_id, inner)),
        }
    }

    /// 1-based position among element siblings, with the sibling count.
    fn child_position(&self, node_id: NodeId) -> Option<(usize, usize)> {
        self.sibling_position(node_id, |_| true)
    }

    /// 1-based position among siblings sharing the tag name, with their count.
    fn type_position(&self, node_id: NodeId) -> Option<(usize, usize)> {
        let tag_name = self.tag_name(node_id)?;
        self.sibling_position(node_id, |element| element.tag_name == tag_name)
    }

    fn sibling_position(
        &self,
        node_id: NodeId,
        include: impl Fn(&Element) -> bool,
    ) -> Option<(usize, usize)> {
        let parent = self.parent(node_id)?;
        let mut total = 0usize;
        let mut target = None;
        for child in self.children(parent) {
            let Some(element) = self.element(*child) else {
                continue;
            };
            if !include(element) {
                continue;
            }
            total += 1;
            if *child == node_id {
                target = Some(total);
            }
        }
        target.map(|index| (index, total))
    }
}

impl NthChildSelector {
    fn matches_index(&self, index: usize) -> bool {
        match self {
            NthChildSelector::Exact(expected) => index == *expected,
            NthChildSelector::Odd => index % 2 == 1,
            NthChildSelector::Even => index % 2 == 0,
            NthChildSelector::AnPlusB(a, b) => {
                let (a, diff) = (i128::from(*a), index as i128 - i128::from(*b));
                if a == 0 {
                    return diff == 0;
                }
                diff % a == 0 && diff / a >= 0
            }
        }
    }
}

fn attr_condition_matches(element: &Element, cond: &SelectorAttrCondition) -> bool {
    match cond {
        SelectorAttrCondition::Exists { key } => element.has_attr(key),
        SelectorAttrCondition::Eq { key, value } => element.attr(key) == Some(value.as_str()),
        SelectorAttrCondition::StartsWith { key, value } => element
            .attr(key)
            .is_some_and(|attr| !value.is_empty() && attr.starts_with(value.as_str())),
        SelectorAttrCondition::EndsWith { key, value } => element
            .attr(key)
            .is_some_and(|attr| !value.is_empty() && attr.ends_with(value.as_str())),
        SelectorAttrCondition::Contains { key, value } => element
            .attr(key)
            .is_some_and(|attr| !value.is_empty() && attr.contains(value.as_str())),
        SelectorAttrCondition::Includes { key, value } => element.attr(key).is_some_and(|attr| {
            attr.split_ascii_whitespace()
                .any(|token| token == value.as_str())
        }),
        SelectorAttrCondition::DashMatch { key, value } => element.attr(key).is_some_and(|attr| {
            attr == value.as_str()
                || attr
                    .strip_prefix(value.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
        }),
    }
}
