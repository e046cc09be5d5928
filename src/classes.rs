use super::*;

/// One class argument: a whitespace separated string or a list of class names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassSpec {
    Tokens(String),
    List(Vec<String>),
}

impl From<&str> for ClassSpec {
    fn from(value: &str) -> Self {
        Self::Tokens(value.to_string())
    }
}

impl From<String> for ClassSpec {
    fn from(value: String) -> Self {
        Self::Tokens(value)
    }
}

impl From<Vec<String>> for ClassSpec {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ClassSpec {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ClassSpec {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|name| name.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ClassSpec {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(|name| name.to_string()).collect())
    }
}

/// Either a single value or a sequence of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl From<NodeId> for OneOrMany<NodeId> {
    fn from(value: NodeId) -> Self {
        Self::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(value: Vec<T>) -> Self {
        Self::Many(value)
    }
}

impl<T: Clone> From<&[T]> for OneOrMany<T> {
    fn from(value: &[T]) -> Self {
        Self::Many(value.to_vec())
    }
}

impl<T, const N: usize> From<[T; N]> for OneOrMany<T> {
    fn from(value: [T; N]) -> Self {
        Self::Many(value.into())
    }
}

/// Normalizes to a `Vec`. A `Many` input is handed back as the same allocation.
pub fn cast_as_array<T>(value: OneOrMany<T>) -> Vec<T> {
    match value {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    }
}

/// Flattens class arguments into one ordered token list.
///
/// Strings are split on ASCII whitespace (tab, LF, FF, CR and space), lists are
/// concatenated as given, and empty tokens are dropped. Duplicates are kept.
pub fn classes_array(specs: &[ClassSpec]) -> Vec<String> {
    let mut classes = Vec::new();
    for spec in specs {
        match spec {
            ClassSpec::Tokens(tokens) => {
                classes.extend(tokens.split_ascii_whitespace().map(str::to_string));
            }
            ClassSpec::List(names) => {
                classes.extend(names.iter().filter(|name| !name.is_empty()).cloned());
            }
        }
    }
    classes
}

/// Adds every class in `specs` to every element.
pub fn add_classes(
    doc: &mut Document,
    elements: impl Into<OneOrMany<NodeId>>,
    specs: &[ClassSpec],
) -> Result<()> {
    let classes = classes_array(specs);
    for element in cast_as_array(elements.into()) {
        for class_name in &classes {
            doc.class_list_add(element, class_name)?;
        }
    }
    Ok(())
}

/// Removes every class in `specs` from every element. Missing classes are skipped.
pub fn remove_classes(
    doc: &mut Document,
    elements: impl Into<OneOrMany<NodeId>>,
    specs: &[ClassSpec],
) -> Result<()> {
    let classes = classes_array(specs);
    for element in cast_as_array(elements.into()) {
        for class_name in &classes {
            doc.class_list_remove(element, class_name)?;
        }
    }
    Ok(())
}
