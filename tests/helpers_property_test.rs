use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};
use vanilla_dom::{
    ClassSpec, Document, OneOrMany, add_classes, cast_as_array, classes_array, get_tail,
    node_index, remove_classes,
};

const HELPERS_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/helpers_property_test.txt";
const DEFAULT_HELPERS_PROPTEST_CASES: u32 = 128;

fn helpers_proptest_cases() -> u32 {
    std::env::var("VANILLA_DOM_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_HELPERS_PROPTEST_CASES)
}

fn class_name_strategy() -> BoxedStrategy<String> {
    "[a-z][a-z0-9_-]{0,6}".boxed()
}

fn separator_strategy() -> BoxedStrategy<String> {
    vec(
        prop_oneof![Just(' '), Just('\t'), Just('\n'), Just('\r'), Just('\u{c}')],
        1..=3,
    )
    .prop_map(|chars| chars.into_iter().collect())
    .boxed()
}

fn class_spec_strategy() -> BoxedStrategy<ClassSpec> {
    prop_oneof![
        (vec((class_name_strategy(), separator_strategy()), 0..=4), separator_strategy())
            .prop_map(|(parts, lead)| {
                let mut joined = lead;
                for (name, separator) in parts {
                    joined.push_str(&name);
                    joined.push_str(&separator);
                }
                ClassSpec::Tokens(joined)
            }),
        vec(
            prop_oneof![4 => class_name_strategy(), 1 => Just(String::new())],
            0..=4
        )
        .prop_map(ClassSpec::List),
    ]
    .boxed()
}

fn expected_tokens(specs: &[ClassSpec]) -> Vec<String> {
    let mut out = Vec::new();
    for spec in specs {
        match spec {
            ClassSpec::Tokens(raw) => out.extend(
                raw.split([' ', '\t', '\n', '\r', '\u{c}'])
                    .filter(|token| !token.is_empty())
                    .map(str::to_string),
            ),
            ClassSpec::List(names) => out.extend(names.iter().filter(|n| !n.is_empty()).cloned()),
        }
    }
    out
}

fn fail(err: vanilla_dom::Error) -> TestCaseError {
    TestCaseError::fail(format!("{err:?}"))
}

fn assert_add_remove_round_trip(specs: &[ClassSpec], targets: usize) -> TestCaseResult {
    let mut doc = Document::new();
    let mut nodes = Vec::new();
    for _ in 0..targets {
        let node = doc.create_element("div").map_err(fail)?;
        doc.append_child(doc.root(), node).map_err(fail)?;
        nodes.push(node);
    }

    let tokens = classes_array(specs);
    add_classes(&mut doc, nodes.clone(), specs).map_err(fail)?;
    for node in &nodes {
        let list = doc.class_list(*node).map_err(fail)?;
        for token in &tokens {
            prop_assert!(list.contains(token), "{token:?} missing from {list:?}");
        }
        let mut unique = list.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), list.len(), "duplicate classes in {:?}", list);
    }

    remove_classes(&mut doc, nodes.clone(), specs).map_err(fail)?;
    for node in &nodes {
        prop_assert!(doc.class_list(*node).map_err(fail)?.is_empty());
    }
    Ok(())
}

fn assert_node_index_counts_same_tag(tags: &[&'static str]) -> TestCaseResult {
    let mut doc = Document::new();
    let parent = doc.create_element("section").map_err(fail)?;
    let mut nodes = Vec::new();
    for tag in tags {
        let node = doc.create_element(tag).map_err(fail)?;
        doc.append_child(parent, node).map_err(fail)?;
        nodes.push(node);
    }

    for (position, node) in nodes.iter().enumerate() {
        let expected = tags[..position]
            .iter()
            .filter(|tag| **tag == tags[position])
            .count() as isize;
        prop_assert_eq!(node_index(&doc, Some(*node), None).map_err(fail)?, expected);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: helpers_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(HELPERS_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn classes_array_matches_manual_flattening(specs in vec(class_spec_strategy(), 0..=5)) {
        let tokens = classes_array(&specs);
        prop_assert!(tokens.iter().all(|token| !token.is_empty()));
        prop_assert!(tokens.iter().all(|token| !token.contains(char::is_whitespace)));
        prop_assert_eq!(tokens, expected_tokens(&specs));
    }

    #[test]
    fn add_then_remove_leaves_no_classes(
        specs in vec(class_spec_strategy(), 0..=4),
        targets in 0usize..=3,
    ) {
        assert_add_remove_round_trip(&specs, targets)?;
    }

    #[test]
    fn get_tail_follows_direction_sign(items in vec(any::<i32>(), 0..=8), direction in any::<i32>()) {
        let picked = get_tail(&items, direction);
        if direction > 0 {
            prop_assert_eq!(picked, items.last());
        } else {
            prop_assert_eq!(picked, items.first());
        }
    }

    #[test]
    fn cast_as_array_preserves_sequences(items in vec(any::<u8>(), 0..=8), single in any::<u8>()) {
        let expected = items.clone();
        let ptr = items.as_ptr();
        let out = cast_as_array(OneOrMany::Many(items));
        prop_assert_eq!(out.as_ptr(), ptr);
        prop_assert_eq!(out, expected);
        prop_assert_eq!(cast_as_array(OneOrMany::One(single)), vec![single]);
    }

    #[test]
    fn node_index_counts_preceding_same_tag_siblings(
        tags in vec(prop_oneof![Just("div"), Just("p"), Just("span")], 0..=10),
    ) {
        assert_node_index_counts_same_tag(&tags)?;
    }
}
