//! Class name sanitization tests

use xmi_schema::validation::input::{
    MAX_SANITIZED_NAME_LENGTH, UNNAMED, is_sanitized_name, sanitize_class_name,
};

#[test]
fn test_literal_cases() {
    assert_eq!(sanitize_class_name("Deelplan/Veld"), "deelplan_veld");
    assert_eq!(sanitize_class_name("Fase/Oplevering"), "fase_oplevering");
    assert_eq!(
        sanitize_class_name("Gezinsmigrant en Overige migrant"),
        "gezinsmigrant_en_overige_migrant"
    );
    assert_eq!(sanitize_class_name(""), "unnamed");
}

#[test]
fn test_separators_collapse() {
    assert_eq!(sanitize_class_name("A\\B"), "a_b");
    assert_eq!(sanitize_class_name("  Leading and trailing  "), "leading_and_trailing");
    assert_eq!(sanitize_class_name("a -- b __ c"), "a_b_c");
    assert_eq!(sanitize_class_name("__init__"), "init");
    assert_eq!(sanitize_class_name("Tab\tNew\nLine"), "tab_new_line");
}

#[test]
fn test_non_ascii_becomes_separator() {
    assert_eq!(sanitize_class_name("Coördinatie"), "co_rdinatie");
    assert_eq!(sanitize_class_name("€uro"), "uro");
    assert_eq!(sanitize_class_name("ßß"), UNNAMED);
}

#[test]
fn test_output_shape_and_idempotence() {
    let inputs = [
        "Person",
        "A/B",
        "A B",
        "Deelplan/Veld",
        "  ",
        "////",
        "x_",
        "Ünïcödé Nämé",
        "Object (legacy) #2",
        "tab\there",
        "already_sanitized_name",
        "MiXeD123Case456",
    ];
    for input in inputs {
        let once = sanitize_class_name(input);
        assert!(
            once == UNNAMED || is_sanitized_name(&once),
            "{:?} sanitized to {:?}",
            input,
            once
        );
        assert!(once.len() <= MAX_SANITIZED_NAME_LENGTH);
        assert_eq!(sanitize_class_name(&once), once, "not idempotent for {:?}", input);
    }
}

#[test]
fn test_truncation_never_ends_with_separator() {
    // 99 characters then a separator right at the cut
    let name = format!("{} tail", "a".repeat(99));
    let sanitized = sanitize_class_name(&name);
    assert_eq!(sanitized, "a".repeat(99));
    assert_eq!(sanitize_class_name(&sanitized), sanitized);

    let long = "Verblijfsobject ".repeat(20);
    let sanitized = sanitize_class_name(&long);
    assert!(sanitized.len() <= MAX_SANITIZED_NAME_LENGTH);
    assert!(!sanitized.ends_with('_'));
    assert!(is_sanitized_name(&sanitized));
}
