use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn separators_become_underscores() {
    assert_eq!(host_identifier("model-tag"), "model_tag");
    assert_eq!(host_identifier("charm.url"), "charm_url");
}

#[test]
fn identifiers_are_lower_cased() {
    assert_eq!(host_identifier("Results"), "results");
    assert_eq!(host_identifier("ModelTag"), "modeltag");
}

#[test]
fn keywords_get_trailing_underscore() {
    assert_eq!(host_identifier("type"), "type_");
    assert_eq!(host_identifier("Type"), "type_");
    assert_eq!(host_identifier("self"), "self_");
    assert_eq!(host_identifier("async"), "async_");
}

#[test]
fn builtins_get_trailing_underscore() {
    assert_eq!(host_identifier("str"), "str_");
    assert_eq!(host_identifier("Bool"), "bool_");
    assert_eq!(host_identifier("u64"), "u64_");
}

#[test]
fn leading_digit_and_empty_names_are_prefixed() {
    assert_eq!(host_identifier("2fa"), "_2fa");
    assert_eq!(host_identifier(""), "__");
    assert_eq!(host_identifier("-"), "__");
}

#[test]
fn type_identifiers_keep_case() {
    assert_eq!(type_identifier("ApplicationTag"), "ApplicationTag");
    assert_eq!(type_identifier("Option"), "Option_");
    assert_eq!(type_identifier("Self"), "Self_");
    assert_eq!(type_identifier("Error"), "Error");
}

#[test]
fn tables_translate_both_ways() {
    let names = FieldNames::assign(["Tag", "type", "model-uuid"]);
    assert_eq!(names.to_wire("tag"), Some("Tag"));
    assert_eq!(names.to_wire("type_"), Some("type"));
    assert_eq!(names.to_host("model-uuid"), Some("model_uuid"));
    assert_eq!(names.to_host("missing"), None);
    let pairs: Vec<(&str, &str)> = names.pairs().collect();
    assert_eq!(
        pairs,
        vec![("tag", "Tag"), ("type_", "type"), ("model_uuid", "model-uuid")]
    );
}

#[test]
fn colliding_wire_names_stay_distinct() {
    let names = FieldNames::assign(["Tag", "tag", "TAG"]);
    assert_eq!(names.host(0), "tag");
    assert_eq!(names.host(1), "tag_");
    assert_eq!(names.host(2), "tag__");
    assert_eq!(names.to_wire("tag_"), Some("tag"));
    assert_eq!(names.to_host("TAG"), Some("tag__"));
}

#[test]
fn suffix_collision_with_existing_field() {
    // "type_" on the wire already owns the identifier the keyword rule wants.
    let names = FieldNames::assign(["type_", "type"]);
    assert_eq!(names.host(0), "type_");
    assert_eq!(names.host(1), "type__");
}

proptest! {
    #[test]
    fn host_wire_host_is_lossless(wires in prop::collection::vec("[A-Za-z_.-][A-Za-z0-9_.-]{0,10}", 0..16)) {
        let names = FieldNames::assign(wires.iter().map(String::as_str));
        for index in 0..names.len() {
            let host = names.host(index);
            let wire = names.to_wire(host).unwrap_or_default();
            prop_assert_eq!(wire, names.wire(index));
            if names.wire_index(wire) == Some(index) {
                prop_assert_eq!(names.to_host(wire), Some(host));
            }
        }
    }

    #[test]
    fn host_identifiers_are_never_reserved(wire in "[A-Za-z0-9_-]{0,10}") {
        let ident = host_identifier(&wire);
        prop_assert!(!is_reserved(&ident));
        prop_assert!(!ident.starts_with(|c: char| c.is_ascii_digit()));
    }
}
