use serde_json::json;
use parfum_review::enums::edit_field::{EditField, EditKind};
use parfum_review::services::diff_engine::DiffEngine;
use parfum_review::structs::field_path::FieldPath;
use crate::common::set;

#[test]
fn nested_sets_become_groups_with_full_paths() {
    let changes = set(json!({"name": "Aqua", "notes": {"top_notes": ["citrus", "sea"]}}));
    let fields = DiffEngine::render_edit_fields(&changes, &FieldPath::root());

    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].label(), "name");
    let EditField::Group { label, children, path } = &fields[1] else {
        panic!("expected group for notes");
    };
    assert_eq!(label, "notes");
    assert_eq!(path, &FieldPath::new(["notes"]));
    let EditField::Text { path, kind, value, .. } = &children[0] else {
        panic!("expected text field for top_notes");
    };
    assert_eq!(path, &FieldPath::new(["notes", "top_notes"]));
    assert_eq!(*kind, EditKind::Sequence);
    assert_eq!(value, "citrus, sea");
}

#[test]
fn null_scalar_renders_as_empty_value() {
    let fields = DiffEngine::render_edit_fields(&set(json!({"year": null})), &FieldPath::root());
    let EditField::Text { value, kind, .. } = &fields[0] else {
        panic!("expected text field");
    };
    assert_eq!(*kind, EditKind::Scalar);
    assert!(value.is_empty());
}

#[test]
fn applying_sequence_input_writes_through_full_path() {
    let mut changes = set(json!({"name": "Aqua", "notes": {"top_notes": ["citrus"], "base": "musk"}}));
    let fields = DiffEngine::render_edit_fields(&changes, &FieldPath::root());
    let field = EditField::find(&fields, &FieldPath::new(["notes", "top_notes"])).unwrap();

    field.apply(&mut changes, "citrus ,  sea,salt").unwrap();

    assert_eq!(changes.to_json(), json!({
        "name": "Aqua",
        "notes": {"top_notes": ["citrus", "sea", "salt"], "base": "musk"}
    }));
}

#[test]
fn scalar_input_keeps_number_and_bool_types() {
    let mut changes = set(json!({"year": 2001, "limited": false, "name": "Aqua"}));
    let fields = DiffEngine::render_edit_fields(&changes, &FieldPath::root());

    EditField::find(&fields, &FieldPath::new(["year"])).unwrap().apply(&mut changes, "2005").unwrap();
    EditField::find(&fields, &FieldPath::new(["limited"])).unwrap().apply(&mut changes, "true").unwrap();
    EditField::find(&fields, &FieldPath::new(["name"])).unwrap().apply(&mut changes, "42").unwrap();

    assert_eq!(changes.to_json(), json!({"year": 2005, "limited": true, "name": "42"}));
}

#[test]
fn unparsable_number_input_is_kept_as_text() {
    let mut changes = set(json!({"year": 2001}));
    let fields = DiffEngine::render_edit_fields(&changes, &FieldPath::root());
    fields[0].apply(&mut changes, "circa 2001").unwrap();
    assert_eq!(changes.to_json(), json!({"year": "circa 2001"}));
}

#[test]
fn groups_are_not_found_as_editable_fields() {
    let changes = set(json!({"notes": {"top_notes": ["citrus"]}}));
    let fields = DiffEngine::render_edit_fields(&changes, &FieldPath::root());
    assert!(EditField::find(&fields, &FieldPath::new(["notes"])).is_none());
    assert!(EditField::find(&fields, &FieldPath::new(["missing"])).is_none());
}
