use cloudcontrol_compute::FieldChange;
use cloudcontrol_provisioner::{NetworkDomainSpec, UpdateIntent};

#[test]
fn renaming_sets_only_name() {
    let previous = NetworkDomainSpec::new("a", "NA9").with_plan("ESSENTIALS");
    let desired = NetworkDomainSpec::new("b", "NA9").with_plan("ESSENTIALS");

    let intent = UpdateIntent::diff(&previous, &desired);

    assert_eq!(intent.name, FieldChange::Set("b".to_string()));
    assert_eq!(intent.description, FieldChange::Unchanged);
    assert_eq!(intent.plan, FieldChange::Unchanged);
    assert!(!intent.is_empty());
}

#[test]
fn identical_specs_produce_empty_intent() {
    let spec = NetworkDomainSpec::new("web", "NA9").with_description("front end");
    assert!(UpdateIntent::diff(&spec, &spec).is_empty());
}

#[test]
fn datacenter_difference_is_not_part_of_intent() {
    let previous = NetworkDomainSpec::new("web", "NA9");
    let desired = NetworkDomainSpec::new("web", "NA12");
    assert!(UpdateIntent::diff(&previous, &desired).is_empty());
}

#[test]
fn plan_and_description_changes_are_carried_to_edit() {
    let previous = NetworkDomainSpec::new("web", "NA9").with_description("old");
    let desired = NetworkDomainSpec::new("web", "NA9")
        .with_description("new")
        .with_plan("ADVANCED");

    let edit = UpdateIntent::diff(&previous, &desired).into_edit("nd-1");

    assert_eq!(edit.id, "nd-1");
    assert_eq!(edit.name, FieldChange::Unchanged);
    assert_eq!(edit.description, FieldChange::Set("new".to_string()));
    assert_eq!(edit.plan, FieldChange::Set("ADVANCED".to_string()));
}

#[test]
fn spec_defaults_apply_when_deserializing() {
    let spec: NetworkDomainSpec =
        serde_json::from_str(r#"{"name": "web", "datacenter": "NA9"}"#).unwrap();
    assert_eq!(spec.description, "");
    assert_eq!(spec.plan, "ESSENTIALS");
    assert_eq!(spec.datacenter_id, "NA9");
}
