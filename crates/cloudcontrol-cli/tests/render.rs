use cloudcontrol_cli::commands::{render_plan, render_state};
use cloudcontrol_provisioner::{
    Action, FieldDrift, NetworkDomainSpec, NetworkDomainState, PlanEntry, ProvisionerState,
};

fn entry(label: &str, action: Action, id: Option<&str>) -> PlanEntry {
    PlanEntry {
        label: label.to_string(),
        action,
        id: id.map(str::to_string),
        desired: Some(NetworkDomainSpec::new(label, "NA9")),
        drift: vec![],
    }
}

#[test]
fn plan_lists_actions_and_drift() {
    let mut modify = entry("web", Action::Modify, Some("nd-1"));
    modify.drift.push(FieldDrift {
        field: "plan".to_string(),
        expected: "ADVANCED".to_string(),
        actual: "ESSENTIALS".to_string(),
    });
    let entries = vec![
        entry("app", Action::Create, None),
        entry("db", Action::Ok, Some("nd-2")),
        modify,
    ];

    let out = render_plan(&entries);

    assert_eq!(
        out,
        "+ app (new) (create)\n\
         \x20 db nd-2 (in sync)\n\
         ~ web nd-1 (modify)\n\
         \x20   plan: \"ESSENTIALS\" -> \"ADVANCED\"\n\
         2 change(s).\n"
    );
}

#[test]
fn plan_without_changes_says_so() {
    let out = render_plan(&[entry("db", Action::Ok, Some("nd-2"))]);
    assert!(out.ends_with("No changes.\n"));
}

#[test]
fn empty_plan() {
    assert_eq!(render_plan(&[]), "No network domains declared.\n");
}

#[test]
fn state_lines_show_nat_address() {
    let mut state = ProvisionerState::default();
    state.resources.insert(
        "web".to_string(),
        NetworkDomainState {
            id: "nd-1".to_string(),
            name: "web".to_string(),
            description: String::new(),
            plan: "ESSENTIALS".to_string(),
            datacenter_id: "NA9".to_string(),
            nat_ipv4_address: "168.128.3.44".to_string(),
        },
    );

    assert_eq!(
        render_state(&state),
        "web\tnd-1\tweb\tESSENTIALS\tNA9\tNAT 168.128.3.44\n"
    );
}
