use refloc_core::{
    find_duplicate_clips, find_duplicate_textures, find_linked_materials, find_linked_textures,
    parse_project_json, AnimatorState, AssetHandle, AssetIndex, AssetTable, Config, MemoryIndex,
    Node, NodeKind, Replacement, Rewriter, StateMachine,
};

fn load(name: &str) -> MemoryIndex {
    let json = refloc_test_fixtures::projects::json(name).expect("load project fixture");
    parse_project_json(&json).expect("parse project fixture")
}

#[test]
fn state_policy_visits_nested_machines_in_order() {
    let mut index = load("duplicate-walk");
    let hero = index.assets().controller(AssetHandle(6)).cloned().unwrap();

    let mut names = Vec::new();
    let mut rw = Rewriter::new(Replacement::animator_state(
        |_: &AssetTable, mut s: AnimatorState| {
            names.push(s.name.clone());
            s.speed *= 2.0;
            s
        },
    ));
    assert_eq!(rw.target(), NodeKind::AnimatorState);
    let Node::Controller(out) = rw.rewrite(index.assets_mut(), Node::Controller(hero)) else {
        panic!("controller in, controller out");
    };
    assert_eq!(rw.applied(), 5);
    drop(rw);

    assert_eq!(names, vec!["Idle", "Walk", "Locomotion", "Fall", "Wave"]);
    let base = &out.layers[0].state_machine;
    assert_eq!(base.states[2].state.speed, 2.2);
    assert_eq!(base.state_machines[0].state_machine.states[0].state.speed, 2.0);
}

#[test]
fn machine_policy_stops_at_the_root_machine() {
    let mut index = load("duplicate-walk");
    let hero = index.assets().controller(AssetHandle(6)).cloned().unwrap();
    let mut seen = Vec::new();
    let mut rw = Rewriter::new(Replacement::state_machine(
        |_: &AssetTable, m: StateMachine| {
            seen.push(m.name.clone());
            m
        },
    ));
    rw.rewrite(index.assets_mut(), Node::Controller(hero));
    drop(rw);
    // sub-machine "Air" lives under "Base" and is never reached
    assert_eq!(seen, vec!["Base", "Upper"]);
}

#[test]
fn finders_on_fixtures() {
    let index = load("duplicate-walk");
    let cfg = Config::default();
    assert_eq!(
        find_duplicate_clips(&index, &cfg, AssetHandle(0)),
        vec![AssetHandle(1), AssetHandle(3), AssetHandle(4)]
    );
    assert!(find_duplicate_clips(&index, &cfg, AssetHandle(2)).is_empty());

    let index = load("textures");
    let hero_albedo = index.find_by_path("Assets/Characters/Hero/albedo.png").unwrap();
    let villain_albedo = index.find_by_path("Assets/Characters/Villain/albedo.png").unwrap();
    let ramp = index.find_by_path("Assets/Characters/Hero/ramp.png").unwrap();
    let skin = index.find_by_path("Assets/Characters/Hero/Skin.mat").unwrap();
    assert_eq!(find_duplicate_textures(&index, hero_albedo), vec![villain_albedo]);
    assert_eq!(find_linked_materials(&index, hero_albedo), vec![skin]);
    assert_eq!(find_linked_textures(&index, skin), vec![hero_albedo, ramp]);
}
