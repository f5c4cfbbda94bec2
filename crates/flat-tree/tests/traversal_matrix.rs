use flat_tree::{Lookup, NodeId, NodeRef, NullableTree, Tree, TreeError, TreeOptions};
use serde_json::{json, Value};

fn vehicles() -> Value {
    json!([
        {"id": "vehicle", "parent": "", "Name": "Vehicle"},
        {"id": "bicycle", "parent": "vehicle", "Name": "Bicycle", "wheels": 2},
        {"id": "car", "parent": "vehicle", "Name": "Car", "wheels": 4},
        {"id": "truck", "parent": "vehicle", "Name": "Truck", "wheels": 6},
        {"id": "building", "parent": "", "Name": "Building"},
        {"id": "school", "parent": "building", "Name": "School"},
        {"id": "library", "parent": "building", "Name": "Library"},
        {"id": "primary-school", "parent": "school", "Name": "Primary"},
    ])
}

fn strict() -> Tree {
    Tree::from_json(vehicles(), TreeOptions::new().with_root_id("")).unwrap()
}

fn nullable() -> NullableTree {
    Tree::from_json(vehicles(), TreeOptions::new().with_root_id("")).unwrap()
}

fn ids<L: Lookup>(nodes: &[NodeRef<'_, L>]) -> Vec<String> {
    nodes.iter().map(|n| n.to_string()).collect()
}

#[test]
fn siblings_exclude_self_and_keep_order() {
    let tree = strict();
    let car = tree.node_by_id("car").unwrap();
    assert_eq!(ids(&car.siblings()), ["bicycle", "truck"]);
    assert_eq!(ids(&car.siblings_and_self()), ["bicycle", "car", "truck"]);
}

#[test]
fn root_has_no_siblings() {
    let tree = strict();
    assert!(tree.root().siblings().is_empty());
    assert!(tree.root().siblings_and_self().is_empty());
}

#[test]
fn preceding_and_following_siblings() {
    let tree = strict();
    let bicycle = tree.node_by_id("bicycle").unwrap();
    let car = tree.node_by_id("car").unwrap();
    let truck = tree.node_by_id("truck").unwrap();
    assert!(bicycle.preceding_sibling().is_none());
    assert_eq!(bicycle.following_sibling().unwrap().id(), &NodeId::from("car"));
    assert_eq!(car.preceding_sibling().unwrap().id(), &NodeId::from("bicycle"));
    assert_eq!(car.following_sibling().unwrap().id(), &NodeId::from("truck"));
    assert!(truck.following_sibling().is_none());

    let library = tree.node_by_id("library").unwrap();
    assert!(library.following_sibling().is_none());
    assert_eq!(library.preceding_sibling().unwrap(), tree.node_by_id("school").unwrap());
}

#[test]
fn descendants_are_pre_order() {
    let tree = strict();
    let building = tree.node_by_id("building").unwrap();
    assert_eq!(ids(&building.descendants()), ["school", "primary-school", "library"]);
    assert_eq!(
        ids(&building.descendants_and_self()),
        ["building", "school", "primary-school", "library"]
    );
    assert!(tree.node_by_id("car").unwrap().descendants().is_empty());
}

#[test]
fn ancestors_end_with_root() {
    let tree = strict();
    let primary = tree.node_by_id("primary-school").unwrap();
    let ancestors = primary.ancestors();
    assert_eq!(ancestors.len(), 3);
    assert_eq!(ancestors[0].id(), &NodeId::from("school"));
    assert_eq!(ancestors[1].id(), &NodeId::from("building"));
    assert!(ancestors[2].is_root());

    let with_self = primary.ancestors_and_self();
    assert_eq!(with_self.len(), 4);
    assert_eq!(with_self[0], primary);
    assert!(tree.root().ancestors().is_empty());
}

#[test]
fn levels_count_from_root() {
    let tree = strict();
    assert_eq!(tree.root().level(), 0);
    assert_eq!(tree.node_by_id("building").unwrap().level(), 1);
    assert_eq!(tree.node_by_id("school").unwrap().level(), 2);
    assert_eq!(tree.node_by_id("primary-school").unwrap().level(), 3);
}

#[test]
fn children_and_parent_links_agree() {
    let tree = strict();
    for node in tree.nodes() {
        let parent = node.parent().unwrap();
        assert!(parent.children().contains(&node));
        assert_eq!(node.parent_id(), Some(parent.id()));
        assert_eq!(parent.count_children(), parent.children().len());
        assert!(parent.has_children());
    }
    assert!(!tree.node_by_id("truck").unwrap().has_children());
}

#[test]
fn property_access_is_case_insensitive() {
    let tree = strict();
    let car = tree.node_by_id("car").unwrap();
    assert_eq!(car.get("name").unwrap(), &json!("Car"));
    assert_eq!(car.get("NAME").unwrap(), &json!("Car"));
    assert_eq!(car.get("Wheels").unwrap(), &json!(4));
    assert_eq!(car.get("id").unwrap(), &json!("car"));
    assert_eq!(car.get("parent").unwrap(), &json!("vehicle"));
}

#[test]
fn missing_property_strict_vs_nullable() {
    let tree = strict();
    let err = tree.node_by_id("car").unwrap().get("colour").unwrap_err();
    assert_eq!(
        err,
        TreeError::UndefinedProperty {
            name: "colour".to_string(),
            id: NodeId::from("car"),
        }
    );

    let tree = nullable();
    let car = tree.node_by_id("car").unwrap();
    assert_eq!(car.get("colour"), None);
    assert_eq!(car.get("wheels"), Some(&json!(4)));
}

#[test]
fn null_property_counts_as_present() {
    let tree: Tree = Tree::from_records(vec![json!({"id": 1, "parent": 0, "note": null})]).unwrap();
    assert_eq!(tree.node_by_id(1).unwrap().get("note").unwrap(), &Value::Null);
}

#[test]
fn to_map_returns_every_property() {
    let tree = strict();
    let map = tree.node_by_id("bicycle").unwrap().to_map();
    assert_eq!(
        Value::Object(map),
        json!({"name": "Bicycle", "wheels": 2, "id": "bicycle", "parent": "vehicle"})
    );
    let keys: Vec<String> = tree.node_by_id("bicycle").unwrap().to_map().keys().cloned().collect();
    assert_eq!(keys, ["name", "wheels", "id", "parent"]);
}

#[test]
fn node_by_value_path_descends_one_level_per_value() {
    let tree = strict();
    let hit = tree
        .node_by_value_path("name", &[json!("Building"), json!("School"), json!("Primary")])
        .unwrap();
    assert_eq!(hit.id(), &NodeId::from("primary-school"));

    let hit = tree.node_by_value_path("Name", &[json!("Vehicle")]).unwrap();
    assert_eq!(hit.id(), &NodeId::from("vehicle"));

    assert!(tree
        .node_by_value_path("name", &[json!("Building"), json!("Car")])
        .is_none());
    assert!(tree.node_by_value_path("name", &[]).is_none());
}

#[test]
fn value_path_is_type_sensitive() {
    let tree = strict();
    assert!(tree.node_by_value_path("wheels", &[json!(2)]).is_none());
    let tree: Tree = Tree::from_records(vec![
        json!({"id": 1, "parent": 0, "code": 7}),
        json!({"id": 2, "parent": 0, "code": "7"}),
    ])
    .unwrap();
    assert_eq!(
        tree.node_by_value_path("code", &[json!("7")]).unwrap().id(),
        &NodeId::from(2)
    );
    assert_eq!(
        tree.node_by_value_path("code", &[json!(7)]).unwrap().id(),
        &NodeId::from(1)
    );
}

#[test]
fn unknown_id_strict_vs_nullable() {
    assert_eq!(
        strict().node_by_id("ghost").unwrap_err(),
        TreeError::UnknownId(NodeId::from("ghost"))
    );
    assert!(nullable().node_by_id("ghost").is_none());
}

#[test]
fn root_is_reachable_by_its_id() {
    let tree = strict();
    let root = tree.node_by_id("").unwrap();
    assert!(root.is_root());
    assert_eq!(root.parent(), None);
    assert_eq!(ids(&root.children()), ["vehicle", "building"]);
}

#[test]
fn handles_resolve_by_index() {
    let tree = strict();
    let car = tree.node_by_id("car").unwrap();
    let again = tree.node_at(car.index()).unwrap();
    assert_eq!(again, car);
}

#[test]
fn outline_rendering() {
    let tree = strict();
    assert_eq!(
        tree.to_string(),
        "- vehicle\n  - bicycle\n  - car\n  - truck\n- building\n  - school\n    - primary-school\n  - library"
    );
}
