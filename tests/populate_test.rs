use metscreation::{
    DisplayRules, MetadataField, PopulateContext, Ruleset, StructureNode, populate_defaults,
};
use proptest::prelude::*;

const RULESET: &str = include_str!("fixtures/ruleset.json");

fn ruleset() -> Ruleset {
    Ruleset::from_json_str(RULESET).expect("fixture ruleset parses")
}

/// A node of a declared type, sometimes already carrying a title.
fn bare_node() -> impl Strategy<Value = StructureNode> {
    (
        prop::sample::select(vec!["Monograph", "Chapter", "Section"]),
        any::<bool>(),
    )
        .prop_map(|(node_type, titled)| {
            let node = StructureNode::new(node_type);
            if titled {
                node.with_metadata(MetadataField::new("TitleDocMain", "Faust"))
            } else {
                node
            }
        })
}

fn tree() -> impl Strategy<Value = StructureNode> {
    bare_node().prop_recursive(4, 40, 4, |inner| {
        (bare_node(), prop::collection::vec(inner, 0..4)).prop_map(|(mut node, children)| {
            node.children = children;
            node
        })
    })
}

proptest! {
    #[test]
    fn prop_every_default_field_present(mut root in tree()) {
        let rules = ruleset();
        populate_defaults(&mut root, "de", &PopulateContext::new(&rules)).unwrap();

        for node in root.iter_dfs() {
            for def in rules.fields_for_default_display(node, "de").unwrap() {
                prop_assert!(node.has_metadata(&def.name), "{} missing on {}", def.name, node.node_type);
            }
            for def in rules.person_fields_for_default_display(node, "de").unwrap() {
                prop_assert!(node.has_person(&def.name));
            }
        }
    }

    #[test]
    fn prop_rerun_adds_only_groups(mut root in tree()) {
        let rules = ruleset();
        let context = PopulateContext::new(&rules);
        let first = populate_defaults(&mut root, "de", &context).unwrap();
        let second = populate_defaults(&mut root, "de", &context).unwrap();

        prop_assert_eq!(second.nodes, first.nodes);
        prop_assert_eq!(second.fields, 0);
        prop_assert_eq!(second.persons, 0);
        prop_assert_eq!(second.groups, first.groups);
    }

    #[test]
    fn prop_existing_titles_kept(mut root in tree()) {
        let rules = ruleset();
        let before: Vec<_> = root
            .iter_dfs()
            .map(|n| n.metadata_of("TitleDocMain").map(|f| f.value.clone()).collect::<Vec<_>>())
            .collect();

        populate_defaults(&mut root, "de", &PopulateContext::new(&rules)).unwrap();

        let after: Vec<_> = root
            .iter_dfs()
            .map(|n| n.metadata_of("TitleDocMain").map(|f| f.value.clone()).collect::<Vec<_>>())
            .collect();
        for (b, a) in before.iter().zip(&after) {
            if !b.is_empty() {
                prop_assert_eq!(b, a);
            }
        }
    }
}

#[test]
fn test_node_count_unchanged() {
    let rules = ruleset();
    let mut root = StructureNode::new("Monograph")
        .with_child(StructureNode::new("Chapter").with_child(StructureNode::new("Section")))
        .with_child(StructureNode::new("Chapter"));

    let stats = populate_defaults(&mut root, "de", &PopulateContext::new(&rules)).unwrap();

    assert_eq!(stats.nodes, 4);
    assert_eq!(root.iter_dfs().count(), 4);
    assert_eq!(stats.groups, 2);
}
