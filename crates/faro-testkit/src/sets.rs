//! Named override sets shared by parametrized tests.

use std::sync::OnceLock;

use indexmap::IndexMap;

/// Catalog of named override sets, parsed once per process.
///
/// Keys are flattened: the segment before the first dot names the set, the
/// remainder is the dotted override path the value applies to. Values keep
/// their YAML types.
pub fn constraint_sets() -> &'static IndexMap<String, serde_yaml::Value> {
    static SETS: OnceLock<IndexMap<String, serde_yaml::Value>> = OnceLock::new();
    SETS.get_or_init(|| {
        serde_yaml::from_str(include_str!("../fixtures/constraint_sets.yaml"))
            .expect("packaged constraint_sets.yaml is well formed")
    })
}

/// Override entries of one named set, as `(dotted path, value)` pairs in
/// declaration order. An unknown set name yields no entries.
pub fn set_entries(name: &str) -> Vec<(&'static str, &'static serde_yaml::Value)> {
    constraint_sets()
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(|path| (path, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{constraint_sets, set_entries};

    #[test]
    fn catalog_parses_with_typed_values() {
        let sets = constraint_sets();
        assert_eq!(
            sets["supply_caps.techs.test_supply.flow_cap_max"].as_f64(),
            Some(10.0)
        );
        assert_eq!(sets["tight_system.config.bigM"].as_f64(), Some(100.0));
    }

    #[test]
    fn set_entries_strip_the_set_name() {
        let entries = set_entries("supply_caps");
        let paths: Vec<_> = entries.iter().map(|(path, _)| *path).collect();
        assert_eq!(
            paths,
            [
                "techs.test_supply.flow_cap_max",
                "nodes.b.techs.test_supply.flow_cap_max",
            ]
        );
        assert!(entries.iter().all(|(_, value)| value.as_f64() == Some(10.0)));
    }

    #[test]
    fn set_names_match_whole_segments_only() {
        // "tight" must not pick up the "tight_system" keys.
        assert!(set_entries("tight").is_empty());
        assert!(set_entries("absent").is_empty());
        assert_eq!(set_entries("tight_system").len(), 2);
    }
}
