//! Construction sets shipped with the library.

use std::sync::LazyLock;

use crate::construction::ConstructionSet;

/// The set rooms receive when none is assigned. Every slot falls back to the
/// generic constructions.
pub static GENERIC: LazyLock<ConstructionSet> = LazyLock::new(ConstructionSet::default);

pub fn construction_sets() -> Vec<ConstructionSet> {
    vec![GENERIC.clone()]
}

pub fn construction_set_by_name(name: &str) -> Option<ConstructionSet> {
    construction_sets().into_iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_set_is_found_by_name() {
        let set = construction_set_by_name("Default Generic Construction Set").unwrap();
        assert_eq!(set, *GENERIC);
        assert!(set.validate().is_ok());
        assert!(construction_set_by_name("Missing").is_none());
    }
}
