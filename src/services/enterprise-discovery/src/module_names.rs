//! Module name canonicalization
//!
//! The cluster reports module identifiers (`bf`, `ReJSON`, ...) while the GUI
//! shows product names. The mapping is a hook so callers can substitute their
//! own table.

/// Maps raw module identifiers to display names
pub trait ModuleNameMapper: Send + Sync {
    fn canonical_name(&self, raw: &str) -> String;
}

impl<F> ModuleNameMapper for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn canonical_name(&self, raw: &str) -> String {
        self(raw)
    }
}

/// Default table for cluster module identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct RedisModuleNames;

impl RedisModuleNames {
    const TABLE: &'static [(&'static str, &'static str)] = &[
        ("ai", "RedisAI"),
        ("graph", "RedisGraph"),
        ("rg", "RedisGears"),
        ("bf", "RedisBloom"),
        ("ReJSON", "RedisJSON"),
        ("search", "RediSearch"),
        ("timeseries", "RedisTimeSeries"),
    ];

    /// Display name for `raw`, if the table knows it
    pub fn lookup(raw: &str) -> Option<&'static str> {
        Self::TABLE
            .iter()
            .find(|(id, _)| *id == raw)
            .map(|(_, name)| *name)
    }
}

impl ModuleNameMapper for RedisModuleNames {
    fn canonical_name(&self, raw: &str) -> String {
        Self::lookup(raw).unwrap_or(raw).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ai", "RedisAI")]
    #[case("graph", "RedisGraph")]
    #[case("rg", "RedisGears")]
    #[case("bf", "RedisBloom")]
    #[case("ReJSON", "RedisJSON")]
    #[case("search", "RediSearch")]
    #[case("timeseries", "RedisTimeSeries")]
    fn test_known_modules(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(RedisModuleNames.canonical_name(raw), expected);
    }

    #[test]
    fn test_unknown_module_passes_through() {
        assert_eq!(RedisModuleNames.canonical_name("customModule"), "customModule");
        // identifiers are case sensitive
        assert_eq!(RedisModuleNames.canonical_name("rejson"), "rejson");
    }

    #[test]
    fn test_closure_mapper() {
        let upper = |raw: &str| raw.to_uppercase();
        let mapper: &dyn ModuleNameMapper = &upper;
        assert_eq!(mapper.canonical_name("bf"), "BF");
    }
}
