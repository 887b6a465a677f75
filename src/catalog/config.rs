//! Catalog configuration

use super::classify::OtherTypePolicy;

/// Channel catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// How to classify services tagged `other`
    pub other_type_policy: OtherTypePolicy,

    /// URL schemes treated as directly fetchable icons
    pub remote_icon_schemes: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            other_type_policy: OtherTypePolicy::Ignore,
            remote_icon_schemes: vec!["http".to_string(), "https".to_string()],
        }
    }
}

impl CatalogConfig {
    /// Set the fallback for services tagged `other`
    pub fn other_type_policy(mut self, policy: OtherTypePolicy) -> Self {
        self.other_type_policy = policy;
        self
    }

    /// Replace the set of remote icon schemes
    pub fn remote_icon_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remote_icon_schemes = schemes.into_iter().map(Into::into).collect();
        self
    }
}
