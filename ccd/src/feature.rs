//! Build feature catalog and resolution.
//!
//! Each [`Feature`] is an optional component baked into the image at build
//! time. The catalog is closed: tokens from `--with`/`--without` are parsed
//! into the enum up front, so an unknown name fails before anything runs.
//!
//! # Resolution rules
//!
//! - No `--with`: every feature takes its catalog default.
//! - `--with a,b`: exactly `a` and `b` are enabled, everything else is off.
//! - `--without` always wins over `--with` for a feature named in both.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CcdError;

/// Version string used when a feature is not pinned.
pub const DEFAULT_VERSION: &str = "latest";

/// An optional component of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Claude Code CLI
    Claude,
    /// Gemini CLI
    Gemini,
    /// OpenAI Codex CLI
    Codex,
    /// GitHub Copilot CLI
    Copilot,
    /// Python toolchain (uv)
    Python,
    /// Rust toolchain (rustup)
    Rust,
    /// Go toolchain
    Go,
}

impl Feature {
    /// The full catalog, in the order build args are emitted.
    pub const ALL: [Feature; 7] = [
        Feature::Claude,
        Feature::Gemini,
        Feature::Codex,
        Feature::Copilot,
        Feature::Python,
        Feature::Rust,
        Feature::Go,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Claude => "claude",
            Feature::Gemini => "gemini",
            Feature::Codex => "codex",
            Feature::Copilot => "copilot",
            Feature::Python => "python",
            Feature::Rust => "rust",
            Feature::Go => "go",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Feature::Claude => "Claude Code CLI",
            Feature::Gemini => "Gemini CLI",
            Feature::Codex => "OpenAI Codex CLI",
            Feature::Copilot => "GitHub Copilot CLI",
            Feature::Python => "Python toolchain",
            Feature::Rust => "Rust toolchain",
            Feature::Go => "Go toolchain",
        }
    }

    /// Whether the feature is installed when no `--with` list is given.
    pub fn default_enabled(self) -> bool {
        true
    }

    /// Build arg toggling installation, e.g. `INSTALL_RUST`.
    pub fn install_arg(self) -> String {
        format!("INSTALL_{}", self.name().to_uppercase())
    }

    /// Build arg carrying the pinned version, e.g. `RUST_VERSION`.
    pub fn version_arg(self) -> String {
        format!("{}_VERSION", self.name().to_uppercase())
    }

    fn known_names() -> String {
        Feature::ALL
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = CcdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == token)
            .ok_or_else(|| CcdError::UnknownFeature {
                token: s.trim().to_string(),
                known: Feature::known_names(),
            })
    }
}

/// Parse a comma-delimited feature list. Empty tokens are skipped.
pub fn parse_list(list: &str) -> Result<Vec<Feature>, CcdError> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Feature::from_str)
        .collect()
}

/// Resolved enabled/disabled state for every catalog feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    enabled: BTreeMap<Feature, bool>,
    pins: BTreeMap<Feature, String>,
}

impl FeatureSet {
    /// Every feature at its catalog default, nothing pinned.
    pub fn defaults() -> Self {
        Self {
            enabled: Feature::ALL
                .into_iter()
                .map(|f| (f, f.default_enabled()))
                .collect(),
            pins: BTreeMap::new(),
        }
    }

    /// Resolve the set from optional `with` and `without` lists.
    pub fn resolve(with: Option<&str>, without: Option<&str>) -> Result<Self, CcdError> {
        let with = with.map(parse_list).transpose()?;
        let without = without.map(parse_list).transpose()?.unwrap_or_default();

        let mut set = Self::defaults();

        if let Some(with) = with {
            for (feature, enabled) in set.enabled.iter_mut() {
                *enabled = with.contains(feature);
            }
        }

        for feature in without {
            set.enabled.insert(feature, false);
        }

        Ok(set)
    }

    /// Apply `feature=version` pins on top of the resolved set.
    pub fn with_pins<S: AsRef<str>>(mut self, pins: &[S]) -> Result<Self, CcdError> {
        for pin in pins {
            let pin = pin.as_ref();
            let invalid = || CcdError::InvalidPin {
                pin: pin.to_string(),
            };

            let (name, version) = pin.split_once('=').ok_or_else(invalid)?;
            let version = version.trim();
            if version.is_empty() {
                return Err(invalid());
            }

            let feature: Feature = name.parse()?;
            self.pins.insert(feature, version.to_string());
        }
        Ok(self)
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled.get(&feature).copied().unwrap_or(false)
    }

    /// Pinned version, or [`DEFAULT_VERSION`].
    pub fn version(&self, feature: Feature) -> &str {
        self.pins
            .get(&feature)
            .map(String::as_str)
            .unwrap_or(DEFAULT_VERSION)
    }

    /// Features in catalog order with their state.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        self.enabled.iter().map(|(f, on)| (*f, *on))
    }

    pub fn enabled(&self) -> Vec<Feature> {
        self.iter().filter(|(_, on)| *on).map(|(f, _)| f).collect()
    }

    pub fn disabled(&self) -> Vec<Feature> {
        self.iter().filter(|(_, on)| !*on).map(|(f, _)| f).collect()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_whole_catalog() {
        let set = FeatureSet::resolve(None, None).unwrap();
        assert_eq!(set.enabled(), Feature::ALL.to_vec());
        assert!(set.disabled().is_empty());
    }

    #[test]
    fn without_disables_exactly_named_features() {
        let set = FeatureSet::resolve(None, Some("rust,copilot")).unwrap();
        assert_eq!(set.disabled(), vec![Feature::Copilot, Feature::Rust]);
        assert_eq!(set.enabled().len(), Feature::ALL.len() - 2);
    }

    #[test]
    fn with_is_restrictive() {
        let set = FeatureSet::resolve(Some("claude,python"), None).unwrap();
        assert_eq!(set.enabled(), vec![Feature::Claude, Feature::Python]);
    }

    #[test]
    fn without_wins_over_with() {
        let set = FeatureSet::resolve(Some("claude,rust"), Some("rust")).unwrap();
        assert!(set.is_enabled(Feature::Claude));
        assert!(!set.is_enabled(Feature::Rust));
    }

    #[test]
    fn unknown_token_is_rejected() {
        let err = FeatureSet::resolve(Some("frobnicate"), None).unwrap_err();
        match err {
            CcdError::UnknownFeature { token, .. } => assert_eq!(token, "frobnicate"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_token_in_without_is_rejected() {
        assert!(FeatureSet::resolve(None, Some("rust,nope")).is_err());
    }

    #[test]
    fn tokens_are_trimmed_and_case_insensitive() {
        let set = FeatureSet::resolve(Some(" Claude , GO,"), None).unwrap();
        assert_eq!(set.enabled(), vec![Feature::Claude, Feature::Go]);
    }

    #[test]
    fn empty_with_list_disables_everything() {
        let set = FeatureSet::resolve(Some(""), None).unwrap();
        assert!(set.enabled().is_empty());
    }

    #[test]
    fn pins_override_default_version() {
        let set = FeatureSet::defaults()
            .with_pins(&["go=1.23.4", "rust = 1.82.0"])
            .unwrap();
        assert_eq!(set.version(Feature::Go), "1.23.4");
        assert_eq!(set.version(Feature::Rust), "1.82.0");
        assert_eq!(set.version(Feature::Claude), DEFAULT_VERSION);
    }

    #[test]
    fn malformed_pins_are_rejected() {
        assert!(matches!(
            FeatureSet::defaults().with_pins(&["go"]),
            Err(CcdError::InvalidPin { .. })
        ));
        assert!(matches!(
            FeatureSet::defaults().with_pins(&["go="]),
            Err(CcdError::InvalidPin { .. })
        ));
        assert!(matches!(
            FeatureSet::defaults().with_pins(&["zig=0.13"]),
            Err(CcdError::UnknownFeature { .. })
        ));
    }

    #[test]
    fn build_arg_names() {
        assert_eq!(Feature::Copilot.install_arg(), "INSTALL_COPILOT");
        assert_eq!(Feature::Python.version_arg(), "PYTHON_VERSION");
    }
}
