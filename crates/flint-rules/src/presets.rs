//! Rule registry and presets.

use crate::{
    BannedIdentifiers, BlacklistedIdentifiers, BlacklistedSequences, BreakInSynchronized, CatchByReference,
    Constructors, DefinedNames, DeprecatedIncludes, ExceptionInheritance, IfEndifBalance, ImplicitCast,
    IncludeAssociatedHeader, IncludeGuard, InitializeFromItself, InlHeaderInclusions, Memset,
    MutexHolderHasName, NamespaceScopedStatics, ProtectedInheritance, SmartPtrUsage, ThrowSpecification,
    ThrowsHeapException, UniquePtrUsage, UpcaseNull, UsingDirectives, UsingNamespaceDirectives,
    VirtualDestructors,
};
use flint_core::{Config, RuleBox, Severity};
use thiserror::Error;
use tracing::debug;

/// Preset configurations for flint.
///
/// A preset is the weakest rule tier that runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Error-tier rules only, for gradual adoption.
    Minimal,
    /// Error and warning tiers.
    Recommended,
    /// Every rule, advice included.
    Strict,
}

impl Preset {
    /// Returns the minimum severity this preset runs at.
    #[must_use]
    pub fn level(self) -> Severity {
        match self {
            Self::Minimal => Severity::Error,
            Self::Recommended => Severity::Warning,
            Self::Strict => Severity::Advice,
        }
    }

    /// Returns the rules whose tier this preset runs.
    #[must_use]
    pub fn rules(self, config: &Config) -> Vec<RuleBox> {
        let level = self.level();
        all_rules(config)
            .into_iter()
            .filter(|rule| rule.default_severity().passes(level))
            .collect()
    }
}

/// A rule selector that matches no rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown rule '{0}'. Run `flint list-rules` to see available rules.")]
pub struct UnknownRule(pub String);

/// Returns every built-in rule, configured from `config`'s rule options.
///
/// Recognized options:
/// - `deprecated-includes.headers`: replaces the deprecated header list
/// - `defined-names.allow`: extends the reserved-name allow-list
/// - `banned-identifiers.identifiers`: a table of identifier to reason
#[must_use]
pub fn all_rules(config: &Config) -> Vec<RuleBox> {
    vec![
        Box::new(BlacklistedIdentifiers::new()),
        Box::new(InitializeFromItself::new()),
        Box::new(IfEndifBalance::new()),
        Box::new(Memset::new()),
        Box::new(IncludeAssociatedHeader::new()),
        Box::new(IncludeGuard::new()),
        Box::new(InlHeaderInclusions::new()),
        Box::new(Constructors::new()),
        Box::new(CatchByReference::new()),
        Box::new(ThrowsHeapException::new()),
        Box::new(banned_identifiers(config)),
        Box::new(UniquePtrUsage::new()),
        Box::new(MutexHolderHasName::new()),
        Box::new(BreakInSynchronized::new()),
        Box::new(UsingDirectives::new()),
        Box::new(UsingNamespaceDirectives::new()),
        Box::new(BlacklistedSequences::new()),
        Box::new(defined_names(config)),
        Box::new(deprecated_includes(config)),
        Box::new(ImplicitCast::new()),
        Box::new(ProtectedInheritance::new()),
        Box::new(ThrowSpecification::new()),
        Box::new(VirtualDestructors::new()),
        Box::new(ExceptionInheritance::new()),
        Box::new(SmartPtrUsage::new()),
        Box::new(NamespaceScopedStatics::new()),
        Box::new(UpcaseNull::new()),
    ]
}

/// Returns the rules selected by name or code, in registry order.
///
/// # Errors
///
/// Returns [`UnknownRule`] for the first selector that matches nothing.
pub fn find_rules<S: AsRef<str>>(config: &Config, selectors: &[S]) -> Result<Vec<RuleBox>, UnknownRule> {
    let rules = all_rules(config);
    for selector in selectors {
        let selector = selector.as_ref();
        if !rules.iter().any(|r| r.name() == selector || r.code() == selector) {
            return Err(UnknownRule(selector.to_string()));
        }
    }
    Ok(rules
        .into_iter()
        .filter(|r| {
            selectors
                .iter()
                .any(|s| r.name() == s.as_ref() || r.code() == s.as_ref())
        })
        .collect())
}

fn deprecated_includes(config: &Config) -> DeprecatedIncludes {
    match config
        .rule(crate::deprecated_includes::NAME)
        .and_then(|r| r.get_str_array("headers"))
    {
        Some(headers) => DeprecatedIncludes::with_headers(headers),
        None => DeprecatedIncludes::new(),
    }
}

fn defined_names(config: &Config) -> DefinedNames {
    let allowed = config
        .rule(crate::defined_names::NAME)
        .and_then(|r| r.get_str_array("allow"))
        .unwrap_or_default();
    DefinedNames::new().allow(allowed)
}

fn banned_identifiers(config: &Config) -> BannedIdentifiers {
    let mut rule = BannedIdentifiers::new();
    let Some(table) = config
        .rule(crate::banned_identifiers::NAME)
        .and_then(|r| r.options.get("identifiers"))
        .and_then(toml::Value::as_table)
    else {
        return rule;
    };
    for (identifier, reason) in table {
        match reason.as_str() {
            Some(reason) => rule = rule.ban(identifier.as_str(), reason),
            None => debug!(identifier = %identifier, "ignoring banned identifier without a string reason"),
        }
    }
    rule
}
