//! Signature lookup with memoization.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;

use crate::error::ConfigError;
use crate::registry::{self, positional_exclusions, required_signatures};

/// Kind of a function parameter, in declaration-order precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

impl ParamKind {
    /// Whether a single positional argument can line up with this parameter.
    pub fn is_alignable(self) -> bool {
        matches!(
            self,
            ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly
        )
    }
}

/// One parameter of a bundled signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub kind: ParamKind,
    /// Position in the declared parameter list.
    pub order: usize,
}

/// Parameters of one entry point, in declaration order.
pub type Signature = Arc<[ParamDescriptor]>;

static GLOBAL: LazyLock<SignatureDatabase> = LazyLock::new(SignatureDatabase::default);

/// Memoized signature lookups.
///
/// The cache is append-only and keyed by qualified name. Concurrent callers
/// may race to fill the same key; the first insertion wins and every caller
/// gets an equal value either way.
#[derive(Clone, Default)]
pub struct SignatureDatabase {
    cache: Arc<DashMap<String, Signature>>,
}

impl SignatureDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide database.
    pub fn global() -> &'static SignatureDatabase {
        &GLOBAL
    }

    /// Look up the current parameter list of `qualname`.
    pub fn lookup(&self, qualname: &str) -> Result<Signature, ConfigError> {
        if let Some(hit) = self.cache.get(qualname) {
            return Ok(Arc::clone(hit.value()));
        }

        let loaded = load_signature(qualname)?;
        tracing::trace!(qualname, params = loaded.len(), "Loaded signature");
        match self.cache.entry(qualname.to_owned()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&loaded));
                Ok(loaded)
            }
        }
    }

    /// Number of memoized signatures.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Look up every registry entry and check its positional exclusions.
    ///
    /// Run this before rewriting anything: a failure here means the bundled
    /// table and the registry disagree.
    pub fn verify_registry(&self) -> Result<(), ConfigError> {
        for qualname in required_signatures() {
            let signature = self.lookup(qualname)?;
            for parameter in positional_exclusions(qualname) {
                if !signature.iter().any(|p| p.name == parameter) {
                    return Err(ConfigError::UnknownExclusion {
                        qualname: qualname.to_owned(),
                        parameter: parameter.to_owned(),
                    });
                }
            }
        }
        tracing::debug!(signatures = self.cached(), "Registry verified");
        Ok(())
    }
}

/// Split `qualname` into defining module and local name, then read the
/// function's entry from the bundled table.
fn load_signature(qualname: &str) -> Result<Signature, ConfigError> {
    let (module, function) = qualname
        .rsplit_once('.')
        .filter(|(module, function)| !module.is_empty() && !function.is_empty())
        .ok_or_else(|| ConfigError::MalformedName {
            qualname: qualname.to_owned(),
        })?;

    let signatures =
        registry::module_signatures(module).ok_or_else(|| ConfigError::UnknownModule {
            module: module.to_owned(),
            qualname: qualname.to_owned(),
        })?;
    let function = signatures
        .function(function)
        .ok_or_else(|| ConfigError::UnknownFunction {
            qualname: qualname.to_owned(),
        })?;

    validate(qualname, function.params)?;
    Ok(function
        .params
        .iter()
        .enumerate()
        .map(|(order, &(name, kind))| ParamDescriptor { name, kind, order })
        .collect())
}

fn validate(qualname: &str, params: &[(&str, ParamKind)]) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSignature {
        qualname: qualname.to_owned(),
        reason,
    };

    for (i, &(name, kind)) in params.iter().enumerate() {
        if name.is_empty() {
            return Err(invalid(format!("parameter {i} has no name")));
        }
        if params[..i].iter().any(|&(prev, _)| prev == name) {
            return Err(invalid(format!("duplicate parameter `{name}`")));
        }
        if let Some(&(prev, prev_kind)) = i.checked_sub(1).map(|j| &params[j]) {
            let repeated_variadic = kind == prev_kind
                && matches!(kind, ParamKind::VarPositional | ParamKind::VarKeyword);
            if kind < prev_kind || repeated_variadic {
                return Err(invalid(format!(
                    "`{name}` ({kind:?}) cannot follow `{prev}` ({prev_kind:?})"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_fractions() {
        let db = SignatureDatabase::new();
        let sig = db.lookup("hypothesis.strategies.fractions").unwrap();
        let described: Vec<_> = sig.iter().map(|p| (p.name, p.kind, p.order)).collect();
        assert_eq!(
            described,
            vec![
                ("min_value", ParamKind::PositionalOrKeyword, 0),
                ("max_value", ParamKind::PositionalOrKeyword, 1),
                ("max_denominator", ParamKind::KeywordOnly, 2),
            ]
        );
    }

    #[test]
    fn test_lookup_is_memoized() {
        let db = SignatureDatabase::new();
        let first = db.lookup("hypothesis.strategies.lists").unwrap();
        let second = db.lookup("hypothesis.strategies.lists").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(db.cached(), 1);

        // Clones share the cache.
        let shared = db.clone();
        let third = shared.lookup("hypothesis.strategies.lists").unwrap();
        assert!(Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_lookup_failures_are_config_errors() {
        let db = SignatureDatabase::new();
        assert_eq!(
            db.lookup("floats"),
            Err(ConfigError::MalformedName {
                qualname: "floats".to_owned()
            })
        );
        assert!(matches!(
            db.lookup("hypothesis.nowhere.floats"),
            Err(ConfigError::UnknownModule { .. })
        ));
        assert!(matches!(
            db.lookup("hypothesis.strategies.integers"),
            Err(ConfigError::UnknownFunction { .. })
        ));
        assert_eq!(db.cached(), 0);
    }

    #[test]
    fn test_verify_registry() {
        let db = SignatureDatabase::new();
        db.verify_registry().unwrap();
        assert_eq!(db.cached(), registry::TARGET_REGISTRY.len());
    }

    #[test]
    fn test_every_bundled_signature_is_valid() {
        for qualname in registry::table_qualnames() {
            load_signature(&qualname).unwrap();
        }
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let err = validate("m.f", &[("a", ParamKind::KeywordOnly), ("b", ParamKind::PositionalOrKeyword)]);
        assert!(matches!(err, Err(ConfigError::InvalidSignature { .. })));
        let err = validate("m.f", &[("a", ParamKind::PositionalOrKeyword), ("a", ParamKind::KeywordOnly)]);
        assert!(matches!(err, Err(ConfigError::InvalidSignature { .. })));
        let err = validate("m.f", &[("a", ParamKind::VarKeyword), ("b", ParamKind::VarKeyword)]);
        assert!(matches!(err, Err(ConfigError::InvalidSignature { .. })));
        assert!(validate("m.f", &[("a", ParamKind::PositionalOrKeyword), ("b", ParamKind::KeywordOnly)]).is_ok());
    }

    #[test]
    fn test_descriptors_serialize_like_inspect() {
        let db = SignatureDatabase::new();
        let sig = db.lookup("hypothesis.target").unwrap();
        let json = serde_json::to_string(&sig[1]).unwrap();
        assert_eq!(json, r#"{"name":"label","kind":"KEYWORD_ONLY","order":1}"#);
    }
}
