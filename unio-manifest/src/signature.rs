//! Resolve parsed directives into per-function signatures.

use std::collections::{HashMap, HashSet};

use anyhow::{Result, bail};
use serde::Serialize;

use crate::directive::{Constant, Directive, Param, TypeRef};

/// Suffix marking a constant as a function's async classification flag.
pub const ASYNC_SUFFIX: &str = "_async";

/// A function as other runtimes must replicate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub name: String,
    pub arity: usize,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub params: Vec<Param>,
    pub returns: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub functions: Vec<Signature>,
    /// Constants that are not async flags, in declaration order.
    pub constants: Vec<Constant>,
}

/// Pair every `defun` with its `<name>_async` constant.
///
/// A function without a flag is synchronous. Flags must be `0` or `1`, and a
/// name may be declared only once per kind.
pub fn resolve(directives: &[Directive]) -> Result<Manifest> {
    let mut values: HashMap<&str, i64> = HashMap::new();
    for directive in directives {
        if let Directive::Def(constant) = directive {
            if values.insert(constant.name.as_str(), constant.value).is_some() {
                bail!("constant {} declared twice", constant.name);
            }
        }
    }

    let mut functions = Vec::new();
    let mut flags_used = HashSet::new();
    let mut seen = HashSet::new();
    for directive in directives {
        let Directive::Defun(decl) = directive else {
            continue;
        };
        if !seen.insert(decl.name.as_str()) {
            bail!("function {} declared twice", decl.name);
        }
        let flag_name = format!("{}{ASYNC_SUFFIX}", decl.name);
        let is_async = match values.get(flag_name.as_str()) {
            None => false,
            Some(0) => false,
            Some(1) => true,
            Some(other) => bail!("{flag_name} must be 0 or 1 (got {other})"),
        };
        if values.contains_key(flag_name.as_str()) {
            flags_used.insert(flag_name);
        }
        functions.push(Signature {
            name: decl.name.clone(),
            arity: decl.params.len(),
            is_async,
            params: decl.params.clone(),
            returns: decl.returns.clone(),
        });
    }

    let constants = directives
        .iter()
        .filter_map(|directive| match directive {
            Directive::Def(constant) if !flags_used.contains(&constant.name) => {
                Some(constant.clone())
            }
            _ => None,
        })
        .collect();

    Ok(Manifest {
        functions,
        constants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::parse_all;

    fn manifest(lines: &[&str]) -> Result<Manifest> {
        resolve(&parse_all(lines)?)
    }

    #[test]
    fn pairs_functions_with_async_flags() {
        let manifest = manifest(&[
            "(def open_async 0)",
            "(defun (open: int) [(path: string) (opts: int[])])",
            "(def read_async 1)",
            "(defun (read: int[]) [(fd: int)])",
        ])
        .expect("resolve");

        let summary: Vec<(&str, usize, bool)> = manifest
            .functions
            .iter()
            .map(|sig| (sig.name.as_str(), sig.arity, sig.is_async))
            .collect();
        assert_eq!(summary, vec![("open", 2, false), ("read", 1, true)]);
        assert!(manifest.constants.is_empty());
    }

    #[test]
    fn missing_flag_means_sync_and_plain_constants_are_kept() {
        let manifest =
            manifest(&["(def open_read 0)", "(defun (now: int) [])"]).expect("resolve");
        assert!(!manifest.functions[0].is_async);
        assert_eq!(manifest.constants.len(), 1);
        assert_eq!(manifest.constants[0].name, "open_read");
    }

    #[test]
    fn rejects_duplicates_and_bad_flags() {
        assert!(manifest(&["(defun (f: nil) [])", "(defun (f: nil) [])"]).is_err());
        assert!(manifest(&["(def a 1)", "(def a 2)"]).is_err());
        assert!(manifest(&["(def f_async 2)", "(defun (f: nil) [])"]).is_err());
    }

    #[test]
    fn serializes_async_key() {
        let manifest =
            manifest(&["(def f_async 1)", "(defun (f: nil) [(x: int)])"]).expect("resolve");
        let json = serde_json::to_value(&manifest).expect("json");
        assert_eq!(json["functions"][0]["async"], true);
        assert_eq!(json["functions"][0]["params"][0]["type"], "int");
        assert_eq!(json["functions"][0]["returns"], "nil");
    }
}
