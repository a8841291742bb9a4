//! Directive grammar.
//!
//! ```text
//! (def NAME INTEGER)
//! (defun (NAME: TYPE) [(PARAM: TYPE) ...])
//! TYPE := int | string | nil | TYPE[]
//! ```

use std::fmt;
use std::sync::LazyLock;

use anyhow::{Result, anyhow, bail};
use serde::{Serialize, Serializer};

/// Value type named in a `defun` signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Int,
    String,
    Nil,
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if let Some(inner) = text.strip_suffix("[]") {
            return Ok(TypeRef::List(Box::new(TypeRef::parse(inner)?)));
        }
        match text {
            "int" => Ok(TypeRef::Int),
            "string" => Ok(TypeRef::String),
            "nil" => Ok(TypeRef::Nil),
            other => Err(anyhow!("unknown type '{other}'")),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Int => f.write_str("int"),
            TypeRef::String => f.write_str("string"),
            TypeRef::Nil => f.write_str("nil"),
            TypeRef::List(inner) => write!(f, "{inner}[]"),
        }
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub returns: TypeRef,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
    pub name: String,
    pub value: i64,
}

/// One parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Def(Constant),
    Defun(FunctionDecl),
}

static DEF_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^\(def\s+([A-Za-z_][A-Za-z0-9_]*)\s+(-?\d+)\s*\)$").unwrap()
});

static DEFUN_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^\(defun\s+\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*([^()]+?)\s*\)\s*\[(.*)\]\s*\)$",
    )
    .unwrap()
});

static PARAM_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\(\s*([A-Za-z_][A-Za-z0-9_]*)\s*:\s*([^()]+?)\s*\)").unwrap()
});

/// Parse one extracted directive body.
pub fn parse_directive(text: &str) -> Result<Directive> {
    if let Some(caps) = DEF_RE.captures(text) {
        let value = caps[2]
            .parse::<i64>()
            .map_err(|err| anyhow!("constant {} out of range: {err}", &caps[1]))?;
        return Ok(Directive::Def(Constant {
            name: caps[1].to_string(),
            value,
        }));
    }
    if let Some(caps) = DEFUN_RE.captures(text) {
        let returns = TypeRef::parse(&caps[2])
            .map_err(|err| anyhow!("return type of {}: {err}", &caps[1]))?;
        let params =
            parse_params(&caps[3]).map_err(|err| anyhow!("params of {}: {err}", &caps[1]))?;
        return Ok(Directive::Defun(FunctionDecl {
            name: caps[1].to_string(),
            returns,
            params,
        }));
    }
    bail!("unrecognised directive: {text}")
}

/// Parse every non-empty directive, skipping bare markers.
pub fn parse_all<S: AsRef<str>>(directives: &[S]) -> Result<Vec<Directive>> {
    let mut parsed = Vec::with_capacity(directives.len());
    for text in directives {
        let text: &str = text.as_ref();
        if text.is_empty() {
            continue;
        }
        parsed.push(parse_directive(text)?);
    }
    Ok(parsed)
}

fn parse_params(list: &str) -> Result<Vec<Param>> {
    let leftover = PARAM_RE.replace_all(list, "");
    if !leftover.trim().is_empty() {
        bail!("unexpected text '{}'", leftover.trim());
    }
    PARAM_RE
        .captures_iter(list)
        .map(|caps| {
            Ok(Param {
                name: caps[1].to_string(),
                ty: TypeRef::parse(&caps[2])?,
            })
        })
        .collect()
}
