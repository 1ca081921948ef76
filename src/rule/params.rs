//! Rule parameters in declarative form.

use crate::record::RecordType;
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The name of the rule in declarative rule strings.
pub const RULE_NAME: &str = "domain";

/// A positional rule parameter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RuleParam {
    /// Require records of this type (one of A, AAAA, CNAME, TXT, MX).
    Record(RecordType),
    /// Require any DNS records.
    Dns,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseParamError {
    UnknownParam(Box<str>),
    UnknownRule(Box<str>),
}

impl Display for ParseParamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParam(s) => write!(f, "unknown rule parameter \"{s}\""),
            Self::UnknownRule(s) => write!(f, "unknown rule \"{s}\""),
        }
    }
}

impl Error for ParseParamError {}

impl FromStr for RuleParam {
    type Err = ParseParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let param = s.trim();

        let param = match param.to_ascii_lowercase().as_str() {
            "a" => Self::Record(RecordType::A),
            "aaaa" => Self::Record(RecordType::Aaaa),
            "cname" => Self::Record(RecordType::Cname),
            "txt" => Self::Record(RecordType::Txt),
            "mx" => Self::Record(RecordType::Mx),
            "dns" => Self::Dns,
            _ => return Err(ParseParamError::UnknownParam(param.into())),
        };

        Ok(param)
    }
}

/// Splits a declarative rule string of the form `domain:a,mx` into its
/// parameters.
///
/// The rule name must be `domain`. Without a colon, there are no parameters.
pub fn split_rule_str(s: &str) -> Result<impl Iterator<Item = &str>, ParseParamError> {
    let (name, params) = match s.split_once(':') {
        Some((name, params)) => (name, Some(params)),
        None => (s, None),
    };

    if name.trim() != RULE_NAME {
        return Err(ParseParamError::UnknownRule(name.into()));
    }

    Ok(params
        .into_iter()
        .flat_map(|params| params.split(','))
        .filter(|param| !param.trim().is_empty()))
}
