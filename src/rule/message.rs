//! Failure messages and their localisation.

use std::collections::HashMap;

/// Message key for a value that is not a valid domain.
pub const INVALID_DOMAIN: &str = "domain.invalid";
/// Message key for a domain without any DNS records.
pub const NO_DNS_RECORDS: &str = "domain.dns_records";
/// Message key for a domain without records of a required type.
pub const MISSING_RECORD_TYPE: &str = "domain.record_type";
/// Message key for a domain without a record carrying an expected value.
pub const RECORD_VALUE_MISMATCH: &str = "domain.record_value";

pub(crate) const INVALID_DOMAIN_TEMPLATE: &str = "The :attribute is not a valid domain.";
pub(crate) const NO_DNS_RECORDS_TEMPLATE: &str = "The :attribute must have valid DNS records.";
pub(crate) const MISSING_RECORD_TYPE_TEMPLATE: &str = "The :attribute must have a :type record.";
pub(crate) const RECORD_VALUE_MISMATCH_TEMPLATE: &str =
    "The :attribute must have a :type record with value :value.";

/// A source of localised messages.
///
/// Given a message key and the message parameters, a translator returns the
/// localised message, or `None` if it has no message for the key. In the
/// latter case the built-in English message is used.
pub trait Translate {
    /// Returns the localised message for the given key.
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> Option<String>;
}

impl<F> Translate for F
where
    F: Fn(&str, &[(&str, &str)]) -> Option<String>,
{
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> Option<String> {
        self(key, params)
    }
}

/// A message catalogue mapping keys to templates. Templates are interpolated
/// with [`interpolate`].
impl Translate for HashMap<String, String> {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> Option<String> {
        self.get(key).map(|template| interpolate(template, params))
    }
}

/// Substitutes `:name` placeholders in a template with parameter values.
///
/// Where several parameter names match at a position, the longest name wins.
/// Substituted values are not themselves scanned for placeholders. Colons not
/// followed by a parameter name are retained.
///
/// # Examples
///
/// ```
/// use viadomain::rule::message::interpolate;
///
/// let s = interpolate(":attribute needs :type: :types", &[("type", "MX"), ("types", "all")]);
///
/// assert_eq!(s, ":attribute needs MX: all");
/// ```
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(i) = rest.find(':') {
        result.push_str(&rest[..i]);

        let after = &rest[(i + 1)..];

        let param = params
            .iter()
            .filter(|(name, _)| !name.is_empty() && after.starts_with(name))
            .max_by_key(|(name, _)| name.len());

        match param {
            Some((name, value)) => {
                result.push_str(value);
                rest = &after[name.len()..];
            }
            None => {
                result.push(':');
                rest = after;
            }
        }
    }

    result.push_str(rest);

    result
}
