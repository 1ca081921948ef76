// viadomain – validation of domain names and their DNS records
// Copyright © 2022–2023 David Bürgin <dbuergin@gluet.ch>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.

//! The domain rule and supporting types.

pub mod message;
pub mod params;

pub use message::Translate;
pub use params::{ParseParamError, RuleParam};

use crate::{
    dns,
    format::{self, is_valid_format},
    lookup::LookupRecords,
    record::RecordType,
    util::CanonicalStr,
};
use std::{
    any::Any,
    error::Error,
    fmt::{self, Display, Formatter},
    time::Duration,
};
use tracing::debug;

/// Configuration for domain rule evaluation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The maximum duration of a single DNS lookup. When this duration is
    /// exceeded, the lookup counts as having found no records. When `None`,
    /// the resolver’s own timeout applies.
    pub lookup_timeout: Option<Duration>,

    /// How several expected values for the same record type are combined.
    pub expected_values: ExpectedValues,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookup_timeout: None,
            expected_values: ExpectedValues::LastWins,
        }
    }
}

/// Treatment of several expected values given for one record type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ExpectedValues {
    /// Only the value given last is required; earlier values are replaced.
    #[default]
    LastWins,
    /// Any one of the values given is required.
    AnyOf,
}

/// The cause of a failed domain rule evaluation.
///
/// Evaluation stops at the first failed check, so a failure reports only the
/// first requirement the value did not meet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuleFailure {
    /// The value is not a syntactically valid domain name.
    InvalidFormat,
    /// DNS records were required, but none were found.
    NoDnsRecords,
    /// Records of the given type were required, but none were found.
    MissingRecordType(RecordType),
    /// No record of the given type carries the expected value.
    RecordValueMismatch(RecordType, Box<str>),
}

impl RuleFailure {
    /// Returns the key under which a localised message for this failure is
    /// looked up.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::InvalidFormat => message::INVALID_DOMAIN,
            Self::NoDnsRecords => message::NO_DNS_RECORDS,
            Self::MissingRecordType(_) => message::MISSING_RECORD_TYPE,
            Self::RecordValueMismatch(..) => message::RECORD_VALUE_MISMATCH,
        }
    }

    /// Returns the user-facing message for this failure of the given
    /// attribute.
    ///
    /// If a translator is given and has a message for this failure’s key, that
    /// message is returned, else the built-in English message. The parameters
    /// passed to the translator are `attribute`, and `type` and `value` where
    /// applicable.
    pub fn message(&self, attribute: &str, translator: Option<&dyn Translate>) -> String {
        let mut params = vec![("attribute", attribute)];
        match self {
            Self::InvalidFormat | Self::NoDnsRecords => {}
            Self::MissingRecordType(record_type) => {
                params.push(("type", record_type.canonical_str()));
            }
            Self::RecordValueMismatch(record_type, value) => {
                params.push(("type", record_type.canonical_str()));
                params.push(("value", &**value));
            }
        }

        translator
            .and_then(|t| t.translate(self.message_key(), &params))
            .unwrap_or_else(|| message::interpolate(self.default_template(), &params))
    }

    fn default_template(&self) -> &'static str {
        match self {
            Self::InvalidFormat => message::INVALID_DOMAIN_TEMPLATE,
            Self::NoDnsRecords => message::NO_DNS_RECORDS_TEMPLATE,
            Self::MissingRecordType(_) => message::MISSING_RECORD_TYPE_TEMPLATE,
            Self::RecordValueMismatch(..) => message::RECORD_VALUE_MISMATCH_TEMPLATE,
        }
    }
}

impl Display for RuleFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "not a valid domain"),
            Self::NoDnsRecords => write!(f, "no DNS records found"),
            Self::MissingRecordType(t) => write!(f, "no {t} record found"),
            Self::RecordValueMismatch(t, value) => write!(f, "no {t} record with value {value} found"),
        }
    }
}

impl Error for RuleFailure {}

/// A rule validating domain names, with optional DNS requirements.
///
/// A rule is configured once, either with the builder methods or from
/// declarative parameters, and can then be evaluated any number of times.
///
/// # Examples
///
/// ```
/// # use std::{future::Future, io::{self, ErrorKind}, pin::Pin};
/// # use viadomain::{LookupRecords, RecordData, RecordType};
/// # struct MockLookup;
/// # impl LookupRecords for MockLookup {
/// #     type Answer = Vec<io::Result<RecordData>>;
/// #     type Query<'a> = Pin<Box<dyn Future<Output = io::Result<Self::Answer>> + Send + 'a>>;
/// #
/// #     fn lookup_records(&self, domain: &str, record_type: RecordType) -> Self::Query<'_> {
/// #         let result: io::Result<Self::Answer> = match (domain, record_type) {
/// #             ("example.com.", RecordType::A) => Ok(vec![Ok(RecordData::A([8, 8, 8, 8].into()))]),
/// #             _ => Err(ErrorKind::NotFound.into()),
/// #         };
/// #         Box::pin(async move { result })
/// #     }
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use viadomain::{DomainRule, RuleFailure};
///
/// // Note: Enable Cargo feature `hickory-resolver` to make an implementation
/// // of trait `LookupRecords` available for Hickory DNS’s `TokioAsyncResolver`.
/// let resolver;  // = TokioAsyncResolver::tokio_from_system_conf()?;
/// # resolver = MockLookup;
///
/// let rule = DomainRule::new().require_a(Some("8.8.8.8"));
///
/// assert_eq!(rule.evaluate(&resolver, "example.com").await, Ok(()));
///
/// let rule = rule.require_mx(None);
///
/// let failure = rule.evaluate(&resolver, "example.com").await.unwrap_err();
///
/// assert_eq!(failure, RuleFailure::MissingRecordType(RecordType::Mx));
/// assert_eq!(
///     failure.message("website", None),
///     "The website must have a MX record."
/// );
/// # });
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DomainRule {
    require_any_dns: bool,
    // insertion order, without duplicates
    required_types: Vec<RecordType>,
    // insertion order of the record type, values in order given (non-empty)
    expected_values: Vec<(RecordType, Vec<Box<str>>)>,
    config: Config,
}

impl DomainRule {
    /// Creates a rule that checks the domain name syntax only.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a rule from positional parameters (eg `["a", "mx"]`).
    ///
    /// Parameters are trimmed and compared case-insensitively. Unknown
    /// parameters are ignored.
    pub fn from_params<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rule = Self::new();

        for param in params {
            match param.as_ref().parse() {
                Ok(param) => rule = rule.with_param(param),
                Err(e) => {
                    debug!("ignoring rule parameter: {e}");
                }
            }
        }

        rule
    }

    /// Creates a rule from positional parameters, failing on the first unknown
    /// parameter.
    pub fn try_from_params<I, S>(params: I) -> Result<Self, ParseParamError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        params
            .into_iter()
            .try_fold(Self::new(), |rule, param| Ok(rule.with_param(param.as_ref().parse()?)))
    }

    /// Creates a rule from a declarative rule string such as `domain:a,mx`.
    ///
    /// Unknown parameters are ignored, but the rule name must be `domain`.
    pub fn from_rule_str(s: &str) -> Result<Self, ParseParamError> {
        params::split_rule_str(s).map(Self::from_params)
    }

    /// Sets the configuration used when evaluating this rule.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Adds a requirement given as a positional parameter.
    pub fn with_param(self, param: RuleParam) -> Self {
        match param {
            RuleParam::Record(record_type) => self.require_record(record_type, None),
            RuleParam::Dns => self.require_dns(),
        }
    }

    /// Requires the domain to have DNS records of any common type.
    pub fn require_dns(mut self) -> Self {
        self.require_any_dns = true;
        self
    }

    /// Requires the domain to have records of the given type.
    ///
    /// Without a value, records of the type must exist; requiring the same type
    /// again has no effect. With a value, one of the records must carry that
    /// value. Several values given for the same type are combined as
    /// configured in [`Config::expected_values`]; by default, the value given
    /// last replaces earlier ones.
    pub fn require_record(mut self, record_type: RecordType, value: Option<&str>) -> Self {
        match value {
            None => {
                if !self.required_types.contains(&record_type) {
                    self.required_types.push(record_type);
                }
            }
            Some(value) => {
                match self.expected_values.iter_mut().find(|(t, _)| *t == record_type) {
                    Some((_, values)) => values.push(value.into()),
                    None => self.expected_values.push((record_type, vec![value.into()])),
                }
            }
        }
        self
    }

    /// Requires A records, optionally with the given IPv4 address.
    pub fn require_a(self, value: Option<&str>) -> Self {
        self.require_record(RecordType::A, value)
    }

    /// Requires AAAA records, optionally with the given IPv6 address.
    pub fn require_aaaa(self, value: Option<&str>) -> Self {
        self.require_record(RecordType::Aaaa, value)
    }

    /// Requires CNAME records, optionally with the given target.
    pub fn require_cname(self, value: Option<&str>) -> Self {
        self.require_record(RecordType::Cname, value)
    }

    /// Requires TXT records, optionally with the given text.
    pub fn require_txt(self, value: Option<&str>) -> Self {
        self.require_record(RecordType::Txt, value)
    }

    /// Requires MX records, optionally with the given mail exchange.
    pub fn require_mx(self, value: Option<&str>) -> Self {
        self.require_record(RecordType::Mx, value)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn requires_dns(&self) -> bool {
        self.require_any_dns
    }

    /// Returns the record types required to exist, in the order given.
    pub fn required_types(&self) -> &[RecordType] {
        &self.required_types
    }

    /// Returns the expected values that evaluation checks, per record type.
    pub fn expected_values(&self) -> Vec<(RecordType, Vec<&str>)> {
        self.expected_values
            .iter()
            .map(|(t, values)| (*t, self.effective_values(values)))
            .collect()
    }

    /// Returns whether evaluating this rule performs DNS lookups.
    pub fn needs_lookups(&self) -> bool {
        self.require_any_dns || !self.required_types.is_empty() || !self.expected_values.is_empty()
    }

    fn effective_values<'a>(&self, values: &'a [Box<str>]) -> Vec<&'a str> {
        match self.config.expected_values {
            ExpectedValues::LastWins => values.last().map(|v| &**v).into_iter().collect(),
            ExpectedValues::AnyOf => values.iter().map(|v| &**v).collect(),
        }
    }

    /// Evaluates this rule for the given value.
    ///
    /// The checks are performed in a fixed order, stopping at the first
    /// failure: domain name syntax, presence of any DNS records, presence of
    /// records of the required types, and finally records with the expected
    /// values. A rule without DNS requirements performs no lookups.
    pub async fn evaluate<T>(&self, resolver: &T, value: &str) -> Result<(), RuleFailure>
    where
        T: LookupRecords + ?Sized,
    {
        let result = self.check(resolver, value).await;

        if let Err(e) = &result {
            debug!(domain = value, "domain rule failed: {e}");
        }

        result
    }

    /// Evaluates this rule for the given dynamically typed value.
    ///
    /// Values other than strings fail the syntax check.
    pub async fn evaluate_value<T>(
        &self,
        resolver: &T,
        value: &(dyn Any + Sync),
    ) -> Result<(), RuleFailure>
    where
        T: LookupRecords + ?Sized,
    {
        match format::as_str(value) {
            Some(value) => self.evaluate(resolver, value).await,
            None => {
                debug!("domain rule failed: value is not a string");
                Err(RuleFailure::InvalidFormat)
            }
        }
    }

    async fn check<T>(&self, resolver: &T, domain: &str) -> Result<(), RuleFailure>
    where
        T: LookupRecords + ?Sized,
    {
        if !is_valid_format(domain) {
            return Err(RuleFailure::InvalidFormat);
        }

        let config = &self.config;

        if self.require_any_dns && !dns::has_any_dns_record(resolver, domain, config).await {
            return Err(RuleFailure::NoDnsRecords);
        }

        for &record_type in &self.required_types {
            if !dns::has_record_of_type(resolver, domain, record_type, config).await {
                return Err(RuleFailure::MissingRecordType(record_type));
            }
        }

        for (record_type, values) in &self.expected_values {
            let values = self.effective_values(values);

            if !dns::record_matches_any_value(resolver, domain, *record_type, &values[..], config).await {
                return Err(RuleFailure::RecordValueMismatch(*record_type, values.join(" or ").into()));
            }
        }

        Ok(())
    }
}

/// A domain rule bound to a resolver, remembering the message of the last
/// failed evaluation.
///
/// This is the shape expected by validation pipelines that first ask whether
/// a value passes, and then for the message explaining why it did not.
pub struct DomainValidator<T> {
    rule: DomainRule,
    resolver: T,
    translator: Option<Box<dyn Translate + Send + Sync>>,
    message: String,
}

impl<T: LookupRecords> DomainValidator<T> {
    pub fn new(rule: DomainRule, resolver: T) -> Self {
        Self {
            rule,
            resolver,
            translator: None,
            message: String::new(),
        }
    }

    /// Sets the translator used for localised messages.
    pub fn with_translator<U>(mut self, translator: U) -> Self
    where
        U: Translate + Send + Sync + 'static,
    {
        self.translator = Some(Box::new(translator));
        self
    }

    pub fn rule(&self) -> &DomainRule {
        &self.rule
    }

    /// Determines whether the value of the given attribute passes the rule.
    ///
    /// The message of a previous evaluation is cleared; on failure, the new
    /// message is available from [`message`][Self::message].
    pub async fn passes(&mut self, attribute: &str, value: &str) -> bool {
        self.message.clear();

        let result = self.rule.evaluate(&self.resolver, value).await;

        self.record(attribute, result)
    }

    /// Like [`passes`][Self::passes], for a dynamically typed value.
    pub async fn passes_value(&mut self, attribute: &str, value: &(dyn Any + Sync)) -> bool {
        self.message.clear();

        let result = self.rule.evaluate_value(&self.resolver, value).await;

        self.record(attribute, result)
    }

    /// Returns the message of the last failed evaluation, or the empty string
    /// if the last evaluation passed or there was none yet.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn record(&mut self, attribute: &str, result: Result<(), RuleFailure>) -> bool {
        match result {
            Ok(()) => true,
            Err(failure) => {
                let translator = self.translator.as_deref().map(|t| t as &dyn Translate);
                self.message = failure.message(attribute, translator);
                false
            }
        }
    }
}
