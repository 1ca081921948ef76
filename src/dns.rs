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

//! DNS record checks.
//!
//! The checks in this module never fail with an error: a failed lookup
//! (NXDOMAIN, timeout, unusable domain, any other resolver error) counts as
//! an answer without records. Lookups are performed one after the other.

use crate::{
    lookup::LookupRecords,
    record::{RecordData, RecordType},
    rule::Config,
};
use std::io::{self, ErrorKind};
use tokio::time;
use tracing::trace;

/// Returns whether the domain has at least one DNS record of any common type.
///
/// The types in [`RecordType::ALL`] are queried in order, stopping at the first
/// type for which records exist.
pub async fn has_any_dns_record<T>(resolver: &T, domain: &str, config: &Config) -> bool
where
    T: LookupRecords + ?Sized,
{
    for record_type in RecordType::ALL {
        if has_record_of_type(resolver, domain, record_type, config).await {
            return true;
        }
    }

    trace!(%domain, "no DNS records of any type");

    false
}

/// Returns whether the domain has at least one DNS record of the given type.
pub async fn has_record_of_type<T>(
    resolver: &T,
    domain: &str,
    record_type: RecordType,
    config: &Config,
) -> bool
where
    T: LookupRecords + ?Sized,
{
    !look_up_records(resolver, domain, record_type, config)
        .await
        .is_empty()
}

/// Returns whether the domain has at least one DNS record of the given type,
/// where the type is given textually (case-insensitive, eg `"mx"`).
///
/// An unknown record type yields `false`.
pub async fn has_record_of_type_str<T>(
    resolver: &T,
    domain: &str,
    record_type: &str,
    config: &Config,
) -> bool
where
    T: LookupRecords + ?Sized,
{
    match record_type.parse() {
        Ok(record_type) => has_record_of_type(resolver, domain, record_type, config).await,
        Err(_) => {
            trace!(%domain, record_type, "unknown record type");
            false
        }
    }
}

/// Returns whether one of the domain’s DNS records of the given type carries
/// the expected value.
///
/// Values are compared after normalisation with [`normalize_value`]. Only
/// record types with a comparable value are supported (see
/// [`RecordType::has_comparable_value`]); for other types, the result is
/// always `false`.
///
/// # Examples
///
/// ```
/// # use std::{future::Future, io, pin::Pin};
/// # use viadomain::{LookupRecords, RecordData, RecordType};
/// # struct MockLookup;
/// # impl LookupRecords for MockLookup {
/// #     type Answer = Vec<io::Result<RecordData>>;
/// #     type Query<'a> = Pin<Box<dyn Future<Output = io::Result<Self::Answer>> + Send + 'a>>;
/// #
/// #     fn lookup_records(&self, _: &str, _: RecordType) -> Self::Query<'_> {
/// #         Box::pin(async {
/// #             Ok(vec![Ok(RecordData::Mx { preference: 10, exchange: "Mail.Example.COM.".into() })])
/// #         })
/// #     }
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use viadomain::{dns, Config};
///
/// let resolver;  // = TokioAsyncResolver::tokio(...);
/// # resolver = MockLookup;
/// let config = Config::default();
///
/// assert!(dns::record_matches_value(&resolver, "example.com", RecordType::Mx, "mail.example.com", &config).await);
/// assert!(!dns::record_matches_value(&resolver, "example.com", RecordType::Mx, "mx.example.com", &config).await);
/// # });
/// ```
pub async fn record_matches_value<T>(
    resolver: &T,
    domain: &str,
    record_type: RecordType,
    expected: &str,
    config: &Config,
) -> bool
where
    T: LookupRecords + ?Sized,
{
    record_matches_any_value(resolver, domain, record_type, &[expected], config).await
}

pub(crate) async fn record_matches_any_value<T, S>(
    resolver: &T,
    domain: &str,
    record_type: RecordType,
    expected: &[S],
    config: &Config,
) -> bool
where
    T: LookupRecords + ?Sized,
    S: AsRef<str>,
{
    if !record_type.has_comparable_value() {
        trace!(%domain, %record_type, "record type has no comparable value");
        return false;
    }

    let records = look_up_records(resolver, domain, record_type, config).await;

    if records.is_empty() {
        return false;
    }

    let expected: Vec<_> = expected.iter().map(|v| normalize_value(v.as_ref())).collect();

    for value in records.iter().filter_map(RecordData::comparable_value) {
        let value = normalize_value(&value);
        if expected.contains(&value) {
            trace!(%domain, %record_type, %value, "record value matched");
            return true;
        }
    }

    trace!(%domain, %record_type, "no record value matched");

    false
}

/// Normalises a record value for comparison: the value is lower-cased, and a
/// single trailing dot is removed.
///
/// # Examples
///
/// ```
/// use viadomain::dns::normalize_value;
///
/// assert_eq!(normalize_value("Example.COM."), normalize_value("example.com"));
/// ```
pub fn normalize_value(value: &str) -> String {
    let value = value.to_lowercase();
    match value.strip_suffix('.') {
        Some(s) => s.into(),
        None => value,
    }
}

async fn look_up_records<T>(
    resolver: &T,
    domain: &str,
    record_type: RecordType,
    config: &Config,
) -> Vec<RecordData>
where
    T: LookupRecords + ?Sized,
{
    match try_look_up_records(resolver, domain, record_type, config).await {
        Ok(records) => {
            trace!(%domain, %record_type, "{} records found", records.len());
            records
        }
        Err(e) => {
            trace!(%domain, %record_type, kind = ?e.kind(), "DNS lookup failed: {e}");
            vec![]
        }
    }
}

async fn try_look_up_records<T>(
    resolver: &T,
    domain: &str,
    record_type: RecordType,
    config: &Config,
) -> io::Result<Vec<RecordData>>
where
    T: LookupRecords + ?Sized,
{
    let name = to_lookup_name(domain)?;

    trace!(%name, %record_type, "looking up DNS records");

    let query = resolver.lookup_records(&name, record_type);

    let answer = match config.lookup_timeout {
        Some(duration) => match time::timeout(duration, query).await {
            Ok(r) => r?,
            Err(e) => return Err(e.into()),
        },
        None => query.await?,
    };

    let mut records = vec![];

    for record in answer {
        match record {
            Ok(data) if data.record_type() == record_type => records.push(data),
            Ok(_) => {}
            Err(e) => {
                trace!(%name, %record_type, "skipping unusable record: {e}");
            }
        }
    }

    Ok(records)
}

// Note the trailing dot: only absolute queries.
fn to_lookup_name(domain: &str) -> io::Result<String> {
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    let mut name = idna::domain_to_ascii(domain).map_err(|_| io::Error::from(ErrorKind::InvalidInput))?;

    if name.is_empty() {
        return Err(ErrorKind::InvalidInput.into());
    }

    name.push('.');

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        future::Future,
        pin::Pin,
        sync::{Arc, Mutex},
        time::Duration,
    };

    #[derive(Clone, Default)]
    struct MockLookup {
        queries: Arc<Mutex<Vec<(String, RecordType)>>>,
    }

    impl MockLookup {
        fn queries(&self) -> Vec<(String, RecordType)> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl LookupRecords for MockLookup {
        type Answer = Vec<io::Result<RecordData>>;
        type Query<'a> = Pin<Box<dyn Future<Output = io::Result<Self::Answer>> + Send + 'a>>;

        fn lookup_records(&self, domain: &str, record_type: RecordType) -> Self::Query<'_> {
            self.queries.lock().unwrap().push((domain.to_owned(), record_type));

            let domain = domain.to_owned();

            Box::pin(async move {
                match (domain.as_str(), record_type) {
                    ("example.com.", RecordType::A) => Ok(vec![
                        Ok(RecordData::Cname("alias.example.com.".into())),
                        Ok(RecordData::A([192, 0, 2, 1].into())),
                        Ok(RecordData::A([192, 0, 2, 2].into())),
                    ]),
                    ("alias.example.com.", RecordType::A) => {
                        Ok(vec![Ok(RecordData::Cname("example.com.".into()))])
                    }
                    ("example.com.", RecordType::Txt) => Ok(vec![
                        Err(ErrorKind::InvalidData.into()),
                        Ok(RecordData::Txt((*b"v=spf1 -all").into())),
                    ]),
                    ("example.com.", RecordType::Ns) => {
                        Ok(vec![Ok(RecordData::Ns("ns1.example.com.".into()))])
                    }
                    ("mail.example.org.", RecordType::Mx) => Ok(vec![Ok(RecordData::Mx {
                        preference: 10,
                        exchange: "MX.Example.ORG.".into(),
                    })]),
                    ("mail.example.org.", RecordType::Soa) => Ok(vec![Ok(RecordData::Soa {
                        mname: "ns.example.org.".into(),
                    })]),
                    ("xn--blbr-roah.example.no.", RecordType::A) => {
                        Ok(vec![Ok(RecordData::A([198, 51, 100, 7].into()))])
                    }
                    ("slow.example.com.", _) => {
                        time::sleep(Duration::from_secs(60)).await;
                        Ok(vec![Ok(RecordData::A([192, 0, 2, 9].into()))])
                    }
                    ("timeout.example.com.", _) => Err(ErrorKind::TimedOut.into()),
                    _ => Err(ErrorKind::NotFound.into()),
                }
            })
        }
    }

    #[tokio::test]
    async fn any_dns_record_short_circuits() {
        let resolver = MockLookup::default();
        let config = Config::default();

        assert!(has_any_dns_record(&resolver, "example.com", &config).await);
        assert_eq!(resolver.queries(), [("example.com.".to_owned(), RecordType::A)]);
    }

    #[tokio::test]
    async fn any_dns_record_queries_types_in_order() {
        let resolver = MockLookup::default();
        let config = Config::default();

        assert!(has_any_dns_record(&resolver, "mail.example.org", &config).await);

        let types: Vec<_> = resolver.queries().into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            types,
            [RecordType::A, RecordType::Aaaa, RecordType::Cname, RecordType::Txt, RecordType::Mx]
        );
    }

    #[tokio::test]
    async fn any_dns_record_absent() {
        let resolver = MockLookup::default();
        let config = Config::default();

        assert!(!has_any_dns_record(&resolver, "nonexistent.example", &config).await);
        assert!(!has_any_dns_record(&resolver, "timeout.example.com", &config).await);
        assert_eq!(resolver.queries().len(), 2 * RecordType::ALL.len());
    }

    #[tokio::test]
    async fn record_of_type() {
        let resolver = MockLookup::default();
        let config = Config::default();

        assert!(has_record_of_type(&resolver, "example.com", RecordType::A, &config).await);
        assert!(has_record_of_type(&resolver, "example.com", RecordType::Ns, &config).await);
        assert!(has_record_of_type(&resolver, "mail.example.org", RecordType::Soa, &config).await);

        // Records of other types in the answer do not count.
        assert!(!has_record_of_type(&resolver, "alias.example.com", RecordType::A, &config).await);

        assert!(!has_record_of_type(&resolver, "example.com", RecordType::Cname, &config).await);
        assert!(!has_record_of_type(&resolver, "example.com", RecordType::Mx, &config).await);
        assert!(!has_record_of_type(&resolver, "timeout.example.com", RecordType::A, &config).await);
    }

    #[tokio::test]
    async fn record_of_type_str() {
        let resolver = MockLookup::default();
        let config = Config::default();

        assert!(has_record_of_type_str(&resolver, "example.com", "a", &config).await);
        assert!(has_record_of_type_str(&resolver, "mail.example.org", "Mx", &config).await);

        assert!(!has_record_of_type_str(&resolver, "example.com", "spf", &config).await);
        assert!(!has_record_of_type_str(&resolver, "example.com", "", &config).await);
        assert_eq!(resolver.queries().len(), 2);
    }

    #[tokio::test]
    async fn record_value_match() {
        let resolver = MockLookup::default();
        let config = Config::default();

        assert!(record_matches_value(&resolver, "example.com", RecordType::A, "192.0.2.2", &config).await);
        assert!(!record_matches_value(&resolver, "example.com", RecordType::A, "192.0.2.3", &config).await);

        assert!(record_matches_value(&resolver, "example.com", RecordType::Txt, "V=SPF1 -ALL", &config).await);

        assert!(record_matches_value(&resolver, "mail.example.org", RecordType::Mx, "mx.example.org", &config).await);
        assert!(record_matches_value(&resolver, "mail.example.org", RecordType::Mx, "mx.example.org.", &config).await);
        assert!(!record_matches_value(&resolver, "mail.example.org", RecordType::Mx, "example.org", &config).await);

        assert!(!record_matches_value(&resolver, "example.com", RecordType::Aaaa, "::1", &config).await);
    }

    #[tokio::test]
    async fn record_value_match_unsupported_type() {
        let resolver = MockLookup::default();
        let config = Config::default();

        assert!(!record_matches_value(&resolver, "example.com", RecordType::Ns, "ns1.example.com", &config).await);
        assert!(resolver.queries().is_empty());
    }

    #[tokio::test]
    async fn record_value_match_any() {
        let resolver = MockLookup::default();
        let config = Config::default();

        let expected = ["192.0.2.7", "192.0.2.1"];
        assert!(record_matches_any_value(&resolver, "example.com", RecordType::A, &expected, &config).await);

        let expected = ["192.0.2.7", "192.0.2.8"];
        assert!(!record_matches_any_value(&resolver, "example.com", RecordType::A, &expected, &config).await);
    }

    #[tokio::test]
    async fn lookup_uses_a_labels() {
        let resolver = MockLookup::default();
        let config = Config::default();

        assert!(has_record_of_type(&resolver, "Blåbær.example.no", RecordType::A, &config).await);
        assert_eq!(
            resolver.queries(),
            [("xn--blbr-roah.example.no.".to_owned(), RecordType::A)]
        );
    }

    #[tokio::test]
    async fn lookup_timeout() {
        let resolver = MockLookup::default();
        let config = Config {
            lookup_timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };

        time::pause();

        assert!(!has_record_of_type(&resolver, "slow.example.com", RecordType::A, &config).await);

        let config = Config::default();

        assert!(has_record_of_type(&resolver, "slow.example.com", RecordType::A, &config).await);

        time::resume();
    }

    #[test]
    fn normalize_values() {
        assert_eq!(normalize_value("Example.COM."), "example.com");
        assert_eq!(normalize_value("example.com"), "example.com");
        assert_eq!(normalize_value("example.com.."), "example.com.");
        assert_eq!(normalize_value("."), "");
    }

    #[test]
    fn lookup_names() {
        assert_eq!(to_lookup_name("example.com").unwrap(), "example.com.");
        assert_eq!(to_lookup_name("Example.COM.").unwrap(), "example.com.");

        assert_eq!(to_lookup_name("").unwrap_err().kind(), ErrorKind::InvalidInput);
    }
}
