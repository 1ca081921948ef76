//! Resolver abstraction.

#[cfg(feature = "hickory-resolver")]
mod hickory_resolver;
#[cfg(feature = "trust-dns-resolver")]
mod trust_dns_resolver;

use crate::record::{RecordData, RecordType};
use std::{future::Future, io};

/// A trait for looking up DNS records of a given type.
///
/// The error type used here is `std::io::Error`. The following error kinds on
/// the query result are recognised and logged as such, but every error is
/// treated the same as an empty answer.
///
/// * `ErrorKind::InvalidInput` on the query: the domain argument could not be used
/// * `ErrorKind::NotFound` on the query: NXDOMAIN, no records found
/// * `ErrorKind::TimedOut` on the query: timeout
///
/// The inner, per-record `std::io::Error` can be used to signal errors
/// (unsupported or malformed data) with individual records; such records are
/// skipped.
pub trait LookupRecords: Send + Sync {
    /// The answer consisting of the records found.
    type Answer: IntoIterator<Item = io::Result<RecordData>>;
    /// The future resolving to the query’s answer.
    type Query<'a>: Future<Output = io::Result<Self::Answer>> + Send + 'a
    where
        Self: 'a;

    /// Looks up the domain’s records of the given type in DNS.
    ///
    /// The domain will be passed to this trait as an absolute name in
    /// A-label (ASCII) format, with trailing dot (eg `www.example.com.`).
    ///
    /// Answers may include records of other types (for example, the CNAME
    /// records of an alias chain); these are ignored by the caller.
    fn lookup_records(&self, domain: &str, record_type: RecordType) -> Self::Query<'_>;
}
