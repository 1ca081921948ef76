//! DNS record types and record data.

use crate::util::CanonicalStr;
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

/// A DNS record type known to the domain rule.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Txt,
    Mx,
    Ns,
    Soa,
}

impl RecordType {
    /// All record types, in the order in which they are queried when any DNS
    /// record is required.
    pub const ALL: [Self; 7] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Txt,
        Self::Mx,
        Self::Ns,
        Self::Soa,
    ];

    /// Returns whether record values of this type can be compared with an
    /// expected value.
    ///
    /// Only for these types is it known which field of a record carries the
    /// comparable value.
    pub fn has_comparable_value(self) -> bool {
        matches!(self, Self::A | Self::Aaaa | Self::Cname | Self::Mx | Self::Txt)
    }
}

impl CanonicalStr for RecordType {
    fn canonical_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Soa => "SOA",
        }
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseRecordTypeError;

impl Display for ParseRecordTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record type")
    }
}

impl Error for ParseRecordTypeError {}

impl FromStr for RecordType {
    type Err = ParseRecordTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| s.eq_ignore_ascii_case(t.canonical_str()))
            .ok_or(ParseRecordTypeError)
    }
}

/// The data of a DNS record, as delivered by a resolver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(Box<str>),
    Txt(Box<[u8]>),
    Mx { preference: u16, exchange: Box<str> },
    Ns(Box<str>),
    Soa { mname: Box<str> },
}

impl RecordData {
    /// Returns the type of this record.
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A(_) => RecordType::A,
            Self::Aaaa(_) => RecordType::Aaaa,
            Self::Cname(_) => RecordType::Cname,
            Self::Txt(_) => RecordType::Txt,
            Self::Mx { .. } => RecordType::Mx,
            Self::Ns(_) => RecordType::Ns,
            Self::Soa { .. } => RecordType::Soa,
        }
    }

    /// Returns the value of this record that is compared with expected
    /// values: the address of A and AAAA records, the target of CNAME records,
    /// the exchange of MX records, and the text of TXT records.
    ///
    /// NS and SOA records have no comparable value. TXT data that is not valid
    /// UTF-8 is compared lossily.
    pub fn comparable_value(&self) -> Option<String> {
        match self {
            Self::A(addr) => Some(addr.to_string()),
            Self::Aaaa(addr) => Some(addr.to_string()),
            Self::Cname(target) => Some(target.as_ref().into()),
            Self::Txt(txt) => Some(String::from_utf8_lossy(txt).into_owned()),
            Self::Mx { exchange, .. } => Some(exchange.as_ref().into()),
            Self::Ns(_) | Self::Soa { .. } => None,
        }
    }
}
