use super::LookupRecords;
use crate::record::{RecordData, RecordType};
use trust_dns_resolver::{
    error::ResolveErrorKind,
    proto::rr::{self, RData},
    Name, TokioAsyncResolver,
};
use std::{
    future::Future,
    io::{self, ErrorKind},
    pin::Pin,
};

impl LookupRecords for TokioAsyncResolver {
    type Answer = Box<dyn Iterator<Item = io::Result<RecordData>>>;
    type Query<'a> = Pin<Box<dyn Future<Output = io::Result<Self::Answer>> + Send + 'a>>;

    fn lookup_records(&self, domain: &str, record_type: RecordType) -> Self::Query<'_> {
        let name = Name::from_ascii(domain);

        Box::pin(async move {
            let name = name.map_err(|_| ErrorKind::InvalidInput)?;

            let lookup = self
                .lookup(name, to_record_type(record_type))
                .await
                .map_err(|e| match e.kind() {
                    ResolveErrorKind::NoRecordsFound { .. } => io::Error::from(ErrorKind::NotFound),
                    _ => e.into(),
                })?;

            let records: Vec<_> = lookup.iter().filter_map(to_record_data).map(Ok).collect();

            let records: Box<dyn Iterator<Item = _>> = Box::new(records.into_iter());

            Ok(records)
        })
    }
}

fn to_record_type(record_type: RecordType) -> rr::RecordType {
    match record_type {
        RecordType::A => rr::RecordType::A,
        RecordType::Aaaa => rr::RecordType::AAAA,
        RecordType::Cname => rr::RecordType::CNAME,
        RecordType::Txt => rr::RecordType::TXT,
        RecordType::Mx => rr::RecordType::MX,
        RecordType::Ns => rr::RecordType::NS,
        RecordType::Soa => rr::RecordType::SOA,
    }
}

fn to_record_data(rdata: &RData) -> Option<RecordData> {
    let data = match rdata {
        RData::A(a) => RecordData::A(a.0),
        RData::AAAA(aaaa) => RecordData::Aaaa(aaaa.0),
        RData::CNAME(cname) => RecordData::Cname(cname.0.to_string().into()),
        RData::TXT(txt) => RecordData::Txt(txt.txt_data().join(&[][..]).into()),
        RData::MX(mx) => RecordData::Mx {
            preference: mx.preference(),
            exchange: mx.exchange().to_string().into(),
        },
        RData::NS(ns) => RecordData::Ns(ns.0.to_string().into()),
        RData::SOA(soa) => RecordData::Soa {
            mname: soa.mname().to_string().into(),
        },
        _ => return None,
    };
    Some(data)
}
