use std::{
    future::Future,
    io::{self, ErrorKind},
    pin::Pin,
    sync::{Arc, Mutex},
};
use viadomain::{LookupRecords, RecordData, RecordType};

pub type LookupOutput = Vec<io::Result<RecordData>>;
pub type LookupFuture<'a> = Pin<Box<dyn Future<Output = io::Result<LookupOutput>> + Send + 'a>>;

#[derive(Clone)]
pub struct MockLookup {
    lookup: Arc<dyn Fn(&str, RecordType) -> LookupFuture<'_> + Send + Sync>,
    queries: Arc<Mutex<Vec<(String, RecordType)>>>,
}

impl MockLookup {
    pub fn new(f: impl Fn(&str, RecordType) -> LookupFuture<'_> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Arc::new(f),
            queries: Default::default(),
        }
    }

    /// The queries received so far, in order.
    pub fn queries(&self) -> Vec<(String, RecordType)> {
        self.queries.lock().unwrap().clone()
    }
}

impl LookupRecords for MockLookup {
    type Answer = LookupOutput;
    type Query<'a> = Pin<Box<dyn Future<Output = io::Result<Self::Answer>> + Send + 'a>>;

    fn lookup_records(&self, domain: &str, record_type: RecordType) -> Self::Query<'_> {
        self.queries.lock().unwrap().push((domain.to_owned(), record_type));

        let domain = domain.to_owned();

        Box::pin(async move { (self.lookup)(&domain, record_type).await })
    }
}

/// A resolver serving a few fixed zones.
pub fn example_resolver() -> MockLookup {
    MockLookup::new(|name, record_type| {
        Box::pin(async move {
            let records = match (name, record_type) {
                ("example.com.", RecordType::A) => vec![RecordData::A([192, 0, 2, 10].into())],
                ("example.com.", RecordType::Aaaa) => {
                    vec![RecordData::Aaaa("2001:db8::10".parse().unwrap())]
                }
                ("example.com.", RecordType::Mx) => vec![
                    RecordData::Mx {
                        preference: 10,
                        exchange: "mail.example.com.".into(),
                    },
                    RecordData::Mx {
                        preference: 20,
                        exchange: "backup.example.net.".into(),
                    },
                ],
                ("example.com.", RecordType::Txt) => vec![
                    RecordData::Txt((*b"google-site-verification=abc123").into()),
                    RecordData::Txt((*b"v=spf1 mx -all").into()),
                ],
                ("www.example.com.", RecordType::Cname) => {
                    vec![RecordData::Cname("example.com.".into())]
                }
                ("resolver.example.net.", RecordType::A) => vec![
                    RecordData::A([8, 8, 4, 4].into()),
                    RecordData::A([8, 8, 8, 8].into()),
                ],
                ("nomx.example.org.", RecordType::A) => vec![RecordData::A([198, 51, 100, 1].into())],
                ("timeout.example.org.", _) => return Err(ErrorKind::TimedOut.into()),
                _ => return Err(ErrorKind::NotFound.into()),
            };
            Ok(records.into_iter().map(Ok).collect())
        })
    })
}
