use hickory_resolver::TokioAsyncResolver;
use std::{env, process};
use viadomain::{DomainRule, DomainValidator};

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt::try_init();

    let mut args = env::args();

    let program = args.next();

    let (domain, params) = match (args.next(), args.next(), args.next()) {
        (Some(domain), params, None) => (domain, params),
        _ => {
            eprintln!("usage: {} DOMAIN [a,aaaa,cname,txt,mx,dns]", program.as_deref().unwrap_or("domaincheck"));
            process::exit(1);
        }
    };

    let rule = match params {
        Some(params) => DomainRule::from_params(params.split(',')),
        None => DomainRule::new(),
    };

    let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
        eprintln!("could not create resolver: {e}");
        process::exit(1);
    });

    let mut validator = DomainValidator::new(rule, resolver);

    if validator.passes("domain", &domain).await {
        println!("{domain}: ok");
    } else {
        println!("{domain}: {}", validator.message());
        process::exit(2);
    }
}
