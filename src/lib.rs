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

//! A library implementing a validation rule for domain names.
//!
//! The rule checks that a value is a syntactically valid domain name and,
//! optionally, that the domain has DNS records: records of any type, records
//! of specific types, or records carrying specific values.
//!
//! # Usage
//!
//! The type [`DomainRule`] is the entry point. A rule is configured once, with
//! builder methods or from declarative parameters such as `domain:a,mx`, and
//! is then evaluated against values with [`DomainRule::evaluate`], which
//! returns the cause of failure as a [`RuleFailure`]. Validation pipelines that
//! ask for a pass/fail answer first and for an explanatory message second can
//! use [`DomainValidator`] instead.
//!
//! DNS lookups go through the trait [`LookupRecords`]. Lookup failures of any
//! kind count as absent records; evaluation never fails with an error.
//!
//! The building blocks used by the rule are available separately: syntax
//! checking in module `format`, and the individual DNS checks in module `dns`.
//!
//! # Cargo features
//!
//! The feature **`hickory-resolver`** makes an implementation of
//! [`LookupRecords`] available for the Hickory DNS resolver.
//!
//! The feature **`trust-dns-resolver`** makes an implementation of
//! [`LookupRecords`] available for the Trust-DNS resolver.

pub mod dns;
pub mod format;
pub mod lookup;
pub mod record;
pub mod rule;
mod util;

pub use crate::{
    format::is_valid_format,
    lookup::LookupRecords,
    record::{RecordData, RecordType},
    rule::{Config, DomainRule, DomainValidator, ExpectedValues, RuleFailure, Translate},
    util::CanonicalStr,
};
