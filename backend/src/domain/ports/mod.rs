//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`TransactionProvider`], [`PaymentRepository`],
//! [`EnumRepository`]) are implemented by outbound adapters. Driving ports
//! ([`PaymentsQuery`], [`PaymentsCommand`]) are what inbound adapters call.

mod enum_repository;
mod payment_repository;
mod payments_command;
mod payments_query;
mod transaction_provider;

#[cfg(test)]
pub use enum_repository::MockEnumRepository;
pub use enum_repository::{EnumRepository, FixtureEnumRepository};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{FixturePaymentRepository, PaymentRepository};
#[cfg(test)]
pub use payments_command::MockPaymentsCommand;
pub use payments_command::PaymentsCommand;
#[cfg(test)]
pub use payments_query::MockPaymentsQuery;
pub use payments_query::PaymentsQuery;
pub use transaction_provider::{
    FixtureTransaction, FixtureTransactionProvider, TransactionCounts, TransactionHandle,
    TransactionProvider,
};
