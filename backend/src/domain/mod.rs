//! Domain primitives, services and ports.
//!
//! Purpose: hold the payment model and the transport-agnostic rules around
//! it. Nothing here knows about HTTP or SQL; adapters reach the domain only
//! through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — categorised failure shared by every port.
//! - Payment (alias to `payment::Payment`) — the payment aggregate.
//! - TransactionCoordinator — runs units of work inside store transactions.
//! - PaymentService — implements the payment driving ports.
//! - search — query parameter extraction into filters and pagination.

pub mod error;
pub mod payment;
pub mod payment_search;
pub mod payment_service;
pub mod ports;
pub mod search;
pub mod transaction;

pub use self::error::{
    DataAccessCode, Error, ErrorCategory, ErrorCode, ErrorValidationError, ExtraValue, GenericCode,
};
pub use self::payment::{
    AccountProvider, Address, EnumName, Monetary, Payment, PaymentId, PaymentParty,
};
pub use self::payment_search::{
    CREDITOR_ACCOUNT_NUMBER_FIELD, DEBTOR_ACCOUNT_NUMBER_FIELD, ID_FIELD, PaymentFilter,
    PaymentFilterStrategy, PaymentFilterValue, PaymentSearchRequest, PaymentSearchResponse,
};
pub use self::payment_service::PaymentService;
pub use self::transaction::TransactionCoordinator;
