//! Shared types for the booking action handlers: the agent-runtime wire
//! contract, records, the declarative operation tables of each domain,
//! errors and configuration.

pub mod config;
pub mod domain;
pub mod errors;

pub use domain::catalog::{Domain, UnknownDomain, BOOKING_KEY};
pub use domain::invocation::{Invocation, Parameter, ResponseEnvelope};
pub use domain::record::{AttributeValue, Record, RecordId};
pub use domain::schema::{
    ActionGroupDefinition, ActionTable, FieldSpec, FieldType, FunctionSchema, GeneratedField,
    GeneratedValue, OperationKind, OperationSpec, Presence,
};
pub use errors::{ApplicationError, InterfaceError, ValidationError};
