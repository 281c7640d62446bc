use thiserror::Error;

/// Routing and validation failures. The `Display` text of each variant is the
/// exact body returned to the agent runtime.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid function")]
    UnknownFunction { function: String },
    #[error("Missing required parameters")]
    MissingParameters { fields: Vec<&'static str> },
    #[error("Missing {field} parameter")]
    MissingParameter { field: &'static str },
    #[error("Invalid {field} parameter: expected an integer")]
    InvalidInteger { field: &'static str, value: String },
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownFunction { .. } => "routing",
            Self::MissingParameters { .. }
            | Self::MissingParameter { .. }
            | Self::InvalidInteger { .. } => "validation",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("malformed invocation: {0}")]
    MalformedInvocation(String),
    #[error("no action group named `{0}` is registered")]
    UnknownActionGroup(String),
    #[error("no domain named `{0}` is registered")]
    UnknownDomain(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "No action handler is registered for this request.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::MalformedInvocation(message) => {
                Self::BadRequest { message, correlation_id }
            }
            error @ (ApplicationError::UnknownActionGroup(_)
            | ApplicationError::UnknownDomain(_)) => {
                Self::NotFound { message: error.to_string(), correlation_id }
            }
            ApplicationError::Persistence(message) => {
                Self::ServiceUnavailable { message, correlation_id }
            }
            ApplicationError::Configuration(message) => Self::Internal { message, correlation_id },
        }
    }
}
