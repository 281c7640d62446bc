use serde::{Deserialize, Serialize};

pub const DEFAULT_MESSAGE_VERSION: &str = "1.0";

/// One `{name, value}` argument as sent by the agent runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Type hint advertised to the agent runtime; never trusted for parsing.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), type_hint: None, value: value.into() }
    }
}

/// A single named function call delivered by the agent runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    #[serde(default)]
    pub action_group: String,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default = "default_message_version")]
    pub message_version: String,
}

fn default_message_version() -> String {
    DEFAULT_MESSAGE_VERSION.to_string()
}

impl Invocation {
    pub fn new(action_group: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            action_group: action_group.into(),
            function: function.into(),
            parameters: Vec::new(),
            message_version: default_message_version(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(name, value));
        self
    }

    /// First parameter whose name matches exactly. Case-sensitive.
    pub fn named_parameter(&self, name: &str) -> Option<&str> {
        self.parameters.iter().find(|parameter| parameter.name == name).map(|p| p.value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "TEXT")]
    pub text: TextBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub response_body: ResponseBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_group: String,
    pub function: String,
    pub function_response: FunctionResponse,
}

/// The reply to one [`Invocation`]. Its shape never depends on the outcome;
/// success and failure differ only in the text of the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub response: ActionResponse,
    pub message_version: String,
}

impl ResponseEnvelope {
    pub fn text(invocation: &Invocation, body: impl Into<String>) -> Self {
        Self {
            response: ActionResponse {
                action_group: invocation.action_group.clone(),
                function: invocation.function.clone(),
                function_response: FunctionResponse {
                    response_body: ResponseBody { text: TextBody { body: body.into() } },
                },
            },
            message_version: invocation.message_version.clone(),
        }
    }

    pub fn body(&self) -> &str {
        &self.response.function_response.response_body.text.body
    }
}
