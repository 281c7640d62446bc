//! Declarative operation tables.
//!
//! An [`ActionTable`] is everything that differs between domains: which
//! function names exist, what kind of store operation each one performs, and
//! which fields it reads. The dispatcher is generic over it, and the same
//! table renders the function schema advertised to the agent runtime.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::catalog::Domain;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub field_type: FieldType,
    pub presence: Presence,
}

impl FieldSpec {
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self { name, description, field_type: FieldType::String, presence: Presence::Required }
    }

    pub const fn optional(name: &'static str, description: &'static str) -> Self {
        Self { name, description, field_type: FieldType::String, presence: Presence::Optional }
    }

    pub const fn integer(self) -> Self {
        Self { field_type: FieldType::Integer, ..self }
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// Server-side values stamped onto a record at creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratedValue {
    /// Calendar date of the call, rendered with a chrono format string.
    CurrentDate { format: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedField {
    pub name: &'static str,
    pub value: GeneratedValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Get,
    Create,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationSpec {
    pub function: &'static str,
    pub description: &'static str,
    pub kind: OperationKind,
    pub fields: Vec<FieldSpec>,
    pub generated: Vec<GeneratedField>,
}

impl OperationSpec {
    pub fn get(function: &'static str, description: &'static str, key: &'static str) -> Self {
        Self {
            function,
            description,
            kind: OperationKind::Get,
            fields: vec![FieldSpec::required(key, "The ID of the booking to retrieve")],
            generated: Vec::new(),
        }
    }

    pub fn create(
        function: &'static str,
        description: &'static str,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self { function, description, kind: OperationKind::Create, fields, generated: Vec::new() }
    }

    pub fn delete(function: &'static str, description: &'static str, key: &'static str) -> Self {
        Self {
            function,
            description,
            kind: OperationKind::Delete,
            fields: vec![FieldSpec::required(key, "The ID of the booking to delete")],
            generated: Vec::new(),
        }
    }

    pub fn with_generated(mut self, field: GeneratedField) -> Self {
        self.generated.push(field);
        self
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.is_required())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionTable {
    pub domain: Domain,
    pub description: &'static str,
    /// Attribute holding the record id, also the parameter name for get/delete.
    pub key_attribute: &'static str,
    /// Noun used in user-facing result messages.
    pub record_label: &'static str,
    pub operations: Vec<OperationSpec>,
}

impl ActionTable {
    pub fn operation(&self, function: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|operation| operation.function == function)
    }

    pub fn function_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operations.iter().map(|operation| operation.function)
    }

    pub fn function_schema(&self) -> FunctionSchema {
        let functions = self
            .operations
            .iter()
            .map(|operation| FunctionDefinition {
                name: operation.function.to_string(),
                description: operation.description.to_string(),
                parameters: operation
                    .fields
                    .iter()
                    .map(|field| {
                        (
                            field.name.to_string(),
                            ParameterDefinition {
                                field_type: field.field_type,
                                description: field.description.to_string(),
                                required: field.is_required(),
                            },
                        )
                    })
                    .collect(),
            })
            .collect();

        FunctionSchema { functions }
    }

    pub fn definition(&self, action_group_name: &str) -> ActionGroupDefinition {
        ActionGroupDefinition {
            action_group_name: action_group_name.to_string(),
            description: self.description.to_string(),
            function_schema: self.function_schema(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParameterDefinition {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub description: String,
    pub required: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ParameterDefinition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionSchema {
    pub functions: Vec<FunctionDefinition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupDefinition {
    pub action_group_name: String,
    pub description: String,
    pub function_schema: FunctionSchema,
}
