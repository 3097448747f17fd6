use crate::utils::{to_human_readable_string, NonEmptyVec};

use serde::{Deserialize, Serialize};

/// A JSONPath is a string that represents a path to a specific value within a JSON object.
///
/// For syntax details, see [https://identity.foundation/presentation-exchange/spec/v1.0.0/#jsonpath-syntax-definition](https://identity.foundation/presentation-exchange/spec/v1.0.0/#jsonpath-syntax-definition)
pub type JsonPath = String;

/// A schema URI identifying the credential type an input descriptor accepts.
///
/// Credentials submitted against the descriptor are expected to conform to
/// one of its declared schemas.
///
/// See: [https://identity.foundation/presentation-exchange/spec/v1.0.0/#input-descriptor-object](https://identity.foundation/presentation-exchange/spec/v1.0.0/#input-descriptor-object)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaRef {
    uri: String,
}

impl SchemaRef {
    /// Create a new schema reference from a URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Return the schema URI.
    pub fn uri(&self) -> &str {
        self.uri.as_str()
    }
}

impl From<&str> for SchemaRef {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

/// Input Descriptors are objects used to describe the information a
/// verifier requires of a holder.
///
/// Each input descriptor identifies the credential schema(s) it accepts and
/// the constraints a candidate credential must satisfy. A descriptor with no
/// constraints is satisfied by any credential of a matching schema.
///
/// See: [https://identity.foundation/presentation-exchange/spec/v1.0.0/#input-descriptor-object](https://identity.foundation/presentation-exchange/spec/v1.0.0/#input-descriptor-object)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputDescriptor {
    id: String,
    schema: NonEmptyVec<SchemaRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    constraints: Option<Constraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
}

impl InputDescriptor {
    /// Create a new instance of the input descriptor with the given id and schema.
    ///
    /// The Input Descriptor Object MUST contain an id property. The value of the id
    /// property MUST be a string that does not conflict with the id of another
    /// Input Descriptor Object in the same Presentation Definition.
    ///
    /// The Input Descriptor Object MUST contain a schema property with at least
    /// one schema URI.
    pub fn new(id: String, schema: NonEmptyVec<SchemaRef>) -> Self {
        Self {
            id,
            schema,
            constraints: None,
            name: None,
            purpose: None,
        }
    }

    /// Return the id of the input descriptor.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Return the schema references of the input descriptor.
    pub fn schema(&self) -> &NonEmptyVec<SchemaRef> {
        &self.schema
    }

    /// Set the constraints of the input descriptor.
    pub fn set_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// Return the constraints of the input descriptor, if any.
    ///
    /// A descriptor without constraints is satisfied by any candidate
    /// credential of a matching schema.
    pub fn constraints(&self) -> Option<&Constraints> {
        self.constraints.as_ref()
    }

    /// Set the name of the input descriptor.
    pub fn set_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Return the name of the input descriptor.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set the purpose of the input descriptor.
    ///
    /// If present, the purpose MUST be a string that describes the purpose for
    /// which the claim's data is being requested.
    pub fn set_purpose(mut self, purpose: String) -> Self {
        self.purpose = Some(purpose);
        self
    }

    /// Return the purpose of the input descriptor.
    pub fn purpose(&self) -> Option<&String> {
        self.purpose.as_ref()
    }

    /// Return the humanly readable requested fields of the input descriptor.
    pub fn requested_fields(&self) -> Vec<String> {
        self.constraints
            .iter()
            .flat_map(|constraints| constraints.fields())
            .flat_map(|field| field.requested_fields_human_readable())
            .collect()
    }
}

/// Constraints are objects used to describe the conditions a candidate
/// credential must satisfy to fulfill an Input Descriptor.
///
/// A constraints object MAY be empty; an empty (or absent) `fields` list
/// places no conditions on the candidate.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    fields: Vec<ConstraintsField>,
}

impl Constraints {
    /// Returns an empty Constraints object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new field constraint to the constraints list.
    pub fn add_constraint(mut self, field: ConstraintsField) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the fields of the constraints object, in declaration order.
    pub fn fields(&self) -> &[ConstraintsField] {
        self.fields.as_ref()
    }

    /// Returns whether the constraints object declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// ConstraintsField objects describe a single condition a candidate
/// credential must satisfy: at least one of the field's path alternatives
/// must resolve to a value, and the resolved value must validate against the
/// field's filter if one is declared.
///
/// For more information, see: [https://identity.foundation/presentation-exchange/spec/v1.0.0/#input-descriptor-object](https://identity.foundation/presentation-exchange/spec/v1.0.0/#input-descriptor-object)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstraintsField {
    path: NonEmptyVec<JsonPath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<serde_json::Value>,
}

impl From<NonEmptyVec<JsonPath>> for ConstraintsField {
    fn from(path: NonEmptyVec<JsonPath>) -> Self {
        Self {
            path,
            id: None,
            purpose: None,
            name: None,
            filter: None,
        }
    }
}

impl ConstraintsField {
    /// Create a new instance of the constraints field with the given path.
    ///
    /// Constraint fields must have at least one JSONPath to the field for
    /// which the constraint is applied.
    ///
    /// Tip: Use the [`From<NonEmptyVec<JsonPath>>`](ConstraintsField#impl-From<NonEmptyVec<String>>-for-ConstraintsField)
    /// impl if more than one path is known.
    pub fn new(path: JsonPath) -> ConstraintsField {
        ConstraintsField {
            path: NonEmptyVec::new(path),
            id: None,
            purpose: None,
            name: None,
            filter: None,
        }
    }

    /// Add a new alternative path to the constraints field.
    ///
    /// Paths are evaluated in declaration order; the first one that resolves
    /// to a satisfying value wins.
    pub fn add_path(mut self, path: JsonPath) -> Self {
        self.path.push(path);
        self
    }

    /// Return the paths of the constraints field.
    ///
    /// `path` is a non empty list of [JsonPath](https://goessner.net/articles/JsonPath/) expressions.
    pub fn path(&self) -> &NonEmptyVec<JsonPath> {
        &self.path
    }

    /// Set the id of the constraints field.
    ///
    /// The fields object MAY contain an id property. If present, its value MUST be a string that
    /// is unique from every other field object's id property, including those contained in other
    /// Input Descriptor Objects.
    pub fn set_id(mut self, id: String) -> Self {
        self.id = Some(id);
        self
    }

    /// Return the id of the constraints field.
    pub fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }

    /// Set the purpose of the constraints field.
    ///
    /// If present, its value MUST be a string that describes the purpose for which the field is being requested.
    pub fn set_purpose(mut self, purpose: String) -> Self {
        self.purpose = Some(purpose);
        self
    }

    /// Return the purpose of the constraints field.
    pub fn purpose(&self) -> Option<&String> {
        self.purpose.as_ref()
    }

    /// Set the name of the constraints field.
    ///
    /// If present, its value MUST be a string, and SHOULD be a human-friendly
    /// name that describes what the target field represents.
    pub fn set_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Return the name of the constraints field.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set the filter of the constraints field.
    ///
    /// If present its value MUST be a JSON Schema descriptor used to filter against
    /// the values returned from evaluation of the JSONPath string expressions in the path array.
    pub fn set_filter(mut self, filter: serde_json::Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Return the raw filter of the constraints field.
    pub fn filter(&self) -> Option<&serde_json::Value> {
        self.filter.as_ref()
    }

    /// Return the requested field name in the casing used by the path itself,
    /// e.g. camelCase, snake_case, etc.
    ///
    /// This strips the delimiters from each JSON path and returns the last
    /// value in the path.
    ///
    /// e.g., `["$.credentialSubject.dateOfBirth"]` will return `["dateOfBirth"]`.
    pub fn requested_fields(&self) -> Vec<String> {
        self.path()
            .iter()
            .filter_map(|path| path.split(&['-', '.', ':', '@'][..]).last())
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Return the humanly-readable requested fields of the constraints field.
    ///
    /// This will convert camelCase to space-separated words with capitalized first letter.
    ///
    /// e.g., `["$.credentialSubject.dateOfBirth"]` will return `["Date of Birth"]`.
    pub fn requested_fields_human_readable(&self) -> Vec<String> {
        self.requested_fields()
            .into_iter()
            .map(to_human_readable_string)
            .collect()
    }
}
