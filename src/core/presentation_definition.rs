use super::input_descriptor::InputDescriptor;

use serde::{Deserialize, Serialize};

/// A presentation definition is a JSON object that describes the information a
/// verifier requires of a holder.
///
/// > Presentation Definitions are objects that articulate what proofs a verifier requires.
/// > These help the verifier to decide how or whether to interact with a holder.
///
/// Presentation Definitions are composed of input descriptors, which describe
/// the credential types and field constraints the verifier will accept.
///
/// For more information, see: [https://identity.foundation/presentation-exchange/spec/v1.0.0/#presentation-definition](https://identity.foundation/presentation-exchange/spec/v1.0.0/#presentation-definition)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationDefinition {
    id: String,
    input_descriptors: Vec<InputDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
}

impl PresentationDefinition {
    /// The Presentation Definition MUST contain an id property. The value of this property MUST be a string.
    /// The string SHOULD provide a unique ID for the desired context.
    ///
    /// The Presentation Definition MUST contain an input_descriptors property. Its value MUST be an array
    /// of Input Descriptor Objects, the composition of which are found in the [InputDescriptor] type.
    pub fn new(id: String, input_descriptor: InputDescriptor) -> Self {
        Self {
            id,
            input_descriptors: vec![input_descriptor],
            name: None,
            purpose: None,
        }
    }

    /// Return the id of the presentation definition.
    pub fn id(&self) -> &String {
        &self.id
    }

    /// Add a new input descriptor to the presentation definition.
    pub fn add_input_descriptor(mut self, input_descriptor: InputDescriptor) -> Self {
        self.input_descriptors.push(input_descriptor);
        self
    }

    /// Return the input descriptors of the presentation definition,
    /// in declaration order.
    pub fn input_descriptors(&self) -> &[InputDescriptor] {
        &self.input_descriptors
    }

    /// Return the input descriptor with the given id, if any.
    pub fn input_descriptor(&self, id: &str) -> Option<&InputDescriptor> {
        self.input_descriptors
            .iter()
            .find(|descriptor| descriptor.id() == id)
    }

    /// Set the name of the presentation definition.
    ///
    /// The [PresentationDefinition] MAY contain a name property. If present, its value SHOULD be a
    /// human-friendly string intended to constitute a distinctive designation of the Presentation Definition.
    pub fn set_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Return the name of the presentation definition.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set the purpose of the presentation definition.
    ///
    /// The [PresentationDefinition] MAY contain a purpose property. If present, its value MUST be a string that
    /// describes the purpose for which the Presentation Definition's inputs are being used for.
    pub fn set_purpose(mut self, purpose: String) -> Self {
        self.purpose = Some(purpose);
        self
    }

    /// Return the purpose of the presentation definition.
    pub fn purpose(&self) -> Option<&String> {
        self.purpose.as_ref()
    }

    /// Return the human-readable string representation of the fields requested
    /// in the presentation definition's input descriptors.
    ///
    /// For example, the following paths would be converted as follows:
    ///
    /// `$.credentialSubject.id` -> Id
    /// `$.credentialSubject.givenName` -> Given Name
    /// `$.credentialSubject.familyName` -> Family Name
    pub fn requested_fields(&self) -> Vec<String> {
        self.input_descriptors
            .iter()
            .flat_map(|input_descriptor| input_descriptor.requested_fields())
            .collect()
    }
}
