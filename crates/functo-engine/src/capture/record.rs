//! Capture records

use functo_core::{ClassId, ClassRegistry, MethodSignature, Value};

/// One intercepted method call: where it was made, what was called, and
/// with which arguments
///
/// Immutable once created. The registry handle is kept so the declaring
/// type can be compared against requested static types at synthesis.
#[derive(Debug, Clone)]
pub struct CaptureRecord {
    registry: ClassRegistry,
    declaring_type: ClassId,
    signature: MethodSignature,
    arguments: Vec<Value>,
}

impl CaptureRecord {
    /// Create a record
    pub fn new(
        registry: ClassRegistry,
        declaring_type: ClassId,
        signature: MethodSignature,
        arguments: Vec<Value>,
    ) -> Self {
        Self {
            registry,
            declaring_type,
            signature,
            arguments,
        }
    }

    /// Class of the stand-in the call was made on
    pub fn declaring_type(&self) -> ClassId {
        self.declaring_type
    }

    /// Name of the declaring type
    pub fn declaring_name(&self) -> &str {
        self.registry.name_of(self.declaring_type)
    }

    /// Registry the declaring type belongs to
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Signature of the called method
    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    /// Literal arguments of the call
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Signature rendered for messages, e.g. `incIndex(int)`
    pub fn method(&self) -> String {
        self.signature.to_string()
    }
}
