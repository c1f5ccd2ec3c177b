use super::Visit;
use crate::path::Path;
use serde_json::Value;

/// Recursively visit all populated leaves of a serialized document
///
/// Objects and arrays are descended into, `null` is treated as absent. Empty objects and arrays contain no leaves
/// and are skipped entirely.
pub trait VisitLeaves {
    fn visit_leaves(&self, at: &Path, visitor: &mut dyn Visit<Value>);
}

impl VisitLeaves for Value {
    fn visit_leaves(&self, at: &Path, visitor: &mut dyn Visit<Value>) {
        match self {
            Value::Null => {}
            Value::Object(object) => {
                for (key, value) in object {
                    value.visit_leaves(&at.append(key.as_str()), visitor);
                }
            }
            Value::Array(array) => {
                for (index, value) in array.iter().enumerate() {
                    value.visit_leaves(&at.append(index), visitor);
                }
            }
            Value::Bool(_) | Value::Number(_) | Value::String(_) => visitor.visit(at, self),
        }
    }
}
