//! Custom-tagged YAML nodes

use serde_yaml::Value;

/// Shape of the node a tag is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Mapping,
    Sequence,
    Scalar,
}

impl NodeKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Mapping(_) => Self::Mapping,
            Value::Sequence(_) => Self::Sequence,
            Value::Tagged(tagged) => Self::of(&tagged.value),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Self::Scalar,
        }
    }
}

/// A node carrying a tag outside the base schema, e.g. `!include foo.yaml`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedNode {
    /// Tag including its leading `!`
    pub tag: String,
    pub kind: NodeKind,
    pub value: Value,
}

impl TaggedNode {
    /// View `value` as a tagged node, if it is one.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Tagged(tagged) => Some(Self {
                tag: tagged.tag.to_string(),
                kind: NodeKind::of(&tagged.value),
                value: tagged.value.clone(),
            }),
            _ => None,
        }
    }
}

/// Collect every tagged node in `value`, outermost first.
pub fn collect_tagged(value: &Value) -> Vec<TaggedNode> {
    let mut found = Vec::new();
    walk(value, &mut found);
    found
}

fn walk(value: &Value, found: &mut Vec<TaggedNode>) {
    match value {
        Value::Tagged(tagged) => {
            found.extend(TaggedNode::from_value(value));
            walk(&tagged.value, found);
        }
        Value::Mapping(map) => {
            for (key, child) in map {
                walk(key, found);
                walk(child, found);
            }
        }
        Value::Sequence(items) => items.iter().for_each(|item| walk(item, found)),
        _ => {}
    }
}
