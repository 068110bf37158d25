//! Typed entity attributes.

use std::fmt;

/// The kind of a mesh entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    /// A mesh vertex.
    Vertex,
    /// An undirected mesh edge.
    Edge,
    /// A polygonal face.
    Face,
}

impl EntityKind {
    /// Human readable name, as displayed by the outline and in log lines.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Vertex => "Vertex",
            EntityKind::Edge => "Edge",
            EntityKind::Face => "Face",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The closed set of attribute names a mesh entity can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeName {
    /// Vertex x coordinate.
    X,
    /// Vertex y coordinate.
    Y,
    /// Vertex z coordinate.
    Z,
    /// Whether a vertex is pinned during geometric operations.
    IsFixed,
    /// Edge weight.
    Weight,
    /// Whether an edge is a crease.
    IsCrease,
    /// Face group identifier.
    Group,
}

const VERTEX_DEFAULTS: &[AttributeName] = &[
    AttributeName::X,
    AttributeName::Y,
    AttributeName::Z,
    AttributeName::IsFixed,
];
const EDGE_DEFAULTS: &[AttributeName] = &[AttributeName::Weight, AttributeName::IsCrease];
const FACE_DEFAULTS: &[AttributeName] = &[AttributeName::Group];

impl AttributeName {
    /// The attributes every entity of the given kind carries.
    pub fn defaults(kind: EntityKind) -> &'static [AttributeName] {
        match kind {
            EntityKind::Vertex => VERTEX_DEFAULTS,
            EntityKind::Edge => EDGE_DEFAULTS,
            EntityKind::Face => FACE_DEFAULTS,
        }
    }

    /// The snake-case name of this attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeName::X => "x",
            AttributeName::Y => "y",
            AttributeName::Z => "z",
            AttributeName::IsFixed => "is_fixed",
            AttributeName::Weight => "weight",
            AttributeName::IsCrease => "is_crease",
            AttributeName::Group => "group",
        }
    }

    /// The value this attribute takes when nothing was assigned.
    pub fn default_value(self) -> AttributeValue {
        match self {
            AttributeName::X | AttributeName::Y | AttributeName::Z => AttributeValue::Float(0.0),
            AttributeName::Weight => AttributeValue::Float(1.0),
            AttributeName::IsFixed | AttributeName::IsCrease => AttributeValue::Bool(false),
            AttributeName::Group => AttributeValue::Int(0),
        }
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed attribute value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    /// A floating point value.
    Float(f32),
    /// An integer value.
    Int(i64),
    /// A boolean flag.
    Bool(bool),
}

impl AttributeValue {
    /// The value as a float, if it is numeric.
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            AttributeValue::Float(v) => Some(v),
            AttributeValue::Int(v) => Some(v as f32),
            AttributeValue::Bool(_) => None,
        }
    }

    /// The value as a boolean, if it is a flag.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            AttributeValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Returns `true` if this value may be stored under `name`.
    pub fn fits(&self, name: AttributeName) -> bool {
        matches!(
            (self, name.default_value()),
            (AttributeValue::Float(_), AttributeValue::Float(_))
                | (AttributeValue::Int(_), AttributeValue::Int(_))
                | (AttributeValue::Bool(_), AttributeValue::Bool(_))
        )
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_per_kind() {
        assert_eq!(AttributeName::defaults(EntityKind::Vertex).len(), 4);
        assert!(AttributeName::defaults(EntityKind::Edge).contains(&AttributeName::Weight));
        assert!(!AttributeName::defaults(EntityKind::Face).contains(&AttributeName::X));
    }

    #[test]
    fn values_only_fit_matching_names() {
        assert!(AttributeValue::Float(2.0).fits(AttributeName::X));
        assert!(!AttributeValue::Bool(true).fits(AttributeName::Weight));
        assert!(AttributeValue::Int(3).fits(AttributeName::Group));
    }
}
