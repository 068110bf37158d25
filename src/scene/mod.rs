//! The scene registry, the outline, and selection resolution.

pub use self::mesh_object::{ColorTarget, ElementClass, ElementColors, ElementFlags, MeshObject};
pub use self::outline::{Outline, OutlineNode};
pub use self::registry::{Scene, SceneItem};
pub use self::selection::{
    EntityAttributes, MalformedSelection, Selection, SelectionPath, SelectionResolver, CATEGORIES,
};

mod mesh_object;
mod outline;
mod registry;
mod selection;
