/*!
# meshview

An interactive viewport for polygon meshes.

**meshview** keeps a 3D view of one or more meshes in sync with the meshes
themselves and with the outline tree a GUI shows next to it:

* an orbit camera driven by sliders, drags, and scroll events, whose view and
  projection are a pure function of four parameters;
* a geometry buffer cache deriving flat position, color, and index channels
  from the meshes, rebuilt after topology edits and patched channel by channel
  after display changes;
* a scene registry with a single-selection highlight model;
* an outline whose nodes resolve back to objects, categories, and entities
  with their attributes.

The host GUI and rendering API stay outside: the viewport consumes meshes
through the [`MeshData`](mesh::MeshData) trait and draws through the
[`RenderBackend`](renderer::RenderBackend) trait. A wgpu implementation and a
recording implementation for headless use are provided.

```
use meshview::prelude::*;

let mut viewport: ViewportController<PolyMesh, _> =
    ViewportController::new(DisplaySettings::default(), RecordingBackend::new());
viewport.set_objects([procedural::unit_cuboid(), procedural::icosahedron()]);

viewport.apply(ViewportAction::Subdivide {
    object: 0,
    scheme: SubdivisionScheme::Quad,
    k: 2,
});
viewport.apply(ViewportAction::SelectPath(vec![(1, 0), (0, 0), (3, 0)].into()));
viewport.render();

for notice in viewport.take_notices() {
    if let ViewportNotice::EntitySelected(attributes) = notice {
        println!("{}", attributes);
    }
}
```

## Features

* `serde`: serialization of the display settings, camera state, and
  selections.
*/
#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]

pub use glamx;

#[cfg(not(target_arch = "wasm32"))]
#[doc(hidden)]
pub use pollster;

pub mod camera;
pub mod color;
pub mod context;
pub mod mesh;
pub mod procedural;
pub mod renderer;
pub mod resource;
pub mod scene;
pub mod viewport;

pub mod prelude {
    pub use crate::camera::*;
    pub use crate::color::*;
    pub use crate::context::*;
    pub use crate::mesh::*;
    pub use crate::procedural;
    pub use crate::renderer::*;
    pub use crate::resource::*;
    pub use crate::scene::*;
    pub use crate::viewport::*;
    pub use glamx::{Mat4, Pose3, Vec3};
    pub use std::cell::RefCell;
    pub use std::rc::Rc;
}
