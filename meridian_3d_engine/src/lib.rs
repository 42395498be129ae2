/*!
# Meridian 3D Engine

A small scene-graph renderer core: transforms and parenting, cameras with
frustum culling, CPU-side geometry and programs, a frame renderer that sorts
draws and only sends the pipeline state that changed, ray picking, and an
orbit camera rig.

Drawing goes through the `GraphicsDevice` trait, so the core never talks to
a graphics API directly. A backend implements that trait and hands a boxed
instance to `Renderer::new`.

## Architecture

- **Scene**: Arena of nodes with local/world transforms
- **Camera**: Perspective or orthographic projection plus frustum
- **Resource**: Geometry attributes, programs, meshes
- **Renderer**: Render list, state cache, per-frame draw loop
- **Raycast**: Rays, analytic intersections, mesh picking
- **Controls**: Orbit controller
- **Utils**: Frame clock

Everything is reachable through the `meridian3d` namespace module.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod scene;
pub mod camera;
pub mod resource;
pub mod renderer;
pub mod raycast;
pub mod controls;
pub mod utils;

// Main meridian3d namespace module
pub mod meridian3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }

    // Picking sub-module
    pub mod raycast {
        pub use crate::raycast::*;
    }

    // Camera controls sub-module
    pub mod controls {
        pub use crate::controls::*;
    }

    // Frame timing sub-module
    pub mod utils {
        pub use crate::utils::*;
    }
}

// Re-export math library at crate root
pub use glam;
