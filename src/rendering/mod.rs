pub mod camera;
pub mod debug;
pub mod input;

pub use camera::CameraPlugin;
pub use debug::DebugRenderPlugin;
pub use input::InputPlugin;
