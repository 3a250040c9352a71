pub mod camera;

pub use camera::{CameraRig, FlyingCamera, StaticCamera};
