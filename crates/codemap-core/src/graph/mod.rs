pub mod encoder;
pub mod layout;
pub mod scene;
