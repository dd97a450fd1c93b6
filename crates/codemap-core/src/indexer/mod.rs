pub mod aggregate;
pub mod classifier;
pub mod filesystem;
pub mod locator;
pub mod pipeline;
