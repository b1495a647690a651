//! Tool-server descriptors.

mod descriptor;

pub use descriptor::ServerDescriptor;
