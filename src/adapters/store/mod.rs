//! Session store adapters.

mod in_memory;
mod yaml_file;

pub use in_memory::InMemorySessionStore;
pub use yaml_file::YamlFileSessionStore;
