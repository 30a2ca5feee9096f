pub mod collection;
pub mod profile;

pub use collection::{add_to_collection, handle_add_pokemon};
pub use profile::handle_get_profile;
