// Filesystem helpers used by the deletion orchestrator
//
// - obscure.rs: rename a target to a random name before destruction
// - walk.rs: enumerate a directory tree for folder deletion

pub mod obscure;
pub mod walk;


pub use obscure::{obscure_filename, random_hex_name, OBSCURED_NAME_LEN};
pub use walk::{list_tree, TreeListing};
