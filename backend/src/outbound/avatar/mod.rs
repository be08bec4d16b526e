//! Avatar storage adapters.

mod filesystem;

pub use filesystem::FilesystemAvatarStore;
