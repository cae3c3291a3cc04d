pub mod directory_file;
pub mod environment;
pub mod global_file;
