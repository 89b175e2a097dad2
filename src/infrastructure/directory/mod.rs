mod static_directory;

pub use static_directory::{create_static_directory, StaticUserDirectory};
