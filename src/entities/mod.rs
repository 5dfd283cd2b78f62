pub mod prelude;

pub mod file_tags;
pub mod files;
pub mod folders;
pub mod tags;
pub mod users;
