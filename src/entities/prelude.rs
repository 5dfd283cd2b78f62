pub use super::file_tags::Entity as FileTags;
pub use super::files::Entity as Files;
pub use super::folders::Entity as Folders;
pub use super::tags::Entity as Tags;
pub use super::users::Entity as Users;
