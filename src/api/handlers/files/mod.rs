pub mod download;
pub mod list;
pub mod manage;
pub mod types;
pub mod upload;

// Re-export all types
pub use types::*;

// Re-export all handlers
pub use download::{download_file, file_content, issue_access_token};
pub use list::{get_file, list_files};
pub use manage::{delete_file, update_tags};
pub use upload::upload_file;

// Re-export utoipa path structs so `OpenApi` derive can resolve re-exported handlers
pub use download::{__path_download_file, __path_file_content, __path_issue_access_token};
pub use list::{__path_get_file, __path_list_files};
pub use manage::{__path_delete_file, __path_update_tags};
pub use upload::__path_upload_file;
