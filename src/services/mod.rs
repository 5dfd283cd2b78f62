pub mod auth_service;
pub mod file_service;
pub mod folder_service;
pub mod storage;
pub mod tag_service;
