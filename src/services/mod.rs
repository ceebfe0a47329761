pub mod file_service;
pub mod format_service;
pub mod listing_service;
pub mod mime_service;
pub mod recent_service;
pub mod space_service;
pub mod storage_service;
pub mod walk_service;
