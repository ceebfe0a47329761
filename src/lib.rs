mod error;
mod models;
pub(crate) mod scope_path;
mod services;
mod session;

pub use error::AppError;
pub use models::file_entry::FileEntry;
pub use models::outcome::OperationOutcome;
pub use models::storage::StorageCategory;
pub use services::file_service::FileOps;
pub use services::listing_service::{enrich_directory_sizes, list_dir, list_subdirectories};
pub use services::mime_service::FileCategory;
pub use services::recent_service::{recent_in_directory, RecentFiles};
pub use services::space_service::{DiskSpace, SpaceProbe};
pub use services::storage_service::{categories_with_sizes, storage_categories};
pub use services::walk_service::{directory_size, directory_size_display};
pub use services::{format_service, mime_service, walk_service};
pub use session::{BrowsingSession, BrowsingState, LoadToken};
