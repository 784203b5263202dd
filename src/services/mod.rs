pub mod catalog;
pub mod dashboard;
pub mod filter;
pub mod library;
pub mod profile;
pub mod purchase;
pub mod session;

pub use catalog::Catalog;
pub use dashboard::DashboardSummary;
pub use filter::{filter_and_sort, CatalogQuery, SortKey, TypeFilter};
pub use library::LibraryStore;
pub use profile::Profile;
pub use purchase::{purchase, PurchaseIntent};
pub use session::SessionStore;
