pub mod annotate;
mod builder;
pub mod document;
pub mod locale;
pub mod nav;
pub mod pages;
pub mod paths;
pub mod sink;
pub mod source;
pub mod store;

pub use builder::{BuildError, BuildResult, Builder, PageCounts};
pub use locale::Locales;
pub use paths::base_path_from_config;
