//! Site configuration (`pagesmith.toml`)

pub mod consts;
pub mod model;

pub use model::{
    Config, FamilyConfig, HomepageConfig, PathsConfig, SchoolsConfig, SiteConfig, SitePagesConfig,
    VideoConfig,
};
