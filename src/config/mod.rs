//! Configuration module

mod site;

pub use site::ContentConfig;
pub use site::LabelsConfig;
pub use site::SiteConfig;
