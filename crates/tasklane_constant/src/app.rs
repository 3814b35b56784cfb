//! Application metadata constants

pub const NAME: &str = "tasklane";
pub const DISPLAY_NAME: &str = "tasklane";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = "Terminal client for a remote todo service";

/// Directory name for tasklane data under the home directory
pub const DATA_DIR: &str = ".tasklane";
