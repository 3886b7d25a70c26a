mod paths;

pub use paths::{AppPaths, HomePaths, PathsError, strip_home_prefix};
