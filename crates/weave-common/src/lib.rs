pub mod errors;
pub mod id;
pub mod platform;
pub mod url;

pub use errors::{ConfigError, WeaveError, WebViewError};
pub use id::new_callback_id;
pub use platform::{PlatformInfo, TargetPlatform};
pub use url::{host_from_url, is_placeholder_url, normalize_url, BLANK_URL};

pub type Result<T> = std::result::Result<T, WeaveError>;
