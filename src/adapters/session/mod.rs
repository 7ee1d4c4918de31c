//! Session adapters.
//!
//! - `InMemoryCredentialStore` - Holds the bearer token for the running process
//! - `TracingLoginPrompt` - Logs sign-in requests and counts them

mod in_memory_credentials;
mod tracing_login_prompt;

pub use in_memory_credentials::InMemoryCredentialStore;
pub use tracing_login_prompt::TracingLoginPrompt;
