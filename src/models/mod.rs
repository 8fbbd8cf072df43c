// Re-export all model types
pub use self::client::*;
pub use self::errors::*;
pub use self::events::*;

mod client;
mod errors;
mod events;
