pub mod error;
pub mod message;
pub mod payload_value;
pub mod record;

pub use error::NdefError;
pub use message::NdefMessage;
pub use record::{NdefRecord, Tnf};
