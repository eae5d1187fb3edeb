//! Message bodies: the normalized segment chain, the escape codec used by its
//! textual form, and inbound messages with their metadata.

mod chain;
mod escape;
mod received;

pub use chain::{Message, MessageChain, normalize};
pub use escape::{escape, unescape};
pub use received::{Quote, ReceivedMessage, Source};
