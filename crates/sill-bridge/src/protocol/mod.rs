//! Wire protocol for the bridge: channel vocabulary, message shapes, and
//! the newline-delimited JSON codec.

pub mod channels;
pub mod codec;
pub mod messages;
