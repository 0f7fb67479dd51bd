mod clock;
mod codec;
mod connection;
pub mod handshake;
mod stats;
mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{FieldKey, Fields, UnknownField, decode, encode};
pub use connection::{ConnectionState, PeerRole};
pub use stats::SessionStats;
pub use transport::{Received, SendOutcome, TransportSession};
