pub mod court;
pub mod event;
pub mod net;
pub mod session;

pub use court::{Court, CourtEvent, Direction, GameMode, Side};
pub use event::{ConnectionStatus, EventQueue, SessionEvent};
pub use net::{
    Clock, ConnectionState, FieldKey, Fields, ManualClock, PeerRole, Received, SendOutcome,
    SessionStats, SystemClock, TransportSession, decode, encode,
};
pub use session::{DEFAULT_PORT, OnlineSession, ReplicationEngine, SessionConfig, SessionError};
