//! Authoritative multiplayer engine: matchmaking, session lifecycle, tick
//! scheduling and result delivery, all behind a transport-agnostic seam.

pub mod error;
pub mod health;
pub mod matchmaking;
pub mod registry;
pub mod server;
pub mod session;
pub mod transport;

pub use error::{Result, ServerError};
pub use server::{GameServer, ServerConfig};
pub use session::{Participant, Session, SessionPhase};
pub use transport::{Connection, ConnectionId, SharedConnection};
