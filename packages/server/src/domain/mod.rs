//! ドメイン層
//!
//! 値オブジェクト、エンティティ、外部コラボレータ（Identity Store / Room Registry /
//! User Repository）の trait、そして接続ハンドルを定義します。

pub mod connection;
pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use connection::{
    ClientConnection, CloseOutcome, CloseReason, ConnectionId, ConnectionState, OutboundFrame,
    Outbox, SendOutcome,
};
pub use entity::{Envelope, Recipients, Role, Room, Session, UserProfile};
pub use error::{RepositoryError, ValueObjectError};
pub use repository::{IdentityStore, RoomRegistry, UserRepository};
pub use value_object::{Identity, RoomId, Timestamp, Token};
