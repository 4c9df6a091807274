//! インメモリ実装
//!
//! プロセス再起動をまたいだ永続化は行いません。

mod identity;
mod room;
mod user;

pub use identity::InMemoryIdentityStore;
pub use room::InMemoryRoomRegistry;
pub use user::InMemoryUserRepository;
