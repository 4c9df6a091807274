//! UseCase 層
//!
//! 1 つの操作につき 1 つの構造体を置き、UI 層からは `Arc` で共有します。

mod delete_room;
mod error;
mod join_room;
mod leave_room;
mod login;
mod manage_rooms;
mod manage_users;
mod route_message;

pub use delete_room::DeleteRoomUseCase;
pub use error::{
    AuthError, CreateRoomError, DeleteRoomError, GetRoomDetailError, JoinError, LoginError,
    ProfileError,
};
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use login::{AuthPolicy, AuthenticateUseCase, LoginUseCase};
pub use manage_rooms::{CreateRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase, RoomDetail};
pub use manage_users::{
    GetProfileUseCase, GetSessionsUseCase, GetUsersUseCase, UpdateProfileUseCase,
};
pub use route_message::RouteMessageUseCase;
