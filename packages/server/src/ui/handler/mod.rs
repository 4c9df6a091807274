//! Request handlers.

mod auth;
mod http;
mod websocket;

pub use http::{
    admin_login, create_room, delete_room, get_me, get_room, get_rooms, get_sessions, get_users,
    health_check, home, put_me, user_login,
};
pub use websocket::websocket_handler;
