//! Infrastructure 層
//!
//! - `repository`: 外部コラボレータのインメモリ実装
//! - `connection_manager`: ルームごとの接続管理と配送
//! - `room_hub`: アクティブなルームの ConnectionManager 一覧
//! - `dto`: ワイヤフォーマット

pub mod connection_manager;
pub mod dto;
pub mod repository;
pub mod room_hub;

pub use connection_manager::ConnectionManager;
pub use room_hub::{RoomHub, RoomHubGuard};
