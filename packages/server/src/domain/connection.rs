//! 接続ハンドル
//!
//! ## 概要
//!
//! `ClientConnection` は 1 本の WebSocket 接続を表すハンドルです。
//! 実際のソケットへの書き込みは UI 層の pusher ループが担当し、
//! このハンドルはテキストの送信キュー、クローズ要求のシグナル、接続状態だけを保持します。
//! pusher ループ側は `Outbox` からフレームを受け取ります。
//!
//! クローズ要求はキュー済みのテキストを追い越します。
//! 読まないピアに対してテキスト送信が詰まっていても、クローズは即座に pusher に届きます。
//!
//! ## 状態遷移
//!
//! ```text
//! Connected --close()--> Closing --(pusher 終了)--> Closed
//! Connected --mark_closed() / 受信側 drop--> Closed
//! ```
//!
//! `close()` は何度呼んでも安全で、2 回目以降は `CloseOutcome::AlreadyClosed` を返します。

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};

use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use super::value_object::Identity;

const STATE_CONNECTED: u8 = 0;
const STATE_CLOSING: u8 = 1;
const STATE_CLOSED: u8 = 2;

/// 接続ごとに一意な ID
///
/// 同じ Identity で再接続した場合でも、古い接続と新しい接続を区別するために使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// クローズ理由（WebSocket の close code と reason）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReason {
    pub code: u16,
    pub reason: String,
}

impl CloseReason {
    pub const NORMAL_CLOSURE: u16 = 1000;
    pub const FORBIDDEN: u16 = 4403;
    pub const SUPERSEDED: u16 = 4409;

    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// 管理者によるルーム削除
    pub fn room_deleted() -> Self {
        Self::new(Self::NORMAL_CLOSURE, "Room deleted")
    }

    /// 存在しないルームへの参加
    pub fn room_not_found() -> Self {
        Self::new(Self::FORBIDDEN, "Room not found")
    }

    /// 同じ Identity の新しい接続に置き換えられた
    pub fn superseded() -> Self {
        Self::new(Self::SUPERSEDED, "Superseded by a newer connection")
    }
}

/// pusher ループに渡すフレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    Text(String),
    Close(CloseReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Closing,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    /// 接続済みでないため送信しなかった（エラーではない）
    NotConnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Initiated,
    AlreadyClosed,
}

/// 1 本のクライアント接続
#[derive(Debug, Clone)]
pub struct ClientConnection {
    id: ConnectionId,
    identity: Identity,
    state: Arc<AtomicU8>,
    sender: mpsc::UnboundedSender<String>,
    close_signal: Arc<watch::Sender<Option<CloseReason>>>,
}

impl ClientConnection {
    /// 新しい接続ハンドルと、pusher ループが読む `Outbox` を作成
    pub fn open(identity: Identity) -> (Self, Outbox) {
        let (sender, frames) = mpsc::unbounded_channel();
        let (close_signal, close) = watch::channel(None);
        let connection = Self {
            id: ConnectionId::generate(),
            identity,
            state: Arc::new(AtomicU8::new(STATE_CONNECTED)),
            sender,
            close_signal: Arc::new(close_signal),
        };
        let outbox = Outbox {
            frames,
            close,
            close_delivered: false,
        };
        (connection, outbox)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> ConnectionState {
        if self.sender.is_closed() {
            return ConnectionState::Closed;
        }
        match self.state.load(Ordering::Acquire) {
            STATE_CONNECTED => ConnectionState::Connected,
            STATE_CLOSING => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// テキストフレームを送信キューに積む
    ///
    /// 状態確認と送信の間に切断された場合も `NotConnected` として扱う。
    pub fn send_text(&self, text: String) -> SendOutcome {
        if !self.is_connected() {
            return SendOutcome::NotConnected;
        }
        match self.sender.send(text) {
            Ok(()) => SendOutcome::Delivered,
            Err(_) => {
                self.mark_closed();
                SendOutcome::NotConnected
            }
        }
    }

    /// クローズを開始する（冪等）
    ///
    /// キュー済みのテキストは待たない。未送信のテキストは破棄される。
    pub fn close(&self, reason: CloseReason) -> CloseOutcome {
        if self
            .state
            .compare_exchange(
                STATE_CONNECTED,
                STATE_CLOSING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return CloseOutcome::AlreadyClosed;
        }
        if self.sender.is_closed() {
            self.mark_closed();
            return CloseOutcome::AlreadyClosed;
        }
        self.close_signal.send_replace(Some(reason));
        CloseOutcome::Initiated
    }

    /// トランスポートが終了したことを記録する
    pub fn mark_closed(&self) {
        self.state.store(STATE_CLOSED, Ordering::Release);
    }
}

/// pusher ループ側の受信口
///
/// `recv` はクローズ要求をキュー済みのテキストより優先して返し、
/// クローズを返した後は `None` を返し続ける。
#[derive(Debug)]
pub struct Outbox {
    frames: mpsc::UnboundedReceiver<String>,
    close: watch::Receiver<Option<CloseReason>>,
    close_delivered: bool,
}

impl Outbox {
    /// 次に送るフレームを待つ
    ///
    /// 接続ハンドルがすべて drop され、クローズ要求も無ければ `None`。
    pub async fn recv(&mut self) -> Option<OutboundFrame> {
        if self.close_delivered {
            return None;
        }
        let Self {
            frames,
            close,
            close_delivered,
        } = self;
        tokio::select! {
            biased;
            reason = wait_for_close(close) => {
                *close_delivered = true;
                Some(OutboundFrame::Close(reason))
            }
            text = frames.recv() => text.map(OutboundFrame::Text),
        }
    }

    /// 待たずに次のフレームを取り出す
    pub fn try_recv(&mut self) -> Option<OutboundFrame> {
        if self.close_delivered {
            return None;
        }
        let requested = self.close.borrow_and_update().clone();
        if let Some(reason) = requested {
            self.close_delivered = true;
            return Some(OutboundFrame::Close(reason));
        }
        self.frames.try_recv().ok().map(OutboundFrame::Text)
    }

    /// クローズが要求されるまで待つ
    ///
    /// 送信中のフレームと競合させるために使う。一度返した後の `recv` は `None`。
    pub async fn closed(&mut self) -> CloseReason {
        let reason = wait_for_close(&mut self.close).await;
        self.close_delivered = true;
        reason
    }
}

async fn wait_for_close(close: &mut watch::Receiver<Option<CloseReason>>) -> CloseReason {
    loop {
        let requested = close.borrow_and_update().clone();
        if let Some(reason) = requested {
            return reason;
        }
        if close.changed().await.is_err() {
            // 接続ハンドルが drop されたので、もうクローズ要求は来ない
            std::future::pending::<()>().await;
        }
    }
}
