//! Conversion logic between DTOs and domain entities.

use crate::domain::{Envelope, Identity, Recipients, Role, Room, Session, UserProfile};
use crate::infrastructure::dto::{
    http::{RoomSummaryDto, SessionDto, UserDto},
    websocket::{InboundMessage, OutgoingMessage, RecipientField},
};

// ========================================
// DTO → Domain Entity
// ========================================

impl InboundMessage {
    /// Stamp the authenticated sender and resolve the recipients.
    ///
    /// Names that are not valid identities can never be registered, so they are
    /// dropped here. A non-empty `to` stays addressed even if nothing survives.
    pub fn into_envelope(self, from: Identity) -> Envelope {
        let requested = match self.to {
            None => Vec::new(),
            Some(RecipientField::List(list)) => list,
            Some(RecipientField::Single(name)) if name.is_empty() => Vec::new(),
            Some(RecipientField::Single(name)) => vec![name],
        };

        let recipients = if requested.is_empty() {
            Recipients::Everyone
        } else {
            Recipients::Only(
                requested
                    .into_iter()
                    .filter_map(|name| Identity::try_from(name).ok())
                    .collect(),
            )
        };

        Envelope::new(from, recipients, self.data)
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Envelope> for OutgoingMessage {
    fn from(envelope: &Envelope) -> Self {
        Self {
            from: envelope.from.as_str().to_string(),
            data: envelope.data.clone(),
        }
    }
}

impl From<Room> for RoomSummaryDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id.into(),
            room: room.attributes,
        }
    }
}

impl From<UserProfile> for UserDto {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id.into_string(),
            user: user.profile,
        }
    }
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        let kind = match session.role {
            Role::Admin => "admin",
            Role::User => "user",
        };
        Self {
            id: session.identity.into_string(),
            token: session.token.as_str().to_string(),
            r#type: kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn identity(name: &str) -> Identity {
        Identity::new(name.to_string()).unwrap()
    }

    fn inbound(text: &str) -> InboundMessage {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_sender_is_stamped_as_from() {
        // テスト項目: from はクライアントの申告ではなく認証済み Identity になる
        // given (前提条件):
        let msg = inbound(r#"{"to": ["admin"], "data": "hi", "from": "mallory"}"#);

        // when (操作):
        let envelope = msg.into_envelope(identity("kevin"));

        // then (期待する結果):
        assert_eq!(envelope.from, identity("kevin"));
        assert_eq!(
            envelope.recipients,
            Recipients::Only([identity("admin")].into_iter().collect())
        );
        assert_eq!(envelope.data, "hi");
    }

    #[test]
    fn test_empty_forms_become_broadcast() {
        // テスト項目: to が null / [] / "" の場合はブロードキャストになる
        // given (前提条件):
        let cases = [
            r#"{"to": null, "data": "x"}"#,
            r#"{"to": [], "data": "x"}"#,
            r#"{"to": "", "data": "x"}"#,
        ];

        // when (操作):
        let envelopes: Vec<Envelope> = cases
            .iter()
            .map(|case| inbound(case).into_envelope(identity("kevin")))
            .collect();

        // then (期待する結果):
        assert!(envelopes.iter().all(|e| e.recipients.is_broadcast()));
    }

    #[test]
    fn test_invalid_names_keep_message_addressed() {
        // テスト項目: 宛先が全て不正な名前でもブロードキャストにはならない
        // given (前提条件):
        let msg = inbound(r#"{"to": [""], "data": "x"}"#);

        // when (操作):
        let envelope = msg.into_envelope(identity("kevin"));

        // then (期待する結果):
        assert_eq!(envelope.recipients, Recipients::Only(HashSet::new()));
    }

    #[test]
    fn test_envelope_to_outgoing_message() {
        // テスト項目: Envelope から送信フレームへ変換される
        // given (前提条件):
        let envelope = Envelope::new(identity("admin"), Recipients::Everyone, "yo".to_string());

        // when (操作):
        let outgoing = OutgoingMessage::from(&envelope);

        // then (期待する結果):
        assert_eq!(outgoing.from, "admin");
        assert_eq!(outgoing.data, "yo");
    }

    #[test]
    fn test_session_to_dto_type() {
        // テスト項目: セッションの種別が "admin" / "user" で出力される
        // given (前提条件):
        let session = Session {
            identity: identity("admin"),
            token: crate::domain::Token::new("t".to_string()).unwrap(),
            role: Role::Admin,
        };

        // when (操作):
        let dto = SessionDto::from(session);

        // then (期待する結果):
        assert_eq!(dto.r#type, "admin");
        assert_eq!(dto.token, "t");
    }
}
