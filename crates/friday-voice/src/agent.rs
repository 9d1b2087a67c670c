use crate::channel::{Channel, Participant, RoomInputOptions};
use crate::error::VoiceError;
use crate::service::VoiceService;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Data topic that carries the assistant's reply text.
pub const REPLY_TOPIC: &str = "friday.reply";

#[derive(Debug, Serialize)]
struct ReplyPacket<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
    audio_bytes: usize,
}

#[derive(Debug, Serialize)]
struct AgentMetadata<'a> {
    role: &'static str,
    input: &'a RoomInputOptions,
}

/// The assistant's presence in a LiveKit room.
///
/// Joining provisions the room, mints the assistant's access token and
/// checks that the room service answers for the room.
#[derive(Debug)]
pub struct LiveKitChannel {
    service: Arc<VoiceService>,
    room_name: String,
    identity: String,
    display_name: String,
    connected: bool,
}

impl LiveKitChannel {
    pub fn new(
        service: Arc<VoiceService>,
        room_name: impl Into<String>,
        identity: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            service,
            room_name: room_name.into(),
            identity: identity.into(),
            display_name: display_name.into(),
            connected: false,
        }
    }

    fn ensure_connected(&self) -> Result<(), VoiceError> {
        if self.connected {
            Ok(())
        } else {
            Err(VoiceError::NotConnected(self.room_name.clone()))
        }
    }
}

#[async_trait]
impl Channel for LiveKitChannel {
    fn room_name(&self) -> &str {
        &self.room_name
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self, options: &RoomInputOptions) -> Result<(), VoiceError> {
        info!(
            room = %self.room_name,
            url = %self.service.get_url(),
            identity = %self.identity,
            "agent connecting to LiveKit room"
        );

        let metadata = serde_json::to_string(&AgentMetadata {
            role: "assistant",
            input: options,
        })
        .map_err(|e| VoiceError::Config(format!("failed to encode agent metadata: {}", e)))?;

        self.service.create_room(&self.room_name).await?;
        let token = self.service.generate_agent_token(
            &self.room_name,
            &self.identity,
            &self.display_name,
            &metadata,
        )?;
        let participants = self.service.list_participants(&self.room_name).await?.len();

        info!(
            room = %self.room_name,
            participants,
            token_len = token.len(),
            "agent connected"
        );

        self.connected = true;
        Ok(())
    }

    async fn participants(&self) -> Result<Vec<Participant>, VoiceError> {
        self.ensure_connected()?;

        let participants = self.service.list_participants(&self.room_name).await?;
        Ok(participants
            .into_iter()
            .map(|p| Participant {
                identity: p.identity,
                name: p.name,
            })
            .collect())
    }

    async fn publish_reply(&self, text: &str, audio: Option<&[u8]>) -> Result<(), VoiceError> {
        self.ensure_connected()?;

        let audio_bytes = audio.map_or(0, <[u8]>::len);
        let packet = serde_json::to_vec(&ReplyPacket {
            kind: "assistant_reply",
            text,
            audio_bytes,
        })
        .map_err(|e| VoiceError::Config(format!("failed to encode reply packet: {}", e)))?;

        self.service
            .send_data(&self.room_name, packet, REPLY_TOPIC)
            .await?;

        if audio_bytes > 0 {
            info!(
                room = %self.room_name,
                audio_bytes,
                "handing reply audio to the agent audio track"
            );
        }

        Ok(())
    }

    async fn disconnect(&mut self) {
        if self.connected {
            info!(room = %self.room_name, "agent disconnecting from room");
            self.connected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LiveKitConfig;

    fn channel() -> LiveKitChannel {
        let service = VoiceService::new(LiveKitConfig::new(
            "http://localhost:7880",
            "devkey",
            "devsecret",
        ));
        LiveKitChannel::new(Arc::new(service), "room-1", "friday-assistant", "Friday")
    }

    #[tokio::test]
    async fn publish_before_connect_is_rejected() {
        let channel = channel();
        match channel.publish_reply("hello", None).await {
            Err(VoiceError::NotConnected(room)) => assert_eq!(room, "room-1"),
            other => panic!("expected NotConnected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn participants_before_connect_is_rejected() {
        let channel = channel();
        assert!(matches!(
            channel.participants().await,
            Err(VoiceError::NotConnected(_))
        ));
    }

    #[tokio::test]
    async fn disconnect_when_idle_is_a_no_op() {
        let mut channel = channel();
        channel.disconnect().await;
        assert!(!channel.is_connected());
    }
}
