use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::{CreateRoomOptions, RoomClient, SendDataOptions};
use livekit_protocol::{ParticipantInfo, Room};

/// Server-side access to the LiveKit room service.
#[derive(Debug)]
pub struct VoiceService {
    config: LiveKitConfig,
    room_client: RoomClient,
}

impl VoiceService {
    pub fn new(config: LiveKitConfig) -> Self {
        let room_client =
            RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self {
            config,
            room_client,
        }
    }

    pub fn get_url(&self) -> &str {
        &self.config.url
    }

    /// Creates the room, or returns it unchanged if it already exists.
    pub async fn create_room(&self, name: &str) -> Result<Room, VoiceError> {
        let options = CreateRoomOptions::default();

        self.room_client
            .create_room(name, options)
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }

    /// Lists every active room on the server.
    pub async fn list_rooms(&self) -> Result<Vec<Room>, VoiceError> {
        self.room_client
            .list_rooms(Vec::new())
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }

    pub fn generate_join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
        participant_name: &str,
    ) -> Result<String, VoiceError> {
        self.generate_token(room_name, participant_identity, participant_name, None)
    }

    /// Generates a join token for the assistant itself.
    ///
    /// `metadata` is attached to the participant and visible to everyone in
    /// the room.
    pub fn generate_agent_token(
        &self,
        room_name: &str,
        identity: &str,
        display_name: &str,
        metadata: &str,
    ) -> Result<String, VoiceError> {
        self.generate_token(room_name, identity, display_name, Some(metadata))
    }

    fn generate_token(
        &self,
        room_name: &str,
        identity: &str,
        name: &str,
        metadata: Option<&str>,
    ) -> Result<String, VoiceError> {
        let mut token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(identity)
            .with_name(name)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: Some(true),
                can_subscribe: Some(true),
                can_publish_data: Some(true),
                ..Default::default()
            })
            .with_ttl(self.config.token_ttl);

        if let Some(metadata) = metadata {
            token = token.with_metadata(metadata);
        }

        token.to_jwt().map_err(VoiceError::LiveKit)
    }

    pub async fn list_participants(
        &self,
        room_name: &str,
    ) -> Result<Vec<ParticipantInfo>, VoiceError> {
        self.room_client
            .list_participants(room_name)
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }

    /// Sends a reliable data packet to every participant in the room.
    pub async fn send_data(
        &self,
        room_name: &str,
        payload: Vec<u8>,
        topic: &str,
    ) -> Result<(), VoiceError> {
        let options = SendDataOptions {
            topic: Some(topic.to_string()),
            ..Default::default()
        };

        self.room_client
            .send_data(room_name, payload, options)
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }
}
