use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::SessionSnapshot;

/// Response for a freshly created session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub state: SessionSnapshot,
}

/// Body of the start-game request. A missing or blank name gets a generated one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    #[serde(default)]
    pub player_name: Option<String>,
}
