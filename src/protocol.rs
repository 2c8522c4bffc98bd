use crate::game::types::{Direction, GameStateSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
  #[serde(rename = "join")]
  Join {
    #[serde(rename = "playerName", default)]
    player_name: Option<String>,
  },
  #[serde(rename = "direction")]
  Direction { direction: Direction },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
  #[serde(rename = "gameState")]
  GameState(GameStateSnapshot),
}

/// Malformed or unknown messages decode to `None` and are dropped by the caller.
pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  match serde_json::from_str::<ClientMessage>(text) {
    Ok(message) => Some(message),
    Err(error) => {
      tracing::debug!(%error, "discarding malformed client message");
      None
    }
  }
}

pub fn encode_game_state(snapshot: GameStateSnapshot) -> serde_json::Result<String> {
  serde_json::to_string(&ServerMessage::GameState(snapshot))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::types::{DeathReason, PlayerState, Point};
  use serde_json::{json, Value};

  #[test]
  fn decodes_join_with_and_without_name() {
    assert_eq!(
      decode_client_message(r#"{"type":"join","playerName":"Ada"}"#),
      Some(ClientMessage::Join {
        player_name: Some("Ada".to_string())
      })
    );
    assert_eq!(
      decode_client_message(r#"{"type":"join"}"#),
      Some(ClientMessage::Join { player_name: None })
    );
  }

  #[test]
  fn decodes_direction() {
    assert_eq!(
      decode_client_message(r#"{"type":"direction","direction":"left"}"#),
      Some(ClientMessage::Direction {
        direction: Direction::Left
      })
    );
  }

  #[test]
  fn rejects_malformed_messages() {
    assert_eq!(decode_client_message("not json"), None);
    assert_eq!(decode_client_message(r#"{"type":"respawn"}"#), None);
    assert_eq!(
      decode_client_message(r#"{"type":"direction","direction":"north"}"#),
      None
    );
    assert_eq!(decode_client_message(r#"{"direction":"up"}"#), None);
  }

  #[test]
  fn game_state_uses_wire_field_names() {
    let snapshot = GameStateSnapshot {
      players: vec![
        PlayerState {
          id: "a".to_string(),
          name: "Alive".to_string(),
          snake: vec![Point::new(1, 2), Point::new(1, 3)],
          color: "#FF6B6B".to_string(),
          score: 4,
          alive: true,
          death_reason: None,
          killer_name: None,
        },
        PlayerState {
          id: "b".to_string(),
          name: "Dead".to_string(),
          snake: vec![Point::new(7, 7)],
          color: "#4ECDC4".to_string(),
          score: 0,
          alive: false,
          death_reason: Some(DeathReason::Eaten),
          killer_name: Some("Alive".to_string()),
        },
      ],
      foods: vec![Point::new(9, 9)],
      grid_width: 50,
      grid_height: 50,
    };

    let encoded = encode_game_state(snapshot).expect("encode");
    let value: Value = serde_json::from_str(&encoded).expect("valid json");
    assert_eq!(
      value,
      json!({
        "type": "gameState",
        "players": [
          {
            "id": "a",
            "name": "Alive",
            "snake": [{"x": 1, "y": 2}, {"x": 1, "y": 3}],
            "color": "#FF6B6B",
            "score": 4,
            "alive": true
          },
          {
            "id": "b",
            "name": "Dead",
            "snake": [{"x": 7, "y": 7}],
            "color": "#4ECDC4",
            "score": 0,
            "alive": false,
            "deathReason": "eaten",
            "killerName": "Alive"
          }
        ],
        "foods": [{"x": 9, "y": 9}],
        "gridWidth": 50,
        "gridHeight": 50
      })
    );
  }
}
