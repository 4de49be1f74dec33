use serde::{Deserialize, Serialize};

use crate::color::{Rgb, Rgba};

/// Protocol version - increment when making breaking changes.
pub const PROTOCOL_VERSION: u32 = 1;

// === Server -> Viewer ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMsg {
    #[serde(rename = "welcome")]
    Welcome(WelcomeMsg),
    #[serde(rename = "scene_state")]
    SceneState(SceneStateMsg),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeMsg {
    pub protocol_version: u32,
    pub server_version: String,
    pub viewport: [f64; 2],
    pub launchers: Vec<LauncherWire>,
}

/// Static launcher layout, sent once per viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherWire {
    pub id: String,
    pub pos: [f64; 2],
    pub min_angle: f64,
    pub max_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub inner: Rgba,
    pub border: Rgba,
    pub wave: Rgba,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneStateMsg {
    pub time: f64,
    pub launchers: Vec<LauncherStateWire>,
    pub travelers: Vec<TravelerWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherStateWire {
    pub id: String,
    pub ready: bool,
    /// Radii of the active idle waves
    pub waves: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerWire {
    pub origin: [f64; 2],
    pub pos: [f64; 2],
    pub radius: f64,
    pub color: Rgb,
    pub alpha: u8,
}

// === Viewer -> Server ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMsg {
    /// Debug launch on launcher "1" at position `digit / 10`.
    #[serde(rename = "trigger")]
    Trigger { digit: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_msg_welcome_roundtrip() {
        let msg = ServerMsg::Welcome(WelcomeMsg {
            protocol_version: PROTOCOL_VERSION,
            server_version: "0.1.0".to_string(),
            viewport: [1920.0, 1080.0],
            launchers: vec![LauncherWire {
                id: "1".to_string(),
                pos: [300.0, 500.0],
                min_angle: -60.0,
                max_angle: 60.0,
                inner_radius: 50.0,
                outer_radius: 60.0,
                inner: Rgba::new(240, 240, 240, 255),
                border: Rgba::new(215, 185, 140, 255),
                wave: Rgba::new(255, 222, 166, 128),
            }],
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"welcome\""));
        assert!(json.contains("\"protocolVersion\":1"));
        assert!(json.contains("\"wave\":\"255,222,166,128\""));
        let parsed: ServerMsg = serde_json::from_str(&json).unwrap();
        match parsed {
            ServerMsg::Welcome(w) => {
                assert_eq!(w.protocol_version, PROTOCOL_VERSION);
                assert_eq!(w.launchers.len(), 1);
                assert_eq!(w.launchers[0].border, Rgba::new(215, 185, 140, 255));
            }
            _ => panic!("Expected Welcome"),
        }
    }

    #[test]
    fn server_msg_scene_state_roundtrip() {
        let msg = ServerMsg::SceneState(SceneStateMsg {
            time: 12.5,
            launchers: vec![LauncherStateWire {
                id: "1".to_string(),
                ready: true,
                waves: vec![60.0, 123.5],
            }],
            travelers: vec![TravelerWire {
                origin: [300.0, 500.0],
                pos: [420.0, 500.0],
                radius: 12.0,
                color: Rgb::new(10, 200, 30),
                alpha: 255,
            }],
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"scene_state\""));
        let parsed: ServerMsg = serde_json::from_str(&json).unwrap();
        match parsed {
            ServerMsg::SceneState(s) => {
                assert_eq!(s.travelers.len(), 1);
                assert_eq!(s.travelers[0].color, Rgb::new(10, 200, 30));
                assert_eq!(s.launchers[0].waves.len(), 2);
            }
            _ => panic!("Expected SceneState"),
        }
    }

    #[test]
    fn client_msg_trigger_roundtrip() {
        let json = r#"{"type":"trigger","digit":5}"#;
        let parsed: ClientMsg = serde_json::from_str(json).unwrap();
        match parsed {
            ClientMsg::Trigger { digit } => assert_eq!(digit, 5),
        }
        assert_eq!(
            serde_json::to_string(&ClientMsg::Trigger { digit: 5 }).unwrap(),
            json
        );
    }

    #[test]
    fn unknown_client_msg_rejected() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"ball_escaped"}"#).is_err());
    }
}
