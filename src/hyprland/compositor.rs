//! [`Compositor`] implementation backed by Hyprland IPC.
//!
//! Talks to Hyprland through its Unix socket at
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`
//! instead of shelling out to `hyprctl`.

use crate::snapshot::{Client, CursorPosition, Monitor, Workspace};
use crate::traits::Compositor;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// Hyprland-backed compositor view.
///
/// No connection is kept open; every query is a short-lived request.
#[derive(Debug, Default)]
pub struct HyprlandCompositor;

/// Errors that can occur when talking to Hyprland.
#[derive(Debug, thiserror::Error)]
#[error("hyprland IPC error: {0}")]
pub struct HyprlandError(String);

impl HyprlandCompositor {
    pub fn new() -> Self {
        Self
    }
}

//  Direct Hyprland IPC helpers

/// Resolve the Hyprland command socket path.
fn socket_path() -> Result<PathBuf, HyprlandError> {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map_err(|_| HyprlandError("XDG_RUNTIME_DIR not set".into()))?;
    let his = std::env::var("HYPRLAND_INSTANCE_SIGNATURE")
        .map_err(|_| HyprlandError("HYPRLAND_INSTANCE_SIGNATURE not set (is Hyprland running?)".into()))?;
    Ok(PathBuf::from(format!("{}/hypr/{}/.socket.sock", runtime_dir, his)))
}

/// Send a raw request to the command socket and return the reply.
fn ipc_request(command: &str) -> Result<String, HyprlandError> {
    let path = socket_path()?;
    let mut stream = UnixStream::connect(&path)
        .map_err(|e| HyprlandError(format!("connect to {}: {}", path.display(), e)))?;

    stream
        .write_all(command.as_bytes())
        .map_err(|e| HyprlandError(format!("write: {}", e)))?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .map_err(|e| HyprlandError(format!("read: {}", e)))?;

    String::from_utf8(response).map_err(|e| HyprlandError(format!("utf-8: {}", e)))
}

/// Send a JSON data query (`j/<command>`) and return the raw JSON.
fn ipc_json(data_command: &str) -> Result<String, HyprlandError> {
    ipc_request(&format!("j/{}", data_command))
}

//  Wire structs

#[derive(Deserialize)]
struct WorkspaceJson {
    id: i64,
    name: String,
}

/// Subset of an entry of `j/monitors`.
#[derive(Deserialize)]
struct MonitorJson {
    id: i64,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    #[serde(rename = "activeWorkspace")]
    active_workspace: WorkspaceJson,
}

/// Subset of an entry of `j/clients`.
#[derive(Deserialize)]
struct ClientJson {
    address: String,
    mapped: bool,
    hidden: bool,
    at: (i32, i32),
    size: (i32, i32),
    workspace: WorkspaceJson,
    monitor: i64,
    #[serde(deserialize_with = "fullscreen_mode")]
    fullscreen: i32,
}

/// Reply of `j/cursorpos`.
#[derive(Deserialize)]
struct CursorJson {
    x: i32,
    y: i32,
}

/// Hyprland ≥ 0.42 reports the fullscreen mode as an integer; older
/// releases used a plain boolean.
fn fullscreen_mode<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Mode {
        Int(i32),
        Bool(bool),
    }
    match Mode::deserialize(deserializer) {
        Ok(Mode::Int(n)) => Ok(n),
        Ok(Mode::Bool(b)) => Ok(i32::from(b)),
        Err(_) => Err(DeError::custom("fullscreen: expected integer or boolean")),
    }
}

impl From<WorkspaceJson> for Workspace {
    fn from(w: WorkspaceJson) -> Self {
        Workspace { id: w.id, name: w.name }
    }
}

impl From<ClientJson> for Client {
    fn from(c: ClientJson) -> Self {
        Client {
            address: c.address,
            mapped: c.mapped,
            hidden: c.hidden,
            fullscreen: c.fullscreen,
            position: c.at,
            size: c.size,
            workspace: c.workspace.into(),
            monitor: c.monitor,
        }
    }
}

fn parse<'a, T: Deserialize<'a>>(what: &str, json: &'a str) -> Result<T, HyprlandError> {
    serde_json::from_str(json).map_err(|e| HyprlandError(format!("parse {}: {}", what, e)))
}

fn parse_monitors(json: &str) -> Result<Vec<MonitorJson>, HyprlandError> {
    parse("monitors", json)
}

fn parse_clients(json: &str) -> Result<Vec<Client>, HyprlandError> {
    let clients: Vec<ClientJson> = parse("clients", json)?;
    Ok(clients.into_iter().map(Client::from).collect())
}

fn parse_cursor(json: &str) -> Result<CursorPosition, HyprlandError> {
    let c: CursorJson = parse("cursorpos", json)?;
    Ok(CursorPosition { x: c.x, y: c.y })
}

//  Compositor implementation

impl Compositor for HyprlandCompositor {
    type Error = HyprlandError;

    fn monitors(&self) -> Result<Vec<Monitor>, Self::Error> {
        let monitors = parse_monitors(&ipc_json("monitors")?)?;
        Ok(monitors
            .into_iter()
            .map(|m| Monitor {
                id: m.id,
                x: m.x,
                y: m.y,
                width: m.width,
                height: m.height,
            })
            .collect())
    }

    fn clients(&self) -> Result<Vec<Client>, Self::Error> {
        parse_clients(&ipc_json("clients")?)
    }

    fn active_workspace_ids(&self) -> Result<Vec<i64>, Self::Error> {
        let monitors = parse_monitors(&ipc_json("monitors")?)?;
        Ok(monitors.into_iter().map(|m| m.active_workspace.id).collect())
    }

    fn cursor_position(&self) -> Result<CursorPosition, Self::Error> {
        parse_cursor(&ipc_json("cursorpos")?)
    }
}
