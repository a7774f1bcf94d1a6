use crate::engine::loading::resolver::ViewerState;
use crate::engine::viewer::events::ViewerCommand;
use crate::engine::viewer::session::{ViewerSession, ViewerStatus};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing traffic to the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the host messaging layer for iframe deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    notify_viewer_status,
                    send_outgoing_messages,
                )
                    .chain()
                    .before(crate::engine::viewer::commands::handle_viewer_commands),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available; host RPC disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Ownership moves to JS for the lifetime of the page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw message from the host page.
#[derive(Event)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    session: Res<ViewerSession>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut viewer_commands: EventWriter<ViewerCommand>,
) {
    let status = session.status();
    // Commands from earlier messages in this batch have not been applied yet.
    let mut viewer_open = status.state != ViewerState::Idle;
    let mut queued = Vec::new();

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) =
                    handle_rpc_request(&request, &status, &mut viewer_open, &mut queued)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
            }
        }
    }

    viewer_commands.write_batch(queued);
}

/// Handle one request, queueing viewer commands it implies.
///
/// Returns a response only for requests that carry an id.
pub fn handle_rpc_request(
    request: &RpcRequest,
    status: &ViewerStatus,
    viewer_open: &mut bool,
    queued: &mut Vec<ViewerCommand>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "open_viewer" => handle_open_viewer(&request.params, viewer_open, queued),
        "close_viewer" => {
            *viewer_open = false;
            queued.push(ViewerCommand::Close);
            Ok(serde_json::json!({ "success": true }))
        }
        "set_local_override" => handle_set_local_override(&request.params, *viewer_open, queued),
        "clear_local_override" => {
            if *viewer_open {
                queued.push(ViewerCommand::ClearLocalOverride);
                Ok(serde_json::json!({ "success": true }))
            } else {
                Err(RpcError::invalid_params("No viewer is open"))
            }
        }
        "get_viewer_status" => serde_json::to_value(status)
            .map_err(|e| RpcError::internal_error(&format!("Failed to encode status: {e}"))),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    // Notifications get no reply.
    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn handle_open_viewer(
    params: &serde_json::Value,
    viewer_open: &mut bool,
    queued: &mut Vec<ViewerCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct OpenViewerParams {
        name: String,
        #[serde(default)]
        model_url: Option<String>,
    }

    let open_params = serde_json::from_value::<OpenViewerParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'name' and optional 'model_url'"))?;

    info!("Open viewer requested over RPC: {}", open_params.name);
    *viewer_open = true;
    queued.push(ViewerCommand::Open {
        display_name: open_params.name.clone(),
        reference: open_params.model_url,
    });

    Ok(serde_json::json!({
        "success": true,
        "name": open_params.name
    }))
}

fn handle_set_local_override(
    params: &serde_json::Value,
    viewer_open: bool,
    queued: &mut Vec<ViewerCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct OverrideParams {
        path: String,
    }

    let override_params = serde_json::from_value::<OverrideParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'path' parameter"))?;
    if !viewer_open {
        return Err(RpcError::invalid_params("No viewer is open"));
    }
    if override_params.path.trim().is_empty() {
        return Err(RpcError::invalid_params("'path' must not be blank"));
    }

    queued.push(ViewerCommand::SetLocalOverride {
        path: override_params.path.clone(),
    });

    Ok(serde_json::json!({
        "success": true,
        "path": override_params.path
    }))
}

/// Push the status to the host whenever it changes.
fn notify_viewer_status(
    session: Res<ViewerSession>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut last_sent: Local<Option<ViewerStatus>>,
) {
    let status = session.status();
    if last_sent.as_ref() == Some(&status) {
        return;
    }
    match serde_json::to_value(&status) {
        Ok(params) => rpc_interface.send_notification("viewer_status", params),
        Err(e) => error!("Failed to encode viewer status: {}", e),
    }
    *last_sent = Some(status);
}

fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: Some(serde_json::json!(7)),
        }
    }

    #[test]
    fn open_then_override_in_one_batch_is_accepted() {
        let status = ViewerStatus::default();
        let mut open = false;
        let mut queued = Vec::new();

        let opened = handle_rpc_request(
            &request(
                "open_viewer",
                serde_json::json!({"name": "Scout", "model_url": "T-001.glb"}),
            ),
            &status,
            &mut open,
            &mut queued,
        );
        let overridden = handle_rpc_request(
            &request("set_local_override", serde_json::json!({"path": "mine.glb"})),
            &status,
            &mut open,
            &mut queued,
        );

        assert!(opened.and_then(|r| r.result).is_some());
        assert!(overridden.and_then(|r| r.result).is_some());
        assert_eq!(
            queued,
            vec![
                ViewerCommand::Open {
                    display_name: "Scout".into(),
                    reference: Some("T-001.glb".into()),
                },
                ViewerCommand::SetLocalOverride {
                    path: "mine.glb".into()
                },
            ]
        );
    }

    #[test]
    fn override_is_rejected_while_closed() {
        let mut open = false;
        let mut queued = Vec::new();

        let response = handle_rpc_request(
            &request("set_local_override", serde_json::json!({"path": "mine.glb"})),
            &ViewerStatus::default(),
            &mut open,
            &mut queued,
        );

        let error = response.and_then(|r| r.error).map(|e| e.code);
        assert_eq!(error, Some(-32602));
        assert!(queued.is_empty());
    }

    #[test]
    fn clearing_the_override_is_rejected_while_closed() {
        let mut open = false;
        let mut queued = Vec::new();

        let response = handle_rpc_request(
            &request("clear_local_override", serde_json::Value::Null),
            &ViewerStatus::default(),
            &mut open,
            &mut queued,
        );

        let error = response.and_then(|r| r.error).map(|e| e.code);
        assert_eq!(error, Some(-32602));
        assert!(queued.is_empty());
    }

    #[test]
    fn unknown_method_reports_method_not_found() {
        let response = handle_rpc_request(
            &request("spin_faster", serde_json::Value::Null),
            &ViewerStatus::default(),
            &mut false,
            &mut Vec::new(),
        );

        assert_eq!(response.and_then(|r| r.error).map(|e| e.code), Some(-32601));
    }

    #[test]
    fn status_is_returned_as_json() {
        let status = ViewerStatus {
            display_name: "Scout".into(),
            trace: "Loaded from: T-001.glb".into(),
            ..Default::default()
        };

        let response = handle_rpc_request(
            &request("get_viewer_status", serde_json::Value::Null),
            &status,
            &mut false,
            &mut Vec::new(),
        );

        let result = response.and_then(|r| r.result).unwrap_or_default();
        assert_eq!(result["display_name"], "Scout");
        assert_eq!(result["state"]["kind"], "idle");
        assert_eq!(result["using_fallback"], false);
    }

    #[test]
    fn notifications_without_id_still_act_but_get_no_reply() {
        let mut queued = Vec::new();
        let mut close = request("close_viewer", serde_json::Value::Null);
        close.id = None;

        let response = handle_rpc_request(&close, &ViewerStatus::default(), &mut true, &mut queued);

        assert!(response.is_none());
        assert_eq!(queued, vec![ViewerCommand::Close]);
    }
}
