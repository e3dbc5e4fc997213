use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use shared::error::{ErrorCode, HostException};

use crate::WebUiChannel;

#[derive(Default)]
pub struct RecordingChannel {
    pub sent: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
    pub dialog_arguments: Option<String>,
    pub response: Option<Value>,
}

impl RecordingChannel {
    pub fn messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("sent")
            .iter()
            .map(|(message, _)| message.clone())
            .collect()
    }
}

#[async_trait]
impl WebUiChannel for RecordingChannel {
    fn send(&self, message: &str, args: Vec<Value>) {
        self.sent
            .lock()
            .expect("sent")
            .push((message.to_string(), args));
    }

    async fn send_with_promise(
        &self,
        message: &str,
        args: Vec<Value>,
    ) -> Result<Value, HostException> {
        self.send(message, args);
        self.response
            .clone()
            .ok_or_else(|| HostException::new(ErrorCode::Unavailable, "no handler registered"))
    }

    fn variable_value(&self, name: &str) -> Option<String> {
        (name == "dialogArguments")
            .then(|| self.dialog_arguments.clone())
            .flatten()
    }
}
