pub mod ssh;

use async_trait::async_trait;
use std::fmt;

use crate::models::Device;

pub use ssh::SshConnector;

/// Which step of talking to a device failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    Connect,
    Auth,
    Command,
    Config,
    Disconnect,
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStage::Connect => "connect",
            SessionStage::Auth => "authentication",
            SessionStage::Command => "command",
            SessionStage::Config => "config",
            SessionStage::Disconnect => "disconnect",
        };
        f.write_str(s)
    }
}

/// Typed error for remote session failures, so callers can turn any of them
/// into a single report row without string matching.
#[derive(Debug, Clone)]
pub struct SessionError {
    pub stage: SessionStage,
    pub message: String,
}

impl SessionError {
    pub fn new(stage: SessionStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)
    }
}

impl std::error::Error for SessionError {}

/// An open CLI session on a network device
#[async_trait]
pub trait RemoteSession: Send {
    /// Run one exec-mode command and return its raw output
    async fn send_command(&mut self, command: &str) -> Result<String, SessionError>;

    /// Enter configuration mode, send each line in order, and leave configuration mode
    async fn send_config_set(&mut self, commands: &[String]) -> Result<String, SessionError>;

    async fn disconnect(&mut self) -> Result<(), SessionError>;
}

/// Opens sessions for inventory devices
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, device: &Device) -> Result<Box<dyn RemoteSession>, SessionError>;
}

/// Close a session after use. A failing disconnect is logged, never propagated.
pub async fn close_session(mut session: Box<dyn RemoteSession>, device: &str) {
    if let Err(e) = session.disconnect().await {
        tracing::warn!("Failed to disconnect from {}: {}", device, e);
    }
}

#[cfg(test)]
pub mod mock {
    //! Scripted sessions for job tests

    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Everything a mock session was asked to do, shared with the test
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub connects: Vec<String>,
        pub commands: Vec<String>,
        pub config_sets: Vec<Vec<String>>,
        pub disconnects: usize,
    }

    /// Connector whose sessions answer commands from a fixed table
    #[derive(Clone, Default)]
    pub struct MockConnector {
        pub responses: HashMap<String, String>,
        /// Devices (by address) that refuse the connection
        pub refuse: Vec<String>,
        /// Commands that fail once connected
        pub failing_commands: Vec<String>,
        /// Every config set is rejected by the device
        pub reject_config: bool,
        /// Closing the session fails
        pub fail_disconnect: bool,
        pub recorder: Arc<Mutex<Recorder>>,
    }

    impl MockConnector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, command: &str, output: &str) -> Self {
            self.responses.insert(command.to_string(), output.to_string());
            self
        }

        pub fn refuse(mut self, address: &str) -> Self {
            self.refuse.push(address.to_string());
            self
        }

        pub fn fail_command(mut self, command: &str) -> Self {
            self.failing_commands.push(command.to_string());
            self
        }

        pub fn fail_config(mut self) -> Self {
            self.reject_config = true;
            self
        }

        pub fn fail_disconnect(mut self) -> Self {
            self.fail_disconnect = true;
            self
        }

        pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorder> {
            self.recorder.lock().unwrap()
        }
    }

    #[async_trait]
    impl Connector for MockConnector {
        async fn connect(&self, device: &Device) -> Result<Box<dyn RemoteSession>, SessionError> {
            self.recorder
                .lock()
                .unwrap()
                .connects
                .push(device.address().to_string());
            if self.refuse.iter().any(|a| a == device.address()) {
                return Err(SessionError::new(SessionStage::Connect, "connection refused"));
            }
            Ok(Box::new(MockSession {
                responses: self.responses.clone(),
                failing_commands: self.failing_commands.clone(),
                reject_config: self.reject_config,
                fail_disconnect: self.fail_disconnect,
                recorder: self.recorder.clone(),
            }))
        }
    }

    pub struct MockSession {
        responses: HashMap<String, String>,
        failing_commands: Vec<String>,
        reject_config: bool,
        fail_disconnect: bool,
        recorder: Arc<Mutex<Recorder>>,
    }

    #[async_trait]
    impl RemoteSession for MockSession {
        async fn send_command(&mut self, command: &str) -> Result<String, SessionError> {
            self.recorder.lock().unwrap().commands.push(command.to_string());
            if self.failing_commands.iter().any(|c| c == command) {
                return Err(SessionError::new(SessionStage::Command, "channel closed"));
            }
            Ok(self.responses.get(command).cloned().unwrap_or_default())
        }

        async fn send_config_set(&mut self, commands: &[String]) -> Result<String, SessionError> {
            self.recorder.lock().unwrap().config_sets.push(commands.to_vec());
            if self.reject_config {
                return Err(SessionError::new(
                    SessionStage::Config,
                    "device rejected config (Invalid input detected)",
                ));
            }
            Ok(String::new())
        }

        async fn disconnect(&mut self) -> Result<(), SessionError> {
            self.recorder.lock().unwrap().disconnects += 1;
            if self.fail_disconnect {
                return Err(SessionError::new(SessionStage::Disconnect, "socket already closed"));
            }
            Ok(())
        }
    }
}
