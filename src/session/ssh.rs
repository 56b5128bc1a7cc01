use async_trait::async_trait;
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::{Connector, RemoteSession, SessionError, SessionStage};
use crate::models::Device;

/// Keyboard-interactive prompt handler that always responds with the password
struct PasswordPrompt {
    password: String,
}

impl ssh2::KeyboardInteractivePrompt for PasswordPrompt {
    fn prompt<'a>(
        &mut self,
        _username: &str,
        _instructions: &str,
        prompts: &[ssh2::Prompt<'a>],
    ) -> Vec<String> {
        prompts.iter().map(|_| self.password.clone()).collect()
    }
}

/// Markers IOS-style CLIs print when a config line is rejected
const CONFIG_ERROR_MARKERS: &[&str] = &["% Invalid input", "% Incomplete command", "% Ambiguous command"];

/// Opens libssh2 sessions with password / keyboard-interactive auth
#[derive(Debug, Clone)]
pub struct SshConnector {
    port: u16,
    timeout_secs: u64,
}

impl SshConnector {
    pub fn new(port: u16, timeout_secs: u64) -> Self {
        Self { port, timeout_secs }
    }
}

#[async_trait]
impl Connector for SshConnector {
    async fn connect(&self, device: &Device) -> Result<Box<dyn RemoteSession>, SessionError> {
        let host = device.address().to_string();
        let user = device.username.clone();
        let pass = device.password.clone();
        let port = self.port;
        let timeout_secs = self.timeout_secs;

        tracing::debug!(
            "Opening SSH session to {}:{} as {} ({})",
            host,
            port,
            user,
            if device.device_type.is_empty() { "generic" } else { device.device_type.as_str() }
        );

        let session = tokio::task::spawn_blocking(move || {
            ssh_connect(&host, port, &user, &pass, timeout_secs)
        })
        .await
        .map_err(|e| SessionError::new(SessionStage::Connect, format!("task join error: {}", e)))??;

        Ok(Box::new(SshSession { session }))
    }
}

/// Create an SSH session and authenticate with password + keyboard-interactive.
/// This is blocking, so call from a spawn_blocking context.
fn ssh_connect(
    host: &str,
    port: u16,
    user: &str,
    pass: &str,
    timeout_secs: u64,
) -> Result<ssh2::Session, SessionError> {
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|e| SessionError::new(SessionStage::Connect, format!("invalid address {}: {}", host, e)))?
        .next()
        .ok_or_else(|| SessionError::new(SessionStage::Connect, format!("no address for {}", host)))?;

    let tcp = TcpStream::connect_timeout(&addr, Duration::from_secs(timeout_secs))
        .map_err(|e| SessionError::new(SessionStage::Connect, format!("TCP connection failed: {}", e)))?;

    tcp.set_read_timeout(Some(Duration::from_secs(timeout_secs))).ok();
    tcp.set_write_timeout(Some(Duration::from_secs(timeout_secs))).ok();

    let mut session = ssh2::Session::new()
        .map_err(|e| SessionError::new(SessionStage::Connect, format!("failed to create SSH session: {}", e)))?;
    session.set_tcp_stream(tcp);
    session.set_timeout(timeout_millis(timeout_secs));
    session
        .handshake()
        .map_err(|e| SessionError::new(SessionStage::Connect, format!("SSH handshake failed: {}", e)))?;

    // Try password auth first
    match session.userauth_password(user, pass) {
        Ok(_) if session.authenticated() => return Ok(session),
        _ => {}
    }

    // Keyboard-interactive is what many switch OSes offer instead
    let mut prompter = PasswordPrompt {
        password: pass.to_string(),
    };
    let _ = session.userauth_keyboard_interactive(user, &mut prompter);

    if session.authenticated() {
        Ok(session)
    } else {
        Err(SessionError::new(SessionStage::Auth, "all methods exhausted"))
    }
}

/// Read a channel to EOF. Device output is not guaranteed to be UTF-8
/// (Latin-1 port descriptions), so invalid bytes are replaced.
fn read_lossy<R: Read>(reader: &mut R) -> std::io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// libssh2 timeout in milliseconds, clamped to what it accepts
fn timeout_millis(timeout_secs: u64) -> u32 {
    u32::try_from(timeout_secs.saturating_mul(1000)).unwrap_or(u32::MAX)
}

/// Run one command on its own exec channel
fn exec_command(session: &ssh2::Session, command: &str) -> Result<String, SessionError> {
    let fail = |what: &str, e: ssh2::Error| SessionError::new(SessionStage::Command, format!("{}: {}", what, e));

    let mut channel = session
        .channel_session()
        .map_err(|e| fail("failed to open channel", e))?;
    channel
        .exec(command)
        .map_err(|e| fail("failed to execute command", e))?;

    let output = read_lossy(&mut channel)
        .map_err(|e| SessionError::new(SessionStage::Command, format!("failed to read output: {}", e)))?;
    channel
        .wait_close()
        .map_err(|e| fail("failed to close channel", e))?;

    Ok(output)
}

/// Build the text typed into an interactive shell for a config set
fn config_script(commands: &[String]) -> String {
    let mut script = String::from("terminal length 0\nconfigure terminal\n");
    for cmd in commands {
        script.push_str(cmd);
        script.push('\n');
    }
    let ends_config = commands
        .last()
        .map_or(false, |c| c.trim().eq_ignore_ascii_case("end"));
    if !ends_config {
        script.push_str("end\n");
    }
    script.push_str("exit\n");
    script
}

/// Send a config set over an interactive shell (network devices need a PTY for config mode)
fn shell_config_set(session: &ssh2::Session, commands: &[String]) -> Result<String, SessionError> {
    let fail = |what: &str, e: ssh2::Error| SessionError::new(SessionStage::Config, format!("{}: {}", what, e));

    let mut channel = session
        .channel_session()
        .map_err(|e| fail("failed to open channel", e))?;
    channel
        .request_pty("vt100", None, None)
        .map_err(|e| fail("failed to request PTY", e))?;
    channel.shell().map_err(|e| fail("failed to start shell", e))?;

    channel
        .write_all(config_script(commands).as_bytes())
        .map_err(|e| SessionError::new(SessionStage::Config, format!("failed to send config: {}", e)))?;
    channel.send_eof().ok();

    let output = read_lossy(&mut channel)
        .map_err(|e| SessionError::new(SessionStage::Config, format!("failed to read output: {}", e)))?;
    let _ = channel.wait_close();

    if let Some(marker) = CONFIG_ERROR_MARKERS.iter().find(|m| output.contains(*m)) {
        return Err(SessionError::new(
            SessionStage::Config,
            format!("device rejected config ({})", marker.trim_start_matches("% ")),
        ));
    }

    Ok(output)
}

/// An authenticated libssh2 session
pub struct SshSession {
    session: ssh2::Session,
}

#[async_trait]
impl RemoteSession for SshSession {
    async fn send_command(&mut self, command: &str) -> Result<String, SessionError> {
        let session = self.session.clone();
        let command = command.to_string();
        tokio::task::spawn_blocking(move || exec_command(&session, &command))
            .await
            .map_err(|e| SessionError::new(SessionStage::Command, format!("task join error: {}", e)))?
    }

    async fn send_config_set(&mut self, commands: &[String]) -> Result<String, SessionError> {
        let session = self.session.clone();
        let commands = commands.to_vec();
        tokio::task::spawn_blocking(move || shell_config_set(&session, &commands))
            .await
            .map_err(|e| SessionError::new(SessionStage::Config, format!("task join error: {}", e)))?
    }

    async fn disconnect(&mut self) -> Result<(), SessionError> {
        let session = self.session.clone();
        tokio::task::spawn_blocking(move || session.disconnect(None, "netops done", None))
            .await
            .map_err(|e| SessionError::new(SessionStage::Disconnect, format!("task join error: {}", e)))?
            .map_err(|e| SessionError::new(SessionStage::Disconnect, e.to_string()))
    }
}
