//! Light publishing by shelling out to `mosquitto_pub`.
//!
//! One short-lived child per publish, output discarded. The broker
//! handshake latency lives entirely in the child, so the read loop never
//! waits on the network.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::config::MqttConfig;
use crate::dispatch::LightPublisher;

pub struct MosquittoPublisher {
    command: PathBuf,
    host: String,
    port: u16,
    user: String,
    password: String,
    children: Vec<Child>,
}

impl MosquittoPublisher {
    pub fn new(config: &MqttConfig) -> Self {
        Self::with_command("mosquitto_pub".into(), config)
    }

    fn with_command(command: PathBuf, config: &MqttConfig) -> Self {
        Self {
            command,
            host: config.host.clone(),
            port: config.port,
            user: config.user.clone(),
            password: config.password.clone(),
            children: Vec::new(),
        }
    }

    /// Collect any children that have already exited. Called on each
    /// publish so zombies never accumulate between fires.
    fn reap(&mut self) {
        self.children
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl LightPublisher for MosquittoPublisher {
    fn publish(&mut self, topic: &str, payload: &str) {
        self.reap();

        let port = self.port.to_string();
        let spawned = Command::new(&self.command)
            .args(["-h", &self.host, "-p", &port])
            .args(["-u", &self.user, "-P", &self.password])
            .args(["-t", topic, "-m", payload])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => self.children.push(child),
            Err(err) => debug!("light publish dropped: {err}"),
        }
    }
}
