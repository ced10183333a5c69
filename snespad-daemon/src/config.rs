//! MQTT configuration from the environment.
//!
//! All six variables are required; the daemon refuses to start without
//! them. Names match the existing `.env` contract, lowercase topic
//! suffixes included.

use std::env;

use anyhow::{bail, Context, Result};

/// Required environment variables, in usage-message order.
const REQUIRED_VARS: [&str; 6] = [
    "MQTT_HOST",
    "MQTT_PORT",
    "MQTT_USER",
    "MQTT_PASS",
    "MQTT_topic_light1",
    "MQTT_topic_light2",
];

/// Broker connection and per-light topic settings.
#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Topics indexed by `Light`.
    pub light_topics: [String; snespad_buttons::NUM_LIGHTS],
}

impl MqttConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load through an arbitrary lookup, so tests never touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| match lookup(name) {
            Some(value) => value,
            None => {
                missing.push(name);
                String::new()
            }
        };

        let host = get("MQTT_HOST");
        let port_raw = get("MQTT_PORT");
        let user = get("MQTT_USER");
        let password = get("MQTT_PASS");
        let topic_light1 = get("MQTT_topic_light1");
        let topic_light2 = get("MQTT_topic_light2");

        if !missing.is_empty() {
            bail!(
                "missing environment variables: {}. Source your .env first; required: {}",
                missing.join(", "),
                REQUIRED_VARS.join(" ")
            );
        }

        let port = port_raw
            .parse::<u16>()
            .with_context(|| format!("MQTT_PORT '{port_raw}' is not a valid port"))?;

        Ok(Self {
            host,
            port,
            user,
            password,
            light_topics: [topic_light1, topic_light2],
        })
    }
}
