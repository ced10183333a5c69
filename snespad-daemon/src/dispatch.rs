//! Action dispatch: fired buttons → light toggles and TV keycodes.
//!
//! Both actuators are fire-and-forget. Implementations swallow their own
//! I/O failures; a dropped toggle is preferable to stalling the read
//! loop.

use snespad_buttons::{ButtonId, Light, ADB_KEYMAP, LIGHT_MAP, NUM_BUTTONS, NUM_LIGHTS};
use tracing::info;

use crate::debounce::FiredEvent;

/// Outbound light-control capability.
pub trait LightPublisher {
    fn publish(&mut self, topic: &str, payload: &str);
}

/// Outbound TV remote capability.
pub trait KeycodeSink {
    fn send_keycode(&mut self, code: &str);
}

/// One side effect derived from a fired button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorRequest {
    Light { light: Light, on: bool },
    Keycode(&'static str),
}

/// Maps fired buttons to actuator requests and delivers them.
///
/// Owns the per-light on/off state; there is no read-back from the
/// actual lights, so these booleans are the source of truth.
pub struct Dispatcher<P, K> {
    publisher: P,
    keycodes: K,
    light_topics: [String; NUM_LIGHTS],
    light_on: [bool; NUM_LIGHTS],
    light_map: &'static [Option<Light>; NUM_BUTTONS],
    adb_keymap: &'static [Option<&'static str>; NUM_BUTTONS],
}

impl<P: LightPublisher, K: KeycodeSink> Dispatcher<P, K> {
    pub fn new(publisher: P, keycodes: K, light_topics: [String; NUM_LIGHTS]) -> Self {
        Self::with_tables(publisher, keycodes, light_topics, &LIGHT_MAP, &ADB_KEYMAP)
    }

    pub fn with_tables(
        publisher: P,
        keycodes: K,
        light_topics: [String; NUM_LIGHTS],
        light_map: &'static [Option<Light>; NUM_BUTTONS],
        adb_keymap: &'static [Option<&'static str>; NUM_BUTTONS],
    ) -> Self {
        Self {
            publisher,
            keycodes,
            light_topics,
            light_on: [false; NUM_LIGHTS],
            light_map,
            adb_keymap,
        }
    }

    /// Consult both tables unconditionally and toggle light state.
    /// A button may produce zero, one, or two requests.
    fn requests_for(&mut self, button: ButtonId) -> Vec<ActuatorRequest> {
        let mut requests = Vec::with_capacity(2);

        if let Some(light) = self.light_map[button.index()] {
            let on = !self.light_on[light.index()];
            self.light_on[light.index()] = on;
            requests.push(ActuatorRequest::Light { light, on });
        }

        if let Some(code) = self.adb_keymap[button.index()] {
            requests.push(ActuatorRequest::Keycode(code));
        }

        requests
    }

    /// Deliver the requests for one fired button and log the result.
    pub fn handle(&mut self, event: &FiredEvent) {
        let mut line = format!("Pressed: {}", event.button.label());

        for request in self.requests_for(event.button) {
            match request {
                ActuatorRequest::Light { light, on } => {
                    let payload = if on { "ON" } else { "OFF" };
                    self.publisher
                        .publish(&self.light_topics[light.index()], payload);
                    line.push_str(&format!(" → {} {payload}", light.label()));
                }
                ActuatorRequest::Keycode(code) => {
                    self.keycodes.send_keycode(code);
                    line.push_str(&format!(" → {code}"));
                }
            }
        }

        info!("{line}");
    }
}
