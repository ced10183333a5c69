//! Shared button definitions for the SNES pad daemon.
//!
//! The SNES controller shifts out twelve button bits per latch pulse in a
//! fixed order. Everything downstream of the bus sampler is indexed by
//! that order, so it is defined once here.

/// Number of buttons clocked out per latch pulse.
pub const NUM_BUTTONS: usize = 12;

/// Number of controllable lights.
pub const NUM_LIGHTS: usize = 2;

/// Button identities in SNES shift-register order.
///
/// The discriminant of each variant is its bit position within a frame;
/// `ButtonId::ALL` iterates in exactly that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum ButtonId {
    B = 0,
    Y,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
    A,
    X,
    L,
    R,
}

impl ButtonId {
    /// All buttons, in shift-register (frame bit) order.
    pub const ALL: [ButtonId; NUM_BUTTONS] = [
        ButtonId::B,
        ButtonId::Y,
        ButtonId::Select,
        ButtonId::Start,
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::A,
        ButtonId::X,
        ButtonId::L,
        ButtonId::R,
    ];

    /// Bit position of this button within a frame.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label used in log output.
    pub fn label(self) -> &'static str {
        match self {
            ButtonId::B => "B",
            ButtonId::Y => "Y",
            ButtonId::Select => "Select",
            ButtonId::Start => "Start",
            ButtonId::Up => "Up",
            ButtonId::Down => "Down",
            ButtonId::Left => "Left",
            ButtonId::Right => "Right",
            ButtonId::A => "A",
            ButtonId::X => "X",
            ButtonId::L => "L",
            ButtonId::R => "R",
        }
    }
}

/// Controllable light identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Light {
    Light1 = 0,
    Light2,
}

impl Light {
    /// Index into per-light state arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label used in log output.
    pub fn label(self) -> &'static str {
        match self {
            Light::Light1 => "Light 1",
            Light::Light2 => "Light 2",
        }
    }
}

/// Button → Android keycode, indexed by frame bit position.
/// `None` = no TV action for that button.
pub static ADB_KEYMAP: [Option<&str>; NUM_BUTTONS] = [
    /* B */ Some("KEYCODE_BACK"),
    /* Y */ None,
    /* Select */ Some("KEYCODE_MENU"),
    /* Start */ Some("KEYCODE_TV_POWER"),
    /* Up */ Some("KEYCODE_DPAD_UP"),
    /* Down */ Some("KEYCODE_DPAD_DOWN"),
    /* Left */ Some("KEYCODE_DPAD_LEFT"),
    /* Right */ Some("KEYCODE_DPAD_RIGHT"),
    /* A */ Some("KEYCODE_ENTER"),
    /* X */ None,
    /* L */ Some("KEYCODE_PAGE_UP"),
    /* R */ Some("KEYCODE_PAGE_DOWN"),
];

/// Button → light toggle target, indexed by frame bit position.
/// At most one button per light.
pub static LIGHT_MAP: [Option<Light>; NUM_BUTTONS] = [
    /* B */ None,
    /* Y */ Some(Light::Light2),
    /* Select */ None,
    /* Start */ None,
    /* Up */ None,
    /* Down */ None,
    /* Left */ None,
    /* Right */ None,
    /* A */ None,
    /* X */ Some(Light::Light1),
    /* L */ None,
    /* R */ None,
];
