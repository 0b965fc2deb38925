//! # Platform Layer
//!
//! Window and input collaborators for the frame loop. A [`Platform`] is chosen
//! once at startup from [`AppConfig::platform`] and owns the loop from then on:
//!
//! - [`WinitBackend`] opens a real window and presents through a wgpu surface.
//! - [`HeadlessBackend`] renders into an offscreen texture for a fixed number
//!   of frames, for CI machines and smoke tests.

mod headless;
mod input;
mod winit_backend;

use std::fmt;
use std::str::FromStr;

use cgmath::Vector2;

use crate::config::AppConfig;

pub use headless::{HeadlessBackend, HeadlessWindow};
pub use input::InputState;
pub use winit_backend::WinitBackend;

/// Keys the sandbox polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    Enter,
    W,
    A,
    S,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// The window the render core draws into. Only `size` feeds rendering.
pub trait Window {
    fn closed(&self) -> bool;
    fn close(&mut self);
    /// Drawable size in physical pixels.
    fn size(&self) -> (u32, u32);
    /// End-of-frame housekeeping, e.g. scheduling the next redraw.
    fn update(&mut self);
}

/// Polled input state. Pressed means held down at the time of the query.
pub trait Input {
    fn key_pressed(&self, key: Key) -> bool;
    fn mouse_pressed(&self, button: MouseButton) -> bool;
    /// Cursor position in pixels, origin top-left.
    fn mouse_position(&self) -> Vector2<f32>;
}

/// A frame-loop driver.
pub trait Platform {
    fn name(&self) -> &'static str;
    fn run(&mut self, config: AppConfig) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformKind {
    #[default]
    Winit,
    Headless,
}

impl PlatformKind {
    pub fn create(self) -> Box<dyn Platform> {
        match self {
            PlatformKind::Winit => Box::new(WinitBackend),
            PlatformKind::Headless => Box::new(HeadlessBackend),
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlatformKind::Winit => "winit",
            PlatformKind::Headless => "headless",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform '{0}' (expected 'winit' or 'headless')")]
pub struct UnknownPlatform(String);

impl FromStr for PlatformKind {
    type Err = UnknownPlatform;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "winit" => Ok(PlatformKind::Winit),
            "headless" => Ok(PlatformKind::Headless),
            _ => Err(UnknownPlatform(value.to_owned())),
        }
    }
}

/// Runs the sandbox on the platform named by `config`.
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let mut platform = config.platform.create();
    log::info!("starting {} platform", platform.name());
    platform.run(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_names_round_trip() {
        for kind in [PlatformKind::Winit, PlatformKind::Headless] {
            assert_eq!(kind.to_string().parse::<PlatformKind>(), Ok(kind));
            assert_eq!(kind.create().name(), kind.to_string());
        }
        assert_eq!(" Headless ".parse(), Ok(PlatformKind::Headless));
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let err = "glfw".parse::<PlatformKind>().expect_err("not a backend");
        assert!(err.to_string().contains("glfw"));
    }
}
