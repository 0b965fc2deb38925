//! Application configuration
//!
//! Everything the sandbox decides once at startup: window size, which platform
//! backend drives the frame loop, optional asset paths and logging.

use std::path::PathBuf;

use crate::logging::LoggingConfig;
use crate::platform::PlatformKind;

/// Startup configuration for the sandbox.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub platform: PlatformKind,
    /// Frames rendered before a headless window reports itself closed.
    pub headless_frames: u64,
    pub vsync: bool,
    /// OBJ file whose first two meshes replace the built-in cube and cylinder.
    pub mesh_path: Option<PathBuf>,
    /// JPEG/PNG file used for the sprite; a checker pattern otherwise.
    pub texture_path: Option<PathBuf>,
    pub editor: bool,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Playground".to_string(),
            width: 1024,
            height: 768,
            platform: PlatformKind::Winit,
            headless_frames: 120,
            vsync: true,
            mesh_path: None,
            texture_path: None,
            editor: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `PLAYGROUND_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup("PLAYGROUND_PLATFORM") {
            match value.parse() {
                Ok(kind) => config.platform = kind,
                Err(err) => log::warn!("ignoring PLAYGROUND_PLATFORM: {err}"),
            }
        }
        if let Some(value) = lookup("PLAYGROUND_FRAMES") {
            match value.parse() {
                Ok(frames) => config.headless_frames = frames,
                Err(_) => log::warn!("ignoring PLAYGROUND_FRAMES={value:?}: not a frame count"),
            }
        }
        if let Some(value) = lookup("PLAYGROUND_SIZE") {
            match parse_size(&value) {
                Some((width, height)) => {
                    config.width = width;
                    config.height = height;
                }
                None => log::warn!("ignoring PLAYGROUND_SIZE={value:?}: expected WIDTHxHEIGHT"),
            }
        }
        if let Some(value) = lookup("PLAYGROUND_VSYNC") {
            config.vsync = !matches!(value.as_str(), "0" | "false" | "off");
        }
        if let Some(value) = lookup("PLAYGROUND_EDITOR") {
            config.editor = !matches!(value.as_str(), "0" | "false" | "off");
        }
        config.mesh_path = lookup("PLAYGROUND_MESH").map(PathBuf::from);
        config.texture_path = lookup("PLAYGROUND_TEXTURE").map(PathBuf::from);

        config
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_platform(mut self, platform: PlatformKind) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_headless_frames(mut self, frames: u64) -> Self {
        self.headless_frames = frames;
        self
    }

    pub fn with_mesh(mut self, path: impl Into<PathBuf>) -> Self {
        self.mesh_path = Some(path.into());
        self
    }

    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture_path = Some(path.into());
        self
    }

    pub fn with_editor(mut self, enabled: bool) -> Self {
        self.editor = enabled;
        self
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

fn parse_size(value: &str) -> Option<(u32, u32)> {
    let (width, height) = value.split_once(['x', 'X'])?;
    let width = width.trim().parse().ok()?;
    let height = height.trim().parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_open_a_vsynced_1024x768_window() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Playground");
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.platform, PlatformKind::Winit);
        assert_eq!(config.present_mode(), wgpu::PresentMode::AutoVsync);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PLAYGROUND_PLATFORM", "headless"),
            ("PLAYGROUND_FRAMES", "3"),
            ("PLAYGROUND_SIZE", "640x480"),
            ("PLAYGROUND_VSYNC", "off"),
            ("PLAYGROUND_MESH", "playground.obj"),
        ]));

        assert_eq!(config.platform, PlatformKind::Headless);
        assert_eq!(config.headless_frames, 3);
        assert_eq!((config.width, config.height), (640, 480));
        assert!(!config.vsync);
        assert_eq!(config.mesh_path, Some(PathBuf::from("playground.obj")));
        assert_eq!(config.texture_path, None);
    }

    #[test]
    fn malformed_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PLAYGROUND_PLATFORM", "glfw"),
            ("PLAYGROUND_FRAMES", "many"),
            ("PLAYGROUND_SIZE", "0x480"),
        ]));

        assert_eq!(config.platform, PlatformKind::Winit);
        assert_eq!(config.headless_frames, 120);
        assert_eq!((config.width, config.height), (1024, 768));
    }
}
