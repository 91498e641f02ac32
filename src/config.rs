use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "turntable.toml";

/// Output settings for one render job.
///
/// The defaults (512x512, 30 fps, 5 seconds) give the canonical 150-frame
/// turntable loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig
{
        pub width: u32,
        pub height: u32,
        pub fps: u32,
        pub duration_secs: u32,
}

impl Default for RenderConfig
{
        fn default() -> Self
        {
                Self {
                        width: 512,
                        height: 512,
                        fps: 30,
                        duration_secs: 5,
                }
        }
}

impl RenderConfig
{
        pub fn total_frames(&self) -> u32
        {
                self.fps * self.duration_secs
        }

        pub fn aspect(&self) -> f32
        {
                self.width as f32 / self.height as f32
        }

        pub fn from_file() -> anyhow::Result<Self>
        {
                let contents = std::fs::read_to_string(CONFIG_FILE)?;
                Ok(toml::from_str(&contents)?)
        }

        /// Loads `turntable.toml` from the working directory, falling back
        /// to the defaults when it is absent or malformed.
        pub fn load_or_default() -> Self
        {
                Self::from_file().unwrap_or_else(|err| {
                        log::warn!("failed to load {CONFIG_FILE}: {err}, using defaults");
                        Self::default()
                })
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn defaults_give_150_frames()
        {
                let config = RenderConfig::default();
                assert_eq!(config.width, 512);
                assert_eq!(config.height, 512);
                assert_eq!(config.total_frames(), 150);
        }

        #[test]
        fn partial_toml_keeps_remaining_defaults()
        {
                let config: RenderConfig = toml::from_str("fps = 24\nduration_secs = 2").unwrap();
                assert_eq!(config.fps, 24);
                assert_eq!(config.total_frames(), 48);
                assert_eq!(config.width, 512);
        }
}
