use crate::{
    constants::{CONFIG_FILE, DATA_DIR, DEFAULT_HEIGHT, DEFAULT_WIDTH},
    error::{BookError, ConfigError},
    paginator::Viewport,
};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Settings read from `~/.books/config/config.cfg`.
///
/// The file holds `key=value` lines; only `width` and `height` are recognised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    pub width: Option<usize>,
    pub height: Option<usize>,
}

impl ReaderConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DATA_DIR).join(CONFIG_FILE))
    }

    /// Reads the config at `path`. A missing file gives an empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!("Loaded config from {:?}", path);
                Ok(Self::parse(&text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config file at {:?}", path);
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let slot = match key.trim() {
                "width" => &mut config.width,
                "height" => &mut config.height,
                other => {
                    debug!("Ignoring unknown config key {:?}", other);
                    continue;
                }
            };
            match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => *slot = Some(n),
                _ => warn!("Ignoring invalid config value {:?}", line),
            }
        }

        config
    }

    /// Picks each dimension from the command line, then this config, then the default.
    pub fn resolve_viewport(
        &self,
        cli_width: Option<usize>,
        cli_height: Option<usize>,
    ) -> Result<Viewport, BookError> {
        let width = cli_width.or(self.width).unwrap_or(DEFAULT_WIDTH);
        let height = cli_height.or(self.height).unwrap_or(DEFAULT_HEIGHT);
        info!("Reader size {}x{}", width, height);
        Viewport::new(width, height)
    }
}
