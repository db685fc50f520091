//! Per-user locations of the `bvr` directory, e.g. `~/.config/bvr` or `~/.bvr`.
use std::path::PathBuf;

#[derive(Debug, Clone, Copy)]
pub enum FsAccess {
    Home,
    Config,
}

impl FsAccess {
    /// The `bvr` directory for this location. It is not created.
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            FsAccess::Home => dirs::home_dir().map(|p| p.join(".bvr")),
            FsAccess::Config => dirs::config_dir().map(|p| p.join("bvr")),
        }
    }

    /// `file_name` inside the `bvr` directory, only if it exists.
    pub fn find_file(&self, file_name: &str) -> Option<PathBuf> {
        self.path().map(|dir| dir.join(file_name)).filter(|path| path.is_file())
    }

    /// First location holding `file_name`, the config directory winning over home.
    pub fn locate(file_name: &str) -> Option<PathBuf> {
        [FsAccess::Config, FsAccess::Home].iter().find_map(|fs| fs.find_file(file_name))
    }
}
