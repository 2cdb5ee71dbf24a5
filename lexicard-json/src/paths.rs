use directories::ProjectDirs;
use std::path::PathBuf;

pub fn data_root() -> PathBuf {
    // org = "lexicard", app = "Lexicard"
    if let Some(pd) = ProjectDirs::from("com", "lexicard", "Lexicard") {
        pd.data_dir().to_path_buf()
    } else {
        // Fallback: current dir
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

pub fn config_root() -> PathBuf {
    ProjectDirs::from("com", "lexicard", "Lexicard")
        .map(|pd| pd.config_dir().to_path_buf())
        .unwrap_or_else(data_root)
}

pub fn default_store_file() -> (PathBuf, PathBuf) {
    let root = data_root();
    let file = root.join("lexicard.json");
    let backups = root.join("backups");
    (file, backups)
}

pub fn default_config_file() -> PathBuf {
    config_root().join("config.toml")
}

/// Backups directory that sits next to a custom store file.
pub fn backups_for(store_file: &std::path::Path) -> PathBuf {
    store_file
        .parent()
        .map(|p| p.join("backups"))
        .unwrap_or_else(|| PathBuf::from("backups"))
}
