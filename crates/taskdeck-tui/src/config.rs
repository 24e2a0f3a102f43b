use std::path::PathBuf;

use clap::Parser;
use taskdeck_service::{FileSessionStore, DEFAULT_BASE_URL};

use crate::app::Route;

#[derive(Debug, Parser)]
#[command(name = "taskdeck", about = "Terminal client for the task tracker")]
pub struct Config {
    /// Backend base URL, including the `/api` prefix
    #[arg(long, env = "TASKDECK_SERVER_URL", default_value = DEFAULT_BASE_URL)]
    pub server_url: String,

    /// Where the login session is kept between runs
    #[arg(long, env = "TASKDECK_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Log destination. Defaults to `taskdeck.log` next to the session file.
    #[arg(long, env = "TASKDECK_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Screen to open first, e.g. `/projects/3`
    #[arg(long, default_value = "/projects")]
    pub open: String,
}

impl Config {
    pub fn session_store(&self) -> FileSessionStore {
        match &self.session_file {
            Some(path) => FileSessionStore::new(path),
            None => FileSessionStore::open_default(),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        let session = self.session_store();
        session
            .path()
            .parent()
            .map(|dir| dir.join("taskdeck.log"))
            .unwrap_or_else(|| PathBuf::from("taskdeck.log"))
    }

    pub fn start_route(&self) -> Route {
        Route::parse(&self.open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["taskdeck"]).unwrap();
        assert_eq!(config.start_route(), Route::Projects);
        assert!(config.log_path().ends_with("taskdeck.log"));
    }

    #[test]
    fn explicit_paths_win() {
        let config = Config::try_parse_from([
            "taskdeck",
            "--server-url",
            "http://backend:9000/api",
            "--session-file",
            "/tmp/td/session.json",
            "--open",
            "/projects/7",
        ])
        .unwrap();
        assert_eq!(config.server_url, "http://backend:9000/api");
        assert_eq!(
            config.session_store().path(),
            std::path::Path::new("/tmp/td/session.json")
        );
        assert_eq!(config.log_path(), PathBuf::from("/tmp/td/taskdeck.log"));
        assert_eq!(config.start_route(), Route::ProjectDetail(7));
    }
}
