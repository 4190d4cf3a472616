//! アプリケーション設定管理モジュール
//! サーバー、セッション、表示、ログの設定を
//! 設定ファイルと環境変数から読み込んで管理する。

use serde::{Deserialize, Serialize};
use std::{env, fs, io, path::Path, str::FromStr};

/// サーバーの設定を管理する構造体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            enable_cors: true,
        }
    }
}

/// 対局セッションの設定
/// セッション数制限、タイムアウト、クリーンアップ間隔
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub max_sessions: usize,
    pub session_timeout_minutes: i64,
    pub enable_session_cleanup: bool,
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100,
            session_timeout_minutes: 30,
            enable_session_cleanup: true,
            cleanup_interval_minutes: 5,
        }
    }
}

/// 表示に関する設定
/// エンジンの挙動には影響しない
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 新規セッションで合法手のヒントを表示するか
    pub show_hints: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { show_hints: true }
    }
}

/// ログ出力の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing-subscriberのEnvFilter書式。RUST_LOGが優先される
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "othello=info".to_string(),
        }
    }
}

/// アプリケーションの全設定を統合するメイン設定構造体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub sessions: SessionConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

/// 設定関連のエラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("設定ファイル読み込みエラー: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("設定ファイル解析エラー: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("環境変数エラー: {name} = {value}")]
    EnvVarError { name: String, value: String },

    #[error("設定値が無効です: {field} = {value}")]
    InvalidValue { field: String, value: String },
}

/// 設定ファイルの探索順
pub const CONFIG_SEARCH_PATHS: [&str; 3] = [
    "config.json",
    "config/app.json",
    "/etc/othello/config.json",
];

/// タイムアウトと掃除間隔の上限 (7日)
pub const MAX_SESSION_MINUTES: i64 = 7 * 24 * 60;

/// 環境変数を読み、設定されていればパースして返す
fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarError {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// 指定したファイルパスから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 環境変数から設定を読み込む
    /// デフォルト値をベースに環境変数で上書きする
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 設定済みの環境変数だけを自身に上書きする
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(port) = parse_env("SERVER_PORT")? {
            self.server.port = port;
        }

        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(max_sessions) = parse_env("OTHELLO_MAX_SESSIONS")? {
            self.sessions.max_sessions = max_sessions;
        }

        if let Some(timeout) = parse_env("OTHELLO_SESSION_TIMEOUT_MINUTES")? {
            self.sessions.session_timeout_minutes = timeout;
        }

        if let Some(show_hints) = parse_env("OTHELLO_SHOW_HINTS")? {
            self.display.show_hints = show_hints;
        }

        if let Ok(filter) = env::var("OTHELLO_LOG") {
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// 設定ファイルと環境変数を結合して設定を読み込む
    /// 設定ファイルがなくてもデフォルト値で動作する
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_paths(&CONFIG_SEARCH_PATHS)
    }

    /// 探索パスを順に試し、最初に見つかった設定ファイルに環境変数を重ねる
    /// 存在しないファイルだけを読み飛ばし、壊れたファイルはエラーにする
    pub fn load_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        for path in paths {
            match Self::from_file(path) {
                Ok(found) => {
                    config = found;
                    break;
                }
                Err(ConfigError::FileReadError(e)) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }

        config.apply_env()?;
        Ok(config)
    }

    /// 現在の設定を指定したファイルに保存する
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定値の妥当性をチェックする
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: self.server.port.to_string(),
            });
        }

        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.max_sessions".to_string(),
                value: self.sessions.max_sessions.to_string(),
            });
        }

        if self.sessions.session_timeout_minutes <= 0
            || self.sessions.session_timeout_minutes > MAX_SESSION_MINUTES
        {
            return Err(ConfigError::InvalidValue {
                field: "sessions.session_timeout_minutes".to_string(),
                value: self.sessions.session_timeout_minutes.to_string(),
            });
        }

        let interval = self.sessions.cleanup_interval_minutes;
        if self.sessions.enable_session_cleanup
            && (interval == 0 || interval > MAX_SESSION_MINUTES as u64)
        {
            return Err(ConfigError::InvalidValue {
                field: "sessions.cleanup_interval_minutes".to_string(),
                value: self.sessions.cleanup_interval_minutes.to_string(),
            });
        }

        Ok(())
    }

    /// バインドするアドレス文字列
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
