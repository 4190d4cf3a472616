//! オセロAPIサーバーのエントリポイント
//! 設定読み込み、ログ初期化、セッション掃除タスクの起動、HTTPサーバー起動を行う。

use std::{sync::Arc, time::Duration};

use othello::{api::{create_router, GameService}, config::Config};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// メイン関数 - サーバーの初期化と起動を担当
#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--generate-config") {
        match Config::default().save_to_file("config.json") {
            Ok(()) => println!("config.json を生成しました"),
            Err(e) => {
                eprintln!("設定ファイル生成失敗: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let config = match Config::load().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("設定エラー: {}", e);
            eprintln!("デフォルト設定を生成: cargo run -- --generate-config");
            std::process::exit(1);
        }
    };

    // RUST_LOGが設定されていればそちらを優先
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        address = %config.bind_address(),
        max_sessions = config.sessions.max_sessions,
        show_hints = config.display.show_hints,
        "configuration loaded"
    );

    let service = Arc::new(GameService::from_config(&config));

    if config.sessions.enable_session_cleanup {
        let service = Arc::clone(&service);
        let period = Duration::from_secs(config.sessions.cleanup_interval_minutes.saturating_mul(60));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                service.cleanup_inactive_sessions();
            }
        });
    }

    let app = create_router(service, config.server.enable_cors);

    let bind_address = config.bind_address();
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %bind_address, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(address = %bind_address, "Othello API server listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
