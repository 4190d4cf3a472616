//! 対局API モジュール
//!
//! エンジンの状態をJSONで描画側に渡し、着手・やり直し・ヒント切り替えを受け付ける。

pub mod dto;
pub mod service;
pub mod handlers;
pub mod routes;
pub mod middleware;

pub use dto::*;
pub use service::*;
pub use routes::*;
