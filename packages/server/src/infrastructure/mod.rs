//! Infrastructure 層
//!
//! ドメイン層のインターフェースの具体的な実装と、ワイヤーフォーマットの DTO を提供します。

pub mod dto;
pub mod message_pusher;
pub mod problem_provider;
pub mod repository;
