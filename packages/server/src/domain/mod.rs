//! ドメイン層
//!
//! エンティティ・値オブジェクトと、UseCase 層が依存するインターフェース
//! （Repository / MessagePusher / ProblemProvider）を定義します。

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod message_pusher;
pub mod problem_provider;
pub mod repository;
pub mod value_object;

pub use entity::{Connection, Room, RoomStatus};
pub use error::{MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use event::SessionEvent;
pub use factory::RoomIdFactory;
pub use message_pusher::{MessagePusher, PushFrame, PusherChannel};
pub use problem_provider::ProblemProvider;
pub use repository::{ConnectionRegistry, RoomStore, WaitQueue};
pub use value_object::{ConnectionId, ProblemId, RoomId, Timestamp, UserId, Verdict};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use problem_provider::MockProblemProvider;
