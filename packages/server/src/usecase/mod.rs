//! UseCase 層
//!
//! 各ユースケースは `Arbiter` のロックを保持した間にストアを操作し、
//! 接続への通知は `MessagePusher` に任せます。

pub mod arbiter;
pub mod disconnect_connection;
pub mod error;
pub mod get_queue;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_queue;
pub mod match_coordinator;
pub mod relay_submission;
pub mod report_verdict;

#[cfg(test)]
pub(crate) mod testing;

pub use arbiter::Arbiter;
pub use disconnect_connection::{DisconnectConnectionUseCase, DisconnectOutcome};
pub use error::{GetRoomDetailError, JoinError, MatchError, SubmissionError, VerdictError};
pub use get_queue::GetQueueUseCase;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_queue::{DUPLICATE_CONNECTION_MESSAGE, JoinOutcome, JoinQueueUseCase};
pub use match_coordinator::MatchCoordinator;
pub use relay_submission::RelaySubmissionUseCase;
pub use report_verdict::{ReportVerdictUseCase, VerdictOutcome};
