pub mod apps;
pub mod config;
pub mod error;
pub mod kv;
pub mod layout;
pub mod partition;
pub mod rpc;
pub mod sequential;
pub mod socket;
pub mod task;

pub use error::{Error, Result};
pub use kv::KeyValue;
pub use rpc::{
    Assignment, CompletedTaskRequest, CompletedTaskResponse, Directive, GetTaskRequest,
    JobStatusReport, StatusCounts,
};
pub use task::{TaskId, TaskKind, TaskStatus, WorkerId};
