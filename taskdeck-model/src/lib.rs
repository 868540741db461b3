//! Task record model and snapshot format for `taskdeck`.

pub mod codec;
pub mod task;

pub use codec::{CodecError, decode_snapshot, encode_snapshot};
pub use task::{ParseEnumError, Priority, Task, TaskId, TaskPatch, TaskStatus};
