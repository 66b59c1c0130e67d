mod asset;
mod job;

pub use asset::{Asset, Chunk, ContentType};
pub use job::{Job, JobStatus, JobUpdate};
