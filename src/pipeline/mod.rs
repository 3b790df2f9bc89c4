//! Pipeline components: context, walk loop, hash workers, error handling.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;
pub mod worker;

pub use context::{
    PipelineChannels, PipelineContext, PipelineHandles, PipelineTuning, StopSignal, WorkerShared,
    create_pipeline_channels,
};
pub use error_handler::{check_for_first_error, first_error};
pub use orchestrator::{
    collect_digests, run_pipeline, setup_pipeline_tuning, shutdown_pipeline_handles,
};
pub use walk::{
    WalkOutcome, run_walk_loop, spawn_walk_thread, to_outcome_jwalk, to_outcome_walkdir,
};
pub use worker::spawn_hash_workers;
