mod pipeline;
mod remote;

pub use pipeline::{generate_report_id, SubmissionOutcome, SubmissionPipeline};
pub use remote::{RemotePayload, RemoteSink, SyncWarning, WebhookSink};
