//! quizrun-report — Review persistence for quizrun.
//!
//! Writes the questions a user missed to timestamped JSON files and finds
//! the most recent one for replay.

pub mod review;

pub use review::{find_latest_review_file, timestamped_path, write_review_file, JsonReviewSink};
