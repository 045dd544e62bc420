//! Community comment board, keyed loosely by role name. Free-text role
//! strings are canonicalized so "SWE", "Software Engineer", and "software
//! developer (backend)" land in one bucket, and reads are ranked by a
//! fuzzy relevance score rather than exact role equality.

pub mod canonical;
pub mod handlers;
pub mod matching;
pub mod models;
pub mod prompts;
pub mod store;
