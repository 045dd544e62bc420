//! Career advisory endpoints. Each one renders a prompt, asks the LLM for
//! structured JSON, and normalizes the reply at the boundary before it
//! reaches a client. The recommendation logic itself lives entirely in the
//! LLM; this module owns the prompts and the strictness of the output.

pub mod handlers;
pub mod models;
pub mod prompts;
