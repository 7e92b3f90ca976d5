// Interview question generation: batch fetching from the LLM, the session
// loop that accumulates batches, topic filtering and the HTTP surface.
// All remote calls go through llm_client.

pub mod fetcher;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;
