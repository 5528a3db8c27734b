// Article generation: level table, prompt building, response normalization
// and the sequential batch runner.
// All LLM calls go through llm_client, never direct HTTP.

pub mod generator;
pub mod levels;
pub mod normalizer;
pub mod prompt_builder;
pub mod prompts;
