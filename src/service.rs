pub mod extractor;
pub mod pipeline;
pub mod ranker;
pub mod selector;
pub mod storage;
pub mod validator;
pub mod verifier;
