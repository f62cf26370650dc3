pub mod analyzers;
pub mod api;
pub mod dataset;
pub mod normalize;
pub mod output;
pub mod parser;
