mod generator;
mod rewrite;

pub use generator::MssqlGenerator;
