pub mod dump;
pub mod endless;
pub mod generate;
pub mod migrate;
