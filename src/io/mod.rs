/// CSV and JSON writers for every result table.
pub mod export;
pub mod import;
