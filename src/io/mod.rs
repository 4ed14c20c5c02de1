// Snapshot loading, tabular export and the printable report.

mod export;
mod import;
mod print;

pub use export::*;
pub use import::*;
pub use print::*;
