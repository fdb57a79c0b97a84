pub mod archive;
pub mod config_io;
pub mod csv_io;

pub use archive::{read_archive, write_archive, ImageArchive, ImageSplit, SplitKind};
pub use config_io::{load_json, save_json};
pub use csv_io::{read_jets, write_jets, CsvLayout, JetChunks, JetCsvReader};
