mod cfitsio;
pub mod files;
pub mod fits;
pub mod fits_writer;
pub mod header;

pub use files::list_fits_files;
pub use fits::{load_fits, read_header, FitsReader};
pub use fits_writer::write_fits;
pub use header::{Header, HeaderValue};
