pub mod instance_reader;
pub use instance_reader::*;
pub mod tour_writer;
pub use tour_writer::TourWriter;
