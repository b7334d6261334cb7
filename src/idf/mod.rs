//! Reading and writing EnergyPlus IDF text.
//!
//! Every energy object in the crate serializes through [`generate_idf_string`]
//! and parses back through [`parse_idf_string`], so the two stay symmetric.

pub mod reader;
pub mod writer;

pub use reader::{extract_objects, object_type, parse_idf_string, strip_comments};
pub use writer::{generate_idf_string, opt_num, yes_no};
