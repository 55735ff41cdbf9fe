//! Asciicast data model, detection, parsing and serialization.
//!
//! Two incompatible generations exist on disk. v1 stores the whole
//! recording as one JSON array whose first element is the header; v2 stores
//! a header object on the first line followed by one JSON event tuple per
//! line. Both parse into the same [`ParsedCast`].

pub mod detect;
pub mod model;
pub mod parser;
pub mod stream;
pub mod writer;

pub use detect::{DetectedFormat, detect};
pub use model::{
    CastEvent, CastFormat, CastHeader, DEFAULT_HEIGHT, DEFAULT_WIDTH, EventKind, ParsedCast,
};
pub use parser::{parse, parse_as, validate};
pub use stream::{V2Reader, read_v2};
pub use writer::{to_v2_string, write_v2};
