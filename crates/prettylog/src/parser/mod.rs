/// Log line recognition and normalization module
///
/// Turns one raw line into a `StructuredEvent`, or reports that the line is
/// not structured and should be passed through untouched.
///
/// # Architecture
///
/// - `traits.rs`: the `LogParser` trait shared by payload parsers
/// - `formats/`: JSON and logfmt payload parsers
/// - `classify.rs`: assigns the time/message/level roles
/// - `time.rs`: resolves timestamp values
/// - `prefix.rs`: known wrappers (`@cee: `, container runtimes, zap dev)
/// - `recognizer.rs`: the fixed recognizer chain
///
/// # Safety Guarantees
///
/// - Line size limits (oversized lines are never parsed)
/// - Binary safety (non-UTF8 input fails recognition instead of panicking)
/// - Fail closed (a partially decodable line is not recognized)

pub mod traits;
pub mod model;
pub mod classify;
pub mod time;
pub mod formats;
pub mod prefix;
pub mod recognizer;

// Re-export commonly used types
pub use traits::LogParser;
pub use model::{LogFormat, ParseError, RoleKeys, StructuredEvent};
pub use classify::{FieldCandidates, FieldValue};
pub use recognizer::Recognizer;

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB
