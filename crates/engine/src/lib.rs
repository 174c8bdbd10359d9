//! Gulch Engine library.
//!
//! Interprets generative-model output for the narrative game loop.
//!
//! ## Structure
//!
//! - `use_cases/` - the response interpretation pipeline
//! - `infrastructure/` - settings loaded from the environment
//!
//! ```
//! use gulch_engine::parse_response;
//!
//! let parsed = parse_response("You ride into town.\nLOCATION: Dry Creek");
//! assert_eq!(parsed.narrative, "You ride into town.");
//! assert_eq!(parsed.location.map(|l| l.to_string()), Some("Dry Creek".to_string()));
//! ```

pub mod infrastructure;
pub mod use_cases;

pub use infrastructure::InterpreterSettings;
pub use use_cases::response::{parse_response, render_markers, InterpretError, ResponseInterpreter};
