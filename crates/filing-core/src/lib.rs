pub mod error;
pub mod risk;
pub mod statements;
pub mod stats;
pub mod traits;
pub mod types;

pub use error::*;
pub use risk::*;
pub use statements::*;
pub use traits::*;
pub use types::*;
