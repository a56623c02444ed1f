mod recording;
mod run;
mod script;
pub use recording::*;
pub use run::*;
pub use script::*;
