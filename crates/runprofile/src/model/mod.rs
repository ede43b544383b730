pub mod diagnostic;
pub mod ids;
pub mod profile;
pub mod spec;

pub use diagnostic::*;
pub use ids::RequestId;
pub use profile::*;
pub use spec::*;
