pub mod contact;
pub mod highlight;
pub mod model;
pub mod style;
pub mod territory;
pub mod unit;

pub use contact::*;
pub use highlight::*;
pub use model::*;
pub use style::*;
pub use territory::*;
pub use unit::*;
