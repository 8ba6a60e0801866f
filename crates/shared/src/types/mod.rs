mod day;
pub use day::*;

mod intensity;
pub use intensity::*;

mod uuid;
pub use self::uuid::*;
