mod admin;
mod banner;
mod category;
mod product;
mod size;
mod stats;
mod variant;
mod variant_type;

pub use admin::*;
pub use banner::*;
pub use category::*;
pub use product::*;
pub use size::*;
pub use stats::*;
pub use variant::*;
pub use variant_type::*;
