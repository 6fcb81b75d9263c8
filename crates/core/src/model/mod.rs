mod ids;
mod ownership;
mod package;

pub use ids::{PackageId, ParseIdError, TestId};
pub use ownership::OwnershipSet;
pub use package::{Package, PackageError, Test};
