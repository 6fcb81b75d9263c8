mod catalog;
mod package_selector;
mod package_view;
mod state;
mod test_view;
mod wallet;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use catalog::CatalogView;
pub use package_selector::PackageSelector;
pub use package_view::PackageView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use test_view::TestView;
pub use wallet::WalletPanel;
