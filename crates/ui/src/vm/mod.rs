mod guide_vm;
mod package_vm;
mod purchase_vm;
mod selector_vm;
mod wallet_vm;

pub use guide_vm::guide_to_html;
pub use package_vm::{
    COMPLETION_BANNER, COMPLETION_MARKER, PackageViewVm, TestButtonVm, map_package_view,
};
pub use purchase_vm::{PurchaseStatus, purchase_failure_message};
pub use selector_vm::{PackageSelectorVm, SelectorEffect, SelectorIntent, SelectorScreen};
pub use wallet_vm::{
    PendingTopup, TopupStatus, balance_label, parse_topup_amount, wallet_failure_message,
};
