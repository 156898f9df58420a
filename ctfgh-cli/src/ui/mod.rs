mod bar_chart;
mod batch_progress;
mod confirm;
mod footer;
mod header;
mod help;
mod layout;
mod list_view;
mod progress;
mod report;
mod theme;

pub use batch_progress::BatchProgressView;
pub use confirm::ConfirmView;
pub use footer::Footer;
pub use header::Header;
pub use help::HelpView;
pub use layout::AppLayout;
pub use list_view::{ItemList, Pager, RowColumns};
pub use report::{NoticeView, ReportView};
pub use theme::Theme;
