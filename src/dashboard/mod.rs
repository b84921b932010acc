pub mod locale;
pub mod renderer;
pub mod view_state;

pub use locale::{Locale, Strings};
pub use renderer::DashboardRenderer;
pub use view_state::{AnalysisTab, Page, ViewState};
