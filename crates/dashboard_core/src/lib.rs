//! Dashboard core: pure state machine and shared dashboard data model.
mod dataset;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use dataset::{ChartSpec, DashboardDataset, Panel, SelectedFile};
pub use effect::Effect;
pub use msg::{ExportFailure, Msg, ProcessFailure};
pub use state::{DashboardState, ExportCapability, Phase, RequestId};
pub use update::{
    update, DASHBOARD_REGION_ID, ERR_EXPORT, ERR_INVALID_FILE, ERR_NO_FILE, ERR_PROCESSING,
};
pub use view_model::{DashboardViewModel, PanelView};
