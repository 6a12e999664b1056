mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod dataset;
pub use dataset::{use_dataset, Dataset, OfflineBadge};

mod collection_screen;
pub use collection_screen::CollectionPage;

mod overview;
pub use overview::OverviewView;

mod bed_map;
pub use bed_map::BedMapView;

mod priority;
pub use priority::PriorityCalculatorView;

mod case_summary;
pub use case_summary::CaseSummaryView;

mod module_shell;
pub use module_shell::ModuleShell;
