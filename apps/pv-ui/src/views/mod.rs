pub mod correlation_view;
pub mod plot_view;
pub mod table_view;

pub use correlation_view::CorrelationView;
pub use plot_view::PlotView;
pub use table_view::TableWindow;
