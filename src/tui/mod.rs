pub mod app;
pub mod input;
pub mod menu;
pub mod overlay;
pub mod product_grid;
pub mod view_state;

pub use app::App;
pub use input::SearchInput;
pub use product_grid::ProductGrid;
pub use view_state::ViewState;
