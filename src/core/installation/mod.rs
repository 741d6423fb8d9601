pub mod detect;
pub mod layout;
pub mod model;

pub use detect::{detect_installation_type, detect_installation_type_in};
pub use layout::GameLayout;
pub use model::InstallationType;
