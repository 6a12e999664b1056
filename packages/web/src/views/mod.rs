mod login;
pub use login::Login;

mod modules;
pub use modules::{ModuleHome, ModulePage, Root};
